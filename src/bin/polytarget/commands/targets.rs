//! `polytarget targets` command

use anyhow::Result;

use crate::cli::TargetsArgs;
use polytarget::ops::{ConfigurationPass, PassOptions};
use polytarget::GlobalContext;

pub fn execute(args: TargetsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = super::project_root(&ctx);
    let pass = ConfigurationPass::bootstrap(&ctx, &root, PassOptions::read_only());

    if args.json {
        let out = serde_json::json!({
            "flags": pass.flags(),
            "groups": pass.catalog().groups(),
            "targets": pass.active_targets(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let flags = pass.flags();
    println!("Capabilities:");
    println!("  android: {}", flags.has_android);
    println!("  linux:   {}", flags.linux_enabled);
    println!();

    println!("Targets:");
    for group in pass.catalog().groups() {
        let ids: Vec<_> = group.targets.iter().map(|t| t.id()).collect();
        println!("  {:<16} {}", group.name, ids.join(", "));
    }

    Ok(())
}
