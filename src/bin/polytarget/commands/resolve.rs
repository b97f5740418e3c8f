//! `polytarget resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use polytarget::core::coordinate::resolve;
use polytarget::ops::{ConfigurationPass, PassOptions};
use polytarget::{DependencyDescriptor, GlobalContext, NamingOptions};

pub fn execute(args: ResolveArgs) -> Result<()> {
    let descriptor = DependencyDescriptor::parse(&args.notation)?;

    let options = NamingOptions::default()
        .with_android_is_jvm(args.android_is_jvm)
        .with_suffix_common_rename(args.suffix_common_rename);

    let targets = if args.targets.is_empty() {
        let ctx = GlobalContext::new()?;
        let root = super::project_root(&ctx);
        let pass = ConfigurationPass::bootstrap(&ctx, &root, PassOptions::read_only());
        pass.active_targets().as_slice().to_vec()
    } else {
        args.targets
    };

    let resolved = resolve(&descriptor, &targets, options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    for r in &resolved {
        println!("{:<16} {}", r.config_base, r.coordinate);
    }

    Ok(())
}
