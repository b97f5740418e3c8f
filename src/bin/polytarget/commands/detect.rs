//! `polytarget detect` command

use anyhow::Result;

use crate::cli::DetectArgs;
use polytarget::ops::detect::{detect_linux, persist_if_absent, probe_android};
use polytarget::ops::{AndroidInputs, AndroidSdk};
use polytarget::util::config::{load_config, project_config_path};
use polytarget::GlobalContext;

pub fn execute(args: DetectArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = super::project_root(&ctx);
    let config_path = ctx.config_path();
    let config = load_config(Some(config_path.as_path()), &project_config_path(&root));

    let inputs = AndroidInputs::from_context(&ctx, &config);
    let sdk = probe_android(&inputs);

    match &sdk {
        AndroidSdk::Disabled => println!("android: disabled"),
        AndroidSdk::Explicit(path) => println!("android: {} (configured)", path.display()),
        AndroidSdk::Discovered(path) => println!("android: {} (discovered)", path.display()),
        AndroidSdk::Absent => println!(
            "android: not found (checked {})",
            inputs.fallback_sdk_dir.display()
        ),
    }
    println!("linux:   {}", if detect_linux(&config) { "enabled" } else { "disabled" });

    if let (true, AndroidSdk::Discovered(path)) = (args.persist, &sdk) {
        if persist_if_absent(&root, path)? {
            println!("wrote sdk.dir to {}", root.join("local.properties").display());
        } else {
            println!("local.properties already sets sdk.dir");
        }
    }

    Ok(())
}
