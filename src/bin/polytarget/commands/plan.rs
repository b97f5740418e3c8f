//! `polytarget plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use polytarget::ops::{plan, render_script, PassOptions};
use polytarget::GlobalContext;

pub fn execute(args: PlanArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = match args.manifest {
        Some(path) => path,
        None => ctx.find_manifest()?,
    };

    let plan = plan(
        &ctx,
        &manifest_path,
        PassOptions {
            persist_sdk: !args.no_persist,
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_script(&plan));
    }

    Ok(())
}
