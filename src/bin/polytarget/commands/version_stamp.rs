//! `polytarget version-stamp` command

use anyhow::Result;

use crate::cli::VersionStampArgs;
use polytarget::ops::write_stamp;
use polytarget::{GlobalContext, Manifest};

pub fn execute(args: VersionStampArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.find_manifest()?;
    let manifest = Manifest::load(&manifest_path)?;
    let root = manifest_path.parent().unwrap_or(ctx.cwd());

    let name = args.name.unwrap_or(manifest.project.name);
    let version = args.version.unwrap_or(manifest.project.version);

    let path = write_stamp(root, &manifest.project.namespace, &name, &version)?;
    println!("Wrote {}", path.display());

    Ok(())
}
