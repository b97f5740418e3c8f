//! Command implementations

pub mod completions;
pub mod detect;
pub mod plan;
pub mod resolve;
pub mod targets;
pub mod version_stamp;

use std::path::PathBuf;

use polytarget::GlobalContext;

/// Project root for commands that work with or without a manifest.
fn project_root(ctx: &GlobalContext) -> PathBuf {
    ctx.find_project_root()
        .unwrap_or_else(|_| ctx.cwd().to_path_buf())
}
