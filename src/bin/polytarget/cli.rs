//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use polytarget::Target;

/// polytarget - resolve per-target dependencies for multiplatform builds
#[derive(Parser)]
#[command(name = "polytarget")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show capability flags and the active target set
    Targets(TargetsArgs),

    /// Resolve a dependency coordinate for each target
    Resolve(ResolveArgs),

    /// Detect the Android SDK and linux support
    Detect(DetectArgs),

    /// Run a configuration pass over Polytarget.toml
    Plan(PlanArgs),

    /// Write the version stamp source file
    VersionStamp(VersionStampArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Dependency as group:artifact:version
    pub notation: String,

    /// Targets to resolve for (defaults to the active target set)
    #[arg(long = "target", value_name = "TARGET")]
    pub targets: Vec<Target>,

    /// Resolve android to the -jvm artifact
    #[arg(long)]
    pub android_is_jvm: bool,

    /// Resolve metadata to the -common artifact
    #[arg(long)]
    pub suffix_common_rename: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Write a discovered SDK location to local.properties
    #[arg(long)]
    pub persist: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Path to Polytarget.toml (defaults to searching upward from cwd)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Do not write a discovered SDK location to local.properties
    #[arg(long)]
    pub no_persist: bool,

    /// Print as JSON instead of a build script
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VersionStampArgs {
    /// Library name (defaults to the project name)
    #[arg(long)]
    pub name: Option<String>,

    /// Version (defaults to the project version)
    #[arg(long)]
    pub version: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
