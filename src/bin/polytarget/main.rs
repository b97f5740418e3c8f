//! polytarget CLI - multi-target dependency resolution

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

use polytarget::core::coordinate::CoordinateError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e.downcast_ref::<CoordinateError>().and_then(|d| d.help()) {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("polytarget=debug")
    } else {
        EnvFilter::new("polytarget=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Targets(args) => commands::targets::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Detect(args) => commands::detect::execute(args),
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::VersionStamp(args) => commands::version_stamp::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
