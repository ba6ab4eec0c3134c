//! Mooring CLI - CMake generation for JSON-described C++ projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use mooring::core::ManifestError;
use mooring::util::diagnostic::emit;
use mooring::ResolveError;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("mooring=debug")
    } else {
        EnvFilter::new("mooring=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, cli.verbose, !cli.no_color),
        Commands::Graph(args) => commands::graph::execute(args, cli.verbose, !cli.no_color),
        Commands::Classify(args) => commands::classify::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print domain errors as diagnostics, everything else as a plain chain.
fn report(e: &anyhow::Error, color: bool) {
    if let Some(err) = e.downcast_ref::<ResolveError>() {
        emit(&err.to_diagnostic(), color);
    } else if let Some(err) = e.downcast_ref::<ManifestError>() {
        emit(&err.to_diagnostic(), color);
    } else {
        eprintln!("error: {:#}", e);
    }
}
