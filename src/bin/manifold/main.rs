//! Manifold CLI - expand sample catalogs into build targets

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use manifold::core::ValidationError;
use manifold::ops::{AssembleError, ExpandError};
use manifold::resolver::ConfigError;
use manifold::util::diagnostic::{self, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match to_diagnostic(&e) {
            Some(diag) => diagnostic::emit(&diag, color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("manifold=debug")
    } else {
        EnvFilter::new("manifold=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let session = Session {
        manifest_path: cli.manifest_path,
    };

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Check(args) => commands::check::execute(args, &session),
        Commands::Graph(args) => commands::graph::execute(args, &session),
        Commands::Targets(args) => commands::targets::execute(args, &session),
        Commands::Configs(args) => commands::configs::execute(args, &session),
        Commands::Explain(args) => commands::explain::execute(args, &session),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Find a library error with a structured diagnostic in the error chain.
fn to_diagnostic(err: &anyhow::Error) -> Option<Diagnostic> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<AssembleError>() {
            Some(e.to_diagnostic())
        } else if let Some(e) = cause.downcast_ref::<ValidationError>() {
            Some(e.to_diagnostic())
        } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.to_diagnostic())
        } else {
            cause.downcast_ref::<ExpandError>().map(|e| e.to_diagnostic())
        }
    })
}
