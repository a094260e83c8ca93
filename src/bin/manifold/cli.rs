//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Manifold - expand sample catalogs into build targets
#[derive(Parser)]
#[command(name = "manifold")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Manifold.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true, env = "MANIFOLD_MANIFEST_PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter Manifold.toml
    Init(InitArgs),

    /// Validate the manifest and assemble the project graph
    Check(CheckArgs),

    /// Export the assembled project graph
    Graph(GraphArgs),

    /// List targets, optionally those enabled by one configuration
    Targets(TargetsArgs),

    /// List configurations or show one resolved configuration
    Configs(ConfigsArgs),

    /// Explain where a target comes from and what it depends on
    Explain(ExplainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Print the graph fingerprint
    #[arg(long)]
    pub fingerprint: bool,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Output format (json, toml)
    #[arg(long)]
    pub format: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compact JSON output
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Only targets enabled by this configuration
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the configuration's platform
    #[arg(long, requires = "config")]
    pub platform: Option<String>,

    /// Override the configuration's compiler
    #[arg(long, requires = "config")]
    pub compiler: Option<String>,

    /// Print the evaluated targets in this format (json, toml)
    #[arg(long, requires = "config")]
    pub format: Option<String>,
}

#[derive(Args)]
pub struct ConfigsArgs {
    /// Configuration to show in detail
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Target to explain
    pub target: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
