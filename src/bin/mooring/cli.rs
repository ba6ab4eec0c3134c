//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Mooring - generate CMake builds from JSON project manifests
#[derive(Parser)]
#[command(name = "mooring")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the project graph and write CMakeLists.txt files
    Generate(GenerateArgs),

    /// Print the resolved project graph
    Graph(GraphArgs),

    /// Show how a directory would be imported as a dependency
    Classify(ClassifyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Input selection shared by commands that resolve a workspace.
#[derive(Args)]
pub struct InputArgs {
    /// Solution.json, Project.json, or a directory containing Project.json
    /// (defaults to Solution.json, then Project.json, in the current directory)
    pub input: Option<PathBuf>,

    /// Shared third-party directory (overrides the upward search)
    #[arg(long, env = "MOORING_THIRD_PARTY")]
    pub third_party: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Resolve and render, but do not write any files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Directory to classify
    pub dir: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
