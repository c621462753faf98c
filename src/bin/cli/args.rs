//! CLI argument structures.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Incremental build resolver for TeX document trees backed by git.
#[derive(Parser)]
#[command(name = "texbake")]
#[command(version = VERSION)]
#[command(about = "Decide which TeX documents are stale and bake them to HTML")]
#[command(long_about = "
Texbake resolves which documents in a git-backed directory tree need
recompilation: it discovers candidate sources, keeps only genuine tracked
documents, follows their include directives, compares modification times
against the output artifacts, and refuses to build anything whose working
copy differs from the committed content.

Common usage:

  # Show what would be compiled
  texbake resolve

  # Resolve and run the configured compiler with four parallel jobs
  texbake bake -j 4

  # Machine-readable resolution report
  texbake resolve --format json

  # Write a starter configuration file
  texbake init-config
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Decide which documents need compilation and report them
    Resolve(ResolveArgs),

    /// Resolve, then run the external compiler over the stale documents
    Bake(BakeArgs),

    /// Print the default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a texbake configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Arguments shared by the resolution-driven commands.
#[derive(Args)]
pub struct ResolveArgs {
    /// Directory to resolve
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to a configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum simultaneously in-flight checks (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the bake command.
#[derive(Args)]
pub struct BakeArgs {
    /// Directory to bake
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to a configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum simultaneous compile jobs (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Arguments for init-config.
#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the configuration file
    #[arg(default_value = "texbake.yml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for validate-config.
#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub config: PathBuf,
}

/// Output format for resolution reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable styled text
    Text,
    /// Machine-readable JSON
    Json,
}
