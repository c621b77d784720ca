use std::path::PathBuf;

use clap::{Args, Parser};

/// Top-level CLI entry point for syncing a project's ruff configuration.
#[derive(Parser, Debug)]
#[command(
    name = "ruff-sync",
    about = "Synchronize the [tool.ruff] section of pyproject.toml with an upstream copy",
    version = crate::VERSION
)]
pub struct Cli {
    #[command(flatten)]
    pub sync: SyncOpts,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for a sync run.
#[derive(Args, Debug, Clone, Default)]
pub struct SyncOpts {
    /// URL of the upstream pyproject.toml (defaults to [tool.ruff-sync].upstream)
    pub upstream: Option<String>,

    /// Directory containing pyproject.toml, or the file itself
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Keys to leave untouched (bare or dotted); replaces the default set
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Preview changes without writing
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}
