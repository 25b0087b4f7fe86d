//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::detection::EnvironmentKind;
use crate::sources::UnreportablePolicy;

/// envsnap - Capture a Python environment as portable requirements.
#[derive(Debug, Parser)]
#[command(name = "envsnap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .envsnap/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Only print errors and captured data
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Capture the requirements of a live Python environment
    Capture(CaptureArgs),

    /// Parse a requirements file and print it in canonical form
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `capture` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CaptureArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only report packages nothing else depends on
    #[arg(long)]
    pub top_level: bool,

    /// Separate lines with \r\n
    #[arg(long)]
    pub crlf: bool,

    /// Write the full snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Python interpreter to inspect
    #[arg(long)]
    pub python: Option<PathBuf>,

    /// Conda executable
    #[arg(long)]
    pub conda: Option<PathBuf>,

    /// Skip detection and treat the environment as this kind
    #[arg(long, value_enum)]
    pub environment: Option<EnvironmentKind>,

    /// What to do with packages that cannot be pinned
    #[arg(long, value_enum)]
    pub on_unreportable: Option<UnreportablePolicy>,
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Requirements file to read
    pub file: PathBuf,

    /// Print the parsed snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
