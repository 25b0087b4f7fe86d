//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
}

impl CommandDispatcher {
    pub fn new(project_root: PathBuf, config_override: Option<PathBuf>) -> Self {
        Self {
            project_root,
            config_override,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Route the CLI subcommand to its implementation and execute it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Capture(args) => {
                let cmd = super::capture::CaptureCommand::new(
                    &self.project_root,
                    self.config_override.as_deref(),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Show(args) => {
                let cmd = super::show::ShowCommand::new(&self.project_root, args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
