//! Command-line interface for envsnap.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CaptureArgs, Cli, Commands, CompletionsArgs, ShowArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
