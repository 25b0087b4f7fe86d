//! envsnap CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use envsnap::cli::{Cli, CommandDispatcher};
use envsnap::ui::{should_use_colors, OutputMode, TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool, ansi: bool) {
    let filter = if debug {
        EnvFilter::new("envsnap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envsnap=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(ansi),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, !cli.no_color);

    tracing::debug!("envsnap starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut ui = TerminalUI::with_colors(output_mode, !cli.no_color && should_use_colors());

    let project_root = match cli.project.clone() {
        Some(root) => root,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                ui.error(&format!("Error: cannot determine current directory: {}", e));
                return ExitCode::from(1);
            }
        },
    };

    let dispatcher = CommandDispatcher::new(project_root, cli.config.clone());

    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1)),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
