//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{EnvsnapTheme, OutputMode, UserInterface};

/// Writes status to stderr and data to stdout.
pub struct TerminalUI {
    status: Term,
    data: Term,
    theme: EnvsnapTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a terminal UI; `colors` applies to status output only.
    pub fn with_colors(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors {
            EnvsnapTheme::new()
        } else {
            EnvsnapTheme::plain()
        };

        Self {
            status: Term::stderr(),
            data: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.status, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.status, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.status, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.status, "{}", self.theme.format_error(msg)).ok();
    }

    fn emit(&mut self, data: &str) {
        writeln!(self.data, "{}", data).ok();
    }
}
