//! Visual theme and styling.

use console::Style;

/// Styles for status output.
#[derive(Debug, Clone)]
pub struct EnvsnapTheme {
    /// Success messages (green).
    pub success: Style,
    /// Warnings (orange).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
}

impl Default for EnvsnapTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvsnapTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
        }
    }

    /// A theme without colors, for non-TTY output or `--no-color`.
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }
}

/// Check if colors should be enabled for status output.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stderr().is_term()
}
