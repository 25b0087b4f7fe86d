//! Terminal user interface.
//!
//! Status messages go to stderr through a [`UserInterface`]; captured
//! requirements go to stdout through [`UserInterface::emit`], so
//! `envsnap capture > requirements.txt` stays clean.
//!
//! # Example
//!
//! ```
//! use envsnap::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.warning("Skipped mylib");
//! ui.emit("numpy==1.26.4");
//!
//! assert!(ui.has_warning("mylib"));
//! assert_eq!(ui.emitted(), ["numpy==1.26.4"]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, EnvsnapTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Write command output data to stdout. Shown in every mode.
    fn emit(&mut self, data: &str);
}
