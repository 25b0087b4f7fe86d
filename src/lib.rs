//! envsnap - Capture a Python environment as portable requirements.
//!
//! envsnap asks the package managers of a Python environment (conda when
//! present, and pip) what is installed, reconciles their answers and writes
//! a requirements list that recreates the environment elsewhere.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and merging
//! - [`detection`] - Conda vs plain environment detection
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Package names and requirement records
//! - [`shell`] - External command execution
//! - [`snapshot`] - Snapshots, reconciliation and the requirements text format
//! - [`sources`] - Conda and pip as sources of installed packages
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use envsnap::snapshot::{dedupe, LineSeparator, Snapshot};
//! use envsnap::requirements::{FullRequirement, SimpleRequirement};
//!
//! let conda: Vec<SimpleRequirement> = vec!["numpy=1.26.4".parse().unwrap()];
//! let pip: Vec<FullRequirement> =
//!     vec!["numpy==1.26.4".parse().unwrap(), "click==8.1.7".parse().unwrap()];
//!
//! let (conda, pip) = dedupe(conda, pip);
//! let snapshot = Snapshot::new(None, pip, conda, "3.11").unwrap();
//! assert_eq!(snapshot.to_text(&LineSeparator::default()), "click==8.1.7");
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod requirements;
pub mod shell;
pub mod snapshot;
pub mod sources;
pub mod ui;

pub use error::{EnvsnapError, Result};
