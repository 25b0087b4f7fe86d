//! Package managers queried for installed packages.
//!
//! Each manager sits behind a trait so snapshot construction can be driven by
//! fakes in tests:
//!
//! - [`CondaSource`] - environment-level packages ([`conda::CondaCli`])
//! - [`PipSource`] - Python packages ([`pip::PipCli`])
//!
//! [`Interpreter`] describes the Python whose environment is captured.

pub mod conda;
pub mod interpreter;
pub mod pip;
pub mod report;

pub use conda::{parse_conda_list, CondaCli};
pub use interpreter::Interpreter;
pub use pip::{parse_pip_list, PipCli};
pub use report::{ScanReport, SkipReason, SkippedPackage, UnreportablePolicy};

use crate::error::Result;
use crate::requirements::SimpleRequirement;

/// Lists the packages conda manages in an environment.
pub trait CondaSource {
    fn installed(&self) -> Result<Vec<SimpleRequirement>>;
}

/// Lists the packages pip reports installed.
pub trait PipSource {
    /// Scan installed packages.
    ///
    /// With `include_nested` unset only top-level packages (ones no other
    /// installed package depends on) are reported.
    fn installed(&self, include_nested: bool, policy: UnreportablePolicy) -> Result<ScanReport>;
}
