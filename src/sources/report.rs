//! Results of scanning an environment for installed packages.
//!
//! A scan is best-effort per package: one package without a usable version
//! must not hide the hundreds that are fine. What happens to such a package
//! is decided by an [`UnreportablePolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EnvsnapError, Result};
use crate::requirements::FullRequirement;

/// What to do with a package that cannot be turned into a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnreportablePolicy {
    /// Skip the package and record why.
    #[default]
    Warn,
    /// Abort the scan on the first such package.
    Raise,
}

/// Why a package was left out of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The package manager reported no version.
    MissingVersion,
    /// Installed in editable mode from a local checkout.
    Editable { location: String },
    /// Name or version could not be parsed.
    InvalidMetadata { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVersion => f.write_str("no version could be determined"),
            Self::Editable { location } => write!(f, "editable install from {}", location),
            Self::InvalidMetadata { message } => write!(f, "invalid metadata: {}", message),
        }
    }
}

/// A package left out of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPackage {
    /// Name as reported by the package manager.
    pub name: String,
    pub reason: SkipReason,
}

/// Requirements found by a scan plus the packages that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub requirements: Vec<FullRequirement>,
    pub skipped: Vec<SkippedPackage>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unreportable package according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns `UnreportablePackage` under [`UnreportablePolicy::Raise`].
    pub fn skip(
        &mut self,
        policy: UnreportablePolicy,
        name: impl Into<String>,
        reason: SkipReason,
    ) -> Result<()> {
        let name = name.into();
        match policy {
            UnreportablePolicy::Warn => {
                self.skipped.push(SkippedPackage { name, reason });
                Ok(())
            }
            UnreportablePolicy::Raise => Err(EnvsnapError::UnreportablePackage {
                name,
                reason: reason.to_string(),
            }),
        }
    }
}
