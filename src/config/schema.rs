//! Configuration file format.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::detection::EnvironmentKind;
use crate::snapshot::{CaptureOptions, LineSeparator};
use crate::sources::UnreportablePolicy;

/// Root of `.envsnap/config.yml`.
///
/// Every field is optional; unset fields fall back to detection or the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvsnapConfig {
    /// Python interpreter whose environment is captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,

    /// Conda executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda: Option<PathBuf>,

    /// Skip detection and treat the environment as this kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_nested: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_unreportable: Option<UnreportablePolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_separator: Option<LineSeparator>,
}

impl EnvsnapConfig {
    /// Capture options with config values applied over the defaults.
    pub fn capture_options(&self) -> CaptureOptions {
        let defaults = CaptureOptions::default();
        CaptureOptions {
            include_nested: self.include_nested.unwrap_or(defaults.include_nested),
            on_unreportable: self.on_unreportable.unwrap_or(defaults.on_unreportable),
        }
    }
}
