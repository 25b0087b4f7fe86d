//! Pip as a source of installed Python packages.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{EnvsnapError, Result};
use crate::requirements::FullRequirement;
use crate::shell::{display_command, CommandRunner};

use super::report::{ScanReport, SkipReason, UnreportablePolicy};
use super::PipSource;

/// One entry of `pip list --format=json`.
#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    editable_project_location: Option<String>,
}

/// Convert `pip list --format=json` output into a scan report.
///
/// # Errors
///
/// Returns `SourceQueryFailed` for output that is not a pip listing and
/// `UnreportablePackage` when `policy` is [`UnreportablePolicy::Raise`] and
/// some package cannot be pinned.
pub fn parse_pip_list(json: &str, policy: UnreportablePolicy) -> Result<ScanReport> {
    let entries: Vec<PipListEntry> =
        serde_json::from_str(json).map_err(|e| EnvsnapError::SourceQueryFailed {
            manager: "pip".to_string(),
            message: format!("invalid JSON: {}", e),
        })?;

    let mut report = ScanReport::new();
    for entry in entries {
        if let Some(location) = entry.editable_project_location {
            report.skip(policy, entry.name, SkipReason::Editable { location })?;
            continue;
        }
        let Some(version) = entry.version.filter(|v| !v.trim().is_empty()) else {
            report.skip(policy, entry.name, SkipReason::MissingVersion)?;
            continue;
        };
        match FullRequirement::pinned(&entry.name, &version) {
            Ok(requirement) => report.requirements.push(requirement),
            Err(e) => {
                let message = match e {
                    EnvsnapError::RequirementParse { message, .. } => message,
                    other => other.to_string(),
                };
                report.skip(policy, entry.name, SkipReason::InvalidMetadata { message })?;
            }
        }
    }
    Ok(report)
}

/// Queries pip through `python -m pip`.
#[derive(Debug, Clone)]
pub struct PipCli<R> {
    runner: R,
    python: PathBuf,
}

impl<R: CommandRunner> PipCli<R> {
    pub fn new(runner: R, python: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            python: python.into(),
        }
    }
}

impl<R: CommandRunner> PipSource for PipCli<R> {
    fn installed(&self, include_nested: bool, policy: UnreportablePolicy) -> Result<ScanReport> {
        let mut args = vec![
            "-m",
            "pip",
            "list",
            "--format=json",
            "--disable-pip-version-check",
        ];
        if !include_nested {
            args.push("--not-required");
        }

        let result = self
            .runner
            .run(&self.python, &args)?
            .into_success(&display_command(&self.python, &args))?;
        let report = parse_pip_list(&result.stdout, policy)?;
        tracing::debug!(
            "pip reported {} packages ({} skipped)",
            report.requirements.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
