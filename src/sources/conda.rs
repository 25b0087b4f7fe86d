//! Conda as a source of environment-level packages.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{EnvsnapError, Result};
use crate::requirements::{PackageName, SimpleRequirement};
use crate::shell::{display_command, CommandRunner};

use super::CondaSource;

/// Channel conda reports for packages that pip installed into the environment.
const PIP_CHANNEL: &str = "pypi";

/// One entry of `conda list --json`.
#[derive(Debug, Deserialize)]
struct CondaListEntry {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    build_string: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

/// Convert `conda list --json` output into requirements.
///
/// Packages pip installed into the environment also show up in conda's
/// listing under the `pypi` channel. They are left to the pip source.
/// Conda's internal metapackages (`_libgcc_mutex`, `_openmp_mutex`) have
/// names no requirement can carry and are dropped.
pub fn parse_conda_list(json: &str) -> Result<Vec<SimpleRequirement>> {
    let entries: Vec<CondaListEntry> =
        serde_json::from_str(json).map_err(|e| query_error(&format!("invalid JSON: {}", e)))?;

    let requirements = entries
        .into_iter()
        .filter(|entry| entry.channel.as_deref() != Some(PIP_CHANNEL))
        .filter_map(|entry| {
            let Ok(name) = PackageName::new(&entry.name) else {
                tracing::debug!("Ignoring conda package '{}'", entry.name);
                return None;
            };
            let version = entry.version.filter(|v| !v.trim().is_empty());
            let requirement = SimpleRequirement::new(name, version);
            Some(match entry.build_string.filter(|b| !b.trim().is_empty()) {
                Some(build) => requirement.with_build(build),
                None => requirement,
            })
        })
        .collect();
    Ok(requirements)
}

/// Queries the `conda` executable.
#[derive(Debug, Clone)]
pub struct CondaCli<R> {
    runner: R,
    executable: PathBuf,
    prefix: Option<PathBuf>,
}

impl<R: CommandRunner> CondaCli<R> {
    /// Query `executable` about the environment at `prefix`, or the active
    /// environment when no prefix is given.
    pub fn new(runner: R, executable: impl Into<PathBuf>, prefix: Option<PathBuf>) -> Self {
        Self {
            runner,
            executable: executable.into(),
            prefix,
        }
    }
}

impl<R: CommandRunner> CondaSource for CondaCli<R> {
    fn installed(&self) -> Result<Vec<SimpleRequirement>> {
        let prefix = self
            .prefix
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        let mut args = vec!["list", "--json"];
        if let Some(prefix) = &prefix {
            args.push("--prefix");
            args.push(prefix);
        }

        let result = self
            .runner
            .run(&self.executable, &args)?
            .into_success(&display_command(&self.executable, &args))?;
        let requirements = parse_conda_list(&result.stdout)?;
        tracing::debug!("conda reported {} packages", requirements.len());
        Ok(requirements)
    }
}

fn query_error(message: &str) -> EnvsnapError {
    EnvsnapError::SourceQueryFailed {
        manager: "conda".to_string(),
        message: message.to_string(),
    }
}
