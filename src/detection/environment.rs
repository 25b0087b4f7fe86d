//! Detection of the kind of environment an interpreter lives in.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sources::Interpreter;

/// Directory every conda environment carries at its root.
const CONDA_META_DIR: &str = "conda-meta";

/// Which package managers own the environment being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    /// Conda environment; pip may also have installed packages into it.
    Conda,
    /// Plain interpreter or virtualenv; pip only.
    Plain,
}

impl EnvironmentKind {
    /// Whether conda should be asked for the environment's packages.
    pub fn has_conda(self) -> bool {
        matches!(self, Self::Conda)
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conda => f.write_str("conda"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// Resolves the [`EnvironmentKind`] of an interpreter.
pub struct EnvironmentDetector;

impl EnvironmentDetector {
    /// Detect using the real process environment.
    pub fn detect(interpreter: &Interpreter) -> EnvironmentKind {
        Self::detect_with_env(interpreter, |key: &str| std::env::var(key))
    }

    /// Detect with a custom env var lookup function.
    ///
    /// Checked in order:
    /// 1. `conda` anywhere in the interpreter's executable path
    /// 2. a `conda-meta` directory under the interpreter's prefix
    /// 3. `CONDA_PREFIX` pointing at the interpreter's prefix
    pub fn detect_with_env<F>(interpreter: &Interpreter, env_fn: F) -> EnvironmentKind
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        if interpreter.executable().to_string_lossy().contains("conda") {
            tracing::debug!("Conda environment: executable path mentions conda");
            return EnvironmentKind::Conda;
        }

        if interpreter.prefix().join(CONDA_META_DIR).is_dir() {
            tracing::debug!("Conda environment: {} found under prefix", CONDA_META_DIR);
            return EnvironmentKind::Conda;
        }

        if let Ok(conda_prefix) = env_fn("CONDA_PREFIX") {
            if !conda_prefix.is_empty() && Path::new(&conda_prefix) == interpreter.prefix() {
                tracing::debug!("Conda environment: CONDA_PREFIX matches interpreter prefix");
                return EnvironmentKind::Conda;
            }
        }

        EnvironmentKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    #[test]
    fn conda_in_executable_path() {
        let interp = Interpreter::new("/home/me/miniconda3/envs/ml/bin/python", "/nowhere", "3.11");
        assert_eq!(
            EnvironmentDetector::detect_with_env(&interp, no_env),
            EnvironmentKind::Conda
        );
    }

    #[test]
    fn conda_meta_under_prefix() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("conda-meta")).unwrap();
        let interp = Interpreter::new("/home/me/miniforge3/bin/python", temp.path(), "3.12");

        assert_eq!(
            EnvironmentDetector::detect_with_env(&interp, no_env),
            EnvironmentKind::Conda
        );
    }

    #[test]
    fn conda_prefix_env_var_matching_prefix() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().to_string_lossy().into_owned();
        let interp = Interpreter::new("/opt/forge/bin/python", temp.path(), "3.12");

        let kind = EnvironmentDetector::detect_with_env(&interp, |key: &str| {
            if key == "CONDA_PREFIX" {
                Ok(prefix.clone())
            } else {
                Err(VarError::NotPresent)
            }
        });
        assert_eq!(kind, EnvironmentKind::Conda);
    }

    #[test]
    fn conda_prefix_for_other_environment_is_ignored() {
        let temp = TempDir::new().unwrap();
        let interp = Interpreter::new("/usr/bin/python3", temp.path(), "3.10");

        let kind = EnvironmentDetector::detect_with_env(&interp, |_: &str| {
            Ok("/opt/somewhere/else".to_string())
        });
        assert_eq!(kind, EnvironmentKind::Plain);
    }

    #[test]
    fn plain_virtualenv() {
        let temp = TempDir::new().unwrap();
        let interp = Interpreter::new(temp.path().join("bin/python"), temp.path(), "3.11");
        assert_eq!(
            EnvironmentDetector::detect_with_env(&interp, no_env),
            EnvironmentKind::Plain
        );
    }

    #[test]
    fn only_conda_has_conda() {
        assert!(EnvironmentKind::Conda.has_conda());
        assert!(!EnvironmentKind::Plain.has_conda());
    }
}
