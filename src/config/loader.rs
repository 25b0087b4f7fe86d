//! Configuration file discovery and loading.

use std::env::VarError;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::merge_configs;
use crate::config::schema::EnvsnapConfig;
use crate::error::{EnvsnapError, Result};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".envsnap";

/// Overrides the configured Python interpreter.
pub const PYTHON_ENV_VAR: &str = "ENVSNAP_PYTHON";

/// Overrides the configured conda executable.
pub const CONDA_ENV_VAR: &str = "ENVSNAP_CONDA";

/// Paths to configuration files in merge order (later overrides earlier).
///
/// 1. Project config (`.envsnap/config.yml`)
/// 2. Local overrides (`.envsnap/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project: Option<PathBuf>,
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// All existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Load a config file as a raw YAML value, for merging.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvsnapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvsnapError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| EnvsnapError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge the project's config files.
///
/// A project without config files gets the defaults.
pub fn load_merged_config(project_root: &Path) -> Result<EnvsnapConfig> {
    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();
    if existing.is_empty() {
        tracing::debug!("No config under {}, using defaults", project_root.display());
        return Ok(EnvsnapConfig::default());
    }

    let configs = existing
        .into_iter()
        .map(|path| {
            tracing::debug!("Loading config {}", path.display());
            load_config_value(path)
        })
        .collect::<Result<Vec<_>>>()?;

    serde_yaml::from_value(merge_configs(&configs)).map_err(|e| EnvsnapError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with an optional path override.
///
/// An explicit `config_override` is loaded alone, without merging, and must
/// exist. Otherwise the project's files are discovered and merged.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EnvsnapConfig> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            if value.is_null() {
                return Ok(EnvsnapConfig::default());
            }
            serde_yaml::from_value(value).map_err(|e| EnvsnapError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        None => load_merged_config(project_root),
    }
}

/// Apply `ENVSNAP_*` environment variables on top of file config.
pub fn apply_env_overrides(config: EnvsnapConfig) -> EnvsnapConfig {
    apply_env_overrides_with(config, |key: &str| std::env::var(key))
}

/// Apply environment overrides with a custom env var lookup function.
///
/// Empty values are ignored.
pub fn apply_env_overrides_with<F>(mut config: EnvsnapConfig, env_fn: F) -> EnvsnapConfig
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let lookup = |key: &str| env_fn(key).ok().filter(|value| !value.is_empty());

    if let Some(python) = lookup(PYTHON_ENV_VAR) {
        tracing::debug!("{} overrides python: {}", PYTHON_ENV_VAR, python);
        config.python = Some(PathBuf::from(python));
    }
    if let Some(conda) = lookup(CONDA_ENV_VAR) {
        tracing::debug!("{} overrides conda: {}", CONDA_ENV_VAR, conda);
        config.conda = Some(PathBuf::from(conda));
    }
    config
}
