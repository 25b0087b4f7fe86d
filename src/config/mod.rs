//! Configuration loading for envsnap.
//!
//! - Schema in [`schema`]
//! - File discovery, loading and env var overrides in [`loader`]
//! - Deep merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use envsnap::config::load_merged_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".envsnap");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "include_nested: false").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.include_nested, Some(false));
//! ```
//!
//! # Configuration File Locations
//!
//! 1. Project config (`.envsnap/config.yml`)
//! 2. Local overrides (`.envsnap/config.local.yml`)
//!
//! `ENVSNAP_PYTHON` and `ENVSNAP_CONDA` override both, and command-line
//! flags override everything.

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    apply_env_overrides, apply_env_overrides_with, load_config,
    load_config_value, load_merged_config, ConfigPaths, CONDA_ENV_VAR, CONFIG_DIR, PYTHON_ENV_VAR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::EnvsnapConfig;
