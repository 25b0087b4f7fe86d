//! Error types for envsnap operations.
//!
//! This module defines [`EnvsnapError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Single-item operations (parsing one line, reading one file) fail as a whole
//! - Batch scans skip unreportable packages and report them alongside the results
//! - Use `anyhow::Error` (via `EnvsnapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envsnap operations.
#[derive(Debug, Error)]
pub enum EnvsnapError {
    /// A requirement line does not follow the specifier syntax.
    #[error("Invalid requirement '{line}': {message}")]
    RequirementParse { line: String, message: String },

    /// A requirement cannot be carried to another machine (editable or local install).
    #[error("Unsupported requirement '{requirement}': {reason}")]
    UnsupportedRequirement { requirement: String, reason: String },

    /// The same package appears twice in a requirement list.
    #[error("Duplicate requirement for package '{name}'")]
    DuplicateRequirement { name: String },

    /// An installed package could not be reported (raise policy only).
    #[error("Cannot report installed package '{name}': {reason}")]
    UnreportablePackage { name: String, reason: String },

    /// A package manager returned output that could not be understood.
    #[error("Failed to query {manager}: {message}")]
    SourceQueryFailed { manager: String, message: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for envsnap operations.
pub type Result<T> = std::result::Result<T, EnvsnapError>;
