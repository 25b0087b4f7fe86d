//! Canonical package names.
//!
//! Package managers disagree on how a name is spelled (`PyYAML`, `pyyaml`,
//! `ruamel.yaml`, `ruamel_yaml`). Every comparison in envsnap goes through
//! [`PackageName`], which lowercases and folds separator runs so that those
//! spellings collapse onto a single key.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EnvsnapError, Result};

/// Letters, digits and separators; must start and end alphanumeric.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9._-]*[a-z0-9])?$").expect("NAME_REGEX must compile")
});

/// Runs of `-`, `_` and `.` fold into a single `-`.
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("SEPARATOR_REGEX must compile"));

/// Normalize a raw package name without validating it.
///
/// ```
/// use envsnap::requirements::normalize_name;
///
/// assert_eq!(normalize_name("Foo_Bar"), "foo-bar");
/// assert_eq!(normalize_name("ruamel.yaml"), "ruamel-yaml");
/// ```
pub fn normalize_name(raw: &str) -> String {
    SEPARATOR_REGEX
        .replace_all(&raw.trim().to_ascii_lowercase(), "-")
        .into_owned()
}

/// A validated, normalized package name.
///
/// Equality, ordering and hashing all use the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Validate and normalize a raw name.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !NAME_REGEX.is_match(trimmed) {
            return Err(EnvsnapError::RequirementParse {
                line: raw.to_string(),
                message: "package names must start and end with a letter or digit".to_string(),
            });
        }
        Ok(Self(normalize_name(trimmed)))
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether a raw, unnormalized name refers to this package.
    pub fn matches(&self, raw: &str) -> bool {
        normalize_name(raw) == self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = EnvsnapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PackageName {
    type Error = EnvsnapError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
