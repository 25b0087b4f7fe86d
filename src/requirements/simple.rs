//! Conda-style requirements: a name with an optional exact version and build.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EnvsnapError, Result};

use super::name::PackageName;
use super::record::RequirementRecord;

/// `name`, `name=version`, `name==version` or `name=version=build`.
static CONDA_SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)(?:==?(?P<version>[^=\s]+)(?:=(?P<build>[^=\s]+))?)?$")
        .expect("CONDA_SPEC_REGEX must compile")
});

/// A package pinned by conda.
///
/// ```
/// use envsnap::requirements::{RequirementRecord, SimpleRequirement};
///
/// let req: SimpleRequirement = "python=3.11.4=h955ad1f_0".parse().unwrap();
/// assert_eq!(req.name().as_str(), "python");
/// assert_eq!(req.version(), Some("3.11.4"));
/// assert_eq!(req.build(), Some("h955ad1f_0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SimpleRequirement {
    name: PackageName,
    version: Option<String>,
    build: Option<String>,
}

impl SimpleRequirement {
    pub fn new(name: PackageName, version: Option<String>) -> Self {
        Self {
            name,
            version,
            build: None,
        }
    }

    /// Attach a build string. Ignored when no version is set.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        if self.version.is_some() {
            self.build = Some(build.into());
        }
        self
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }
}

impl RequirementRecord for SimpleRequirement {
    fn name(&self) -> &PackageName {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Display for SimpleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, "={}", version)?;
            if let Some(build) = &self.build {
                write!(f, "={}", build)?;
            }
        }
        Ok(())
    }
}

impl FromStr for SimpleRequirement {
    type Err = EnvsnapError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let caps = CONDA_SPEC_REGEX
            .captures(line)
            .ok_or_else(|| EnvsnapError::RequirementParse {
                line: line.to_string(),
                message: "expected name[=version[=build]]".to_string(),
            })?;
        let name = PackageName::new(&caps["name"])?;
        let requirement = Self::new(name, caps.name("version").map(|m| m.as_str().to_string()));
        Ok(match caps.name("build") {
            Some(build) => requirement.with_build(build.as_str()),
            None => requirement,
        })
    }
}

impl TryFrom<String> for SimpleRequirement {
    type Error = EnvsnapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SimpleRequirement> for String {
    fn from(requirement: SimpleRequirement) -> Self {
        requirement.to_string()
    }
}
