//! The snapshot value object.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{EnvsnapError, Result};
use crate::requirements::{FullRequirement, RequirementRecord, SimpleRequirement};

use super::text::{parse_lines, render_lines, LineSeparator};

/// The requirements needed to reproduce one Python environment.
///
/// Immutable once built. `primary_requirements` holds at most one record per
/// package; `secondary_requirements` is kept as the lower-level manager
/// reported it, for provenance.
///
/// # Example
///
/// ```
/// use envsnap::snapshot::{LineSeparator, Snapshot};
///
/// let snapshot = Snapshot::from_text("numpy==1.26.4\nrequests>=2.31\n", "3.11").unwrap();
/// assert_eq!(snapshot.runtime_version(), "3.11");
/// assert_eq!(
///     snapshot.to_text(&LineSeparator::default()),
///     "numpy==1.26.4\nrequests>=2.31"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    runtime_version: String,
    primary_requirements: Vec<FullRequirement>,
    secondary_requirements: Vec<SimpleRequirement>,
}

impl Snapshot {
    /// Build a snapshot from explicit values.
    ///
    /// `default_runtime` is used when `runtime_version` is `None`; callers
    /// pass the `major.minor` of the live interpreter, computed once.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRequirement` if two primary records name the same
    /// package.
    pub fn new(
        runtime_version: Option<String>,
        primary_requirements: Vec<FullRequirement>,
        secondary_requirements: Vec<SimpleRequirement>,
        default_runtime: &str,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for requirement in &primary_requirements {
            if !seen.insert(requirement.name()) {
                return Err(EnvsnapError::DuplicateRequirement {
                    name: requirement.name().to_string(),
                });
            }
        }

        Ok(Self {
            runtime_version: runtime_version.unwrap_or_else(|| default_runtime.to_string()),
            primary_requirements,
            secondary_requirements,
        })
    }

    /// Parse requirements text into a snapshot.
    ///
    /// Only the primary list is read; the secondary list is empty and the
    /// runtime version is `default_runtime`.
    pub fn from_text(text: &str, default_runtime: &str) -> Result<Self> {
        Self::new(None, parse_lines(text)?, Vec::new(), default_runtime)
    }

    /// Load a requirements file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, and any error of
    /// [`Snapshot::from_text`].
    pub fn from_requirements_file(path: &Path, default_runtime: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        tracing::debug!("Read {} bytes from {}", text.len(), path.display());
        Self::from_text(&text, default_runtime)
    }

    /// Render the primary requirements, one per line.
    ///
    /// The runtime version and secondary requirements are not part of the
    /// requirements format.
    pub fn to_text(&self, separator: &LineSeparator) -> String {
        render_lines(&self.primary_requirements, separator)
    }

    /// Write [`Snapshot::to_text`] to `path`, returning the number of bytes written.
    pub fn to_requirements_file(&self, path: &Path, separator: &LineSeparator) -> Result<usize> {
        let text = self.to_text(separator);
        fs::write(path, &text)?;
        tracing::debug!("Wrote {} requirements to {}", self.primary_requirements.len(), path.display());
        Ok(text.len())
    }

    /// Pretty JSON with every field, for provenance.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| anyhow::Error::from(e).into())
    }

    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    pub fn primary_requirements(&self) -> &[FullRequirement] {
        &self.primary_requirements
    }

    pub fn secondary_requirements(&self) -> &[SimpleRequirement] {
        &self.secondary_requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn reqs(lines: &[&str]) -> Vec<FullRequirement> {
        lines.iter().map(|l| l.parse().unwrap()).collect()
    }

    #[test]
    fn explicit_runtime_version_wins() {
        let snapshot = Snapshot::new(Some("3.9".into()), vec![], vec![], "3.12").unwrap();
        assert_eq!(snapshot.runtime_version(), "3.9");
    }

    #[test]
    fn missing_runtime_version_uses_default() {
        let snapshot = Snapshot::new(None, vec![], vec![], "3.10").unwrap();
        assert_eq!(snapshot.runtime_version(), "3.10");
        assert!(snapshot.primary_requirements().is_empty());
        assert!(snapshot.secondary_requirements().is_empty());
    }

    #[test]
    fn duplicate_primary_names_are_rejected() {
        let err = Snapshot::new(None, reqs(&["Foo_Bar==1", "foo-bar==2"]), vec![], "3.11").unwrap_err();
        assert!(matches!(err, EnvsnapError::DuplicateRequirement { ref name, .. } if name == "foo-bar"));
    }

    #[test]
    fn secondary_may_overlap_primary() {
        let secondary = vec!["numpy=1.26.4".parse().unwrap()];
        let snapshot = Snapshot::new(None, reqs(&["numpy==1.26.4"]), secondary, "3.11").unwrap();
        assert_eq!(snapshot.secondary_requirements().len(), 1);
    }

    #[test]
    fn text_round_trip_preserves_records() {
        let original = Snapshot::new(
            Some("3.11".into()),
            reqs(&[
                "numpy==1.26.4",
                "requests[socks]>=2.31,<3; python_version >= '3.8'",
                "pkg @ https://example.com/pkg-1.0.tar.gz",
            ]),
            vec!["python=3.11".parse().unwrap()],
            "3.11",
        )
        .unwrap();

        let text = original.to_text(&LineSeparator::default());
        let parsed = Snapshot::from_text(&text, "3.11").unwrap();
        assert_eq!(parsed.primary_requirements(), original.primary_requirements());
        assert!(parsed.secondary_requirements().is_empty());
    }

    #[test]
    fn crlf_text_round_trips() {
        let original = Snapshot::from_text("a==1\nb==2", "3.11").unwrap();
        let text = original.to_text(&LineSeparator::CrLf);
        assert_eq!(text, "a==1\r\nb==2");
        assert_eq!(Snapshot::from_text(&text, "3.11").unwrap(), original);
    }

    #[test]
    fn from_text_rejects_duplicates() {
        let err = Snapshot::from_text("numpy==1\nNumPy==2\n", "3.11").unwrap_err();
        assert!(matches!(err, EnvsnapError::DuplicateRequirement { .. }));
    }

    #[test]
    fn file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        let snapshot = Snapshot::from_text("click==8.1.7\nrich==13.7.0", "3.12").unwrap();

        let written = snapshot
            .to_requirements_file(&path, &LineSeparator::default())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "click==8.1.7\nrich==13.7.0");
        assert_eq!(written, content.len());

        let loaded = Snapshot::from_requirements_file(&path, "3.12").unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err =
            Snapshot::from_requirements_file(&temp.path().join("nope.txt"), "3.11").unwrap_err();
        assert!(matches!(err, EnvsnapError::Io(_)));
    }

    #[test]
    fn json_includes_every_field() {
        let snapshot = Snapshot::new(
            Some("3.11.4".into()),
            reqs(&["requests==2.31.0"]),
            vec!["openssl=3.2.1=hd590300_0".parse().unwrap()],
            "3.11",
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["runtime_version"], "3.11.4");
        assert_eq!(value["primary_requirements"][0], "requests==2.31.0");
        assert_eq!(value["secondary_requirements"][0], "openssl=3.2.1=hd590300_0");
    }
}
