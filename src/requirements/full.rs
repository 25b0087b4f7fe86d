//! Pip-style requirement specifiers.
//!
//! Handles the subset of requirement syntax that shows up in a captured
//! environment: `name[extras] <specifiers> ; <marker>` and
//! `name[extras] @ <url> ; <marker>`. Markers are kept as opaque text; they are
//! carried through unchanged, never evaluated.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EnvsnapError, Result};

use super::name::PackageName;
use super::record::RequirementRecord;
use super::specifier::SpecifierSet;

/// Name, optional `[extras]`, then everything else.
static REQUIREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<rest>.*)$")
        .expect("REQUIREMENT_REGEX must compile")
});

/// `scheme://...`
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://\S+$").expect("URL_REGEX must compile")
});

/// `C:\...` or `C:/...`
static DRIVE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("DRIVE_PATH_REGEX must compile"));

/// A fully specified requirement as pip understands it.
///
/// # Example
///
/// ```
/// use envsnap::requirements::{FullRequirement, RequirementRecord};
///
/// let req: FullRequirement = "Requests[Security] >= 2.0 ; python_version > '3.8'"
///     .parse()
///     .unwrap();
/// assert_eq!(req.name().as_str(), "requests");
/// assert_eq!(req.to_string(), "requests[security]>=2.0; python_version > '3.8'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullRequirement {
    name: PackageName,
    extras: Vec<PackageName>,
    specifiers: SpecifierSet,
    url: Option<String>,
    marker: Option<String>,
}

impl FullRequirement {
    /// A requirement on any version of `name`.
    pub fn new(name: PackageName) -> Self {
        Self {
            name,
            extras: Vec::new(),
            specifiers: SpecifierSet::default(),
            url: None,
            marker: None,
        }
    }

    /// A `name==version` pin, as reported by an installed package.
    pub fn pinned(name: &str, version: &str) -> Result<Self> {
        Ok(Self::new(PackageName::new(name)?).with_specifiers(SpecifierSet::pinned(version)?))
    }

    /// Add an extra.
    pub fn with_extra(mut self, extra: PackageName) -> Self {
        if !self.extras.contains(&extra) {
            self.extras.push(extra);
        }
        self
    }

    /// Replace the version specifiers.
    pub fn with_specifiers(mut self, specifiers: SpecifierSet) -> Self {
        self.specifiers = specifiers;
        self
    }

    /// Set a direct URL reference.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the environment marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn extras(&self) -> &[PackageName] {
        &self.extras
    }

    pub fn specifiers(&self) -> &SpecifierSet {
        &self.specifiers
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}

impl RequirementRecord for FullRequirement {
    fn name(&self) -> &PackageName {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        self.specifiers.pinned_version()
    }
}

impl fmt::Display for FullRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            let extras: Vec<&str> = self.extras.iter().map(PackageName::as_str).collect();
            write!(f, "[{}]", extras.join(","))?;
        }
        if let Some(url) = &self.url {
            write!(f, " @ {}", url)?;
            if let Some(marker) = &self.marker {
                // a URL may itself contain ';', so the marker needs a leading space
                write!(f, " ; {}", marker)?;
            }
            return Ok(());
        }
        write!(f, "{}", self.specifiers)?;
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

impl FromStr for FullRequirement {
    type Err = EnvsnapError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        reject_untransportable(line)?;

        let caps = REQUIREMENT_REGEX
            .captures(line)
            .ok_or_else(|| parse_error(line, "expected a package name"))?;
        let mut requirement = Self::new(PackageName::new(&caps["name"]).map_err(|_| {
            parse_error(line, "package names must start and end with a letter or digit")
        })?);

        if let Some(extras) = caps.name("extras") {
            for extra in extras.as_str().split(',').map(str::trim) {
                if extra.is_empty() {
                    continue;
                }
                let extra =
                    PackageName::new(extra).map_err(|_| parse_error(line, "invalid extra name"))?;
                requirement = requirement.with_extra(extra);
            }
        }

        let rest = caps["rest"].trim();
        if let Some(reference) = rest.strip_prefix('@') {
            let (url, marker) = split_url_marker(line, reference.trim())?;
            check_url(line, url)?;
            requirement = requirement.with_url(url);
            if let Some(marker) = marker {
                requirement = requirement.with_marker(check_marker(line, marker)?);
            }
            return Ok(requirement);
        }

        let (specifiers, marker) = match rest.split_once(';') {
            Some((specifiers, marker)) => (specifiers, Some(marker)),
            None => (rest, None),
        };
        let specifiers: SpecifierSet = specifiers.parse().map_err(|e| match e {
            EnvsnapError::RequirementParse { message, .. } => parse_error(line, &message),
            other => other,
        })?;
        requirement = requirement.with_specifiers(specifiers);
        if let Some(marker) = marker {
            requirement = requirement.with_marker(check_marker(line, marker)?);
        }
        Ok(requirement)
    }
}

impl TryFrom<String> for FullRequirement {
    type Error = EnvsnapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FullRequirement> for String {
    fn from(requirement: FullRequirement) -> Self {
        requirement.to_string()
    }
}

/// Editable installs, local paths and pip option lines only make sense on the
/// machine that produced them.
fn reject_untransportable(line: &str) -> Result<()> {
    let unsupported = |reason: &str| {
        Err(EnvsnapError::UnsupportedRequirement {
            requirement: line.to_string(),
            reason: reason.to_string(),
        })
    };

    if line == "-e" || line.starts_with("-e ") || line.starts_with("--editable") {
        return unsupported("editable installs cannot be captured");
    }
    if line.starts_with('-') {
        return unsupported("pip options are not requirements");
    }
    if line.starts_with('.')
        || line.starts_with('/')
        || line.starts_with('~')
        || line.starts_with('\\')
        || line.to_ascii_lowercase().starts_with("file:")
        || DRIVE_PATH_REGEX.is_match(line)
    {
        return unsupported("local path installs cannot be captured");
    }
    Ok(())
}

fn split_url_marker<'a>(line: &str, reference: &'a str) -> Result<(&'a str, Option<&'a str>)> {
    let Some(end) = reference.find(char::is_whitespace) else {
        return Ok((reference, None));
    };
    let tail = reference[end..].trim_start();
    if tail.is_empty() {
        return Ok((&reference[..end], None));
    }
    let marker = tail
        .strip_prefix(';')
        .ok_or_else(|| parse_error(line, "unexpected text after URL"))?;
    Ok((&reference[..end], Some(marker)))
}

fn check_url(line: &str, url: &str) -> Result<()> {
    let caps = URL_REGEX
        .captures(url)
        .ok_or_else(|| parse_error(line, "expected a URL after '@'"))?;
    if caps["scheme"].eq_ignore_ascii_case("file") {
        return Err(EnvsnapError::UnsupportedRequirement {
            requirement: line.to_string(),
            reason: "local path installs cannot be captured".to_string(),
        });
    }
    Ok(())
}

fn check_marker<'a>(line: &str, marker: &'a str) -> Result<&'a str> {
    let marker = marker.trim();
    if marker.is_empty() {
        return Err(parse_error(line, "empty environment marker"));
    }
    let mut quote = None;
    for c in marker.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {}
        }
    }
    if quote.is_some() {
        return Err(parse_error(line, "unterminated string in environment marker"));
    }
    Ok(marker)
}

fn parse_error(line: &str, message: &str) -> EnvsnapError {
    EnvsnapError::RequirementParse {
        line: line.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> FullRequirement {
        line.parse().unwrap()
    }

    #[test]
    fn bare_name() {
        let req = parse("numpy");
        assert_eq!(req.name().as_str(), "numpy");
        assert!(req.specifiers().is_empty());
        assert_eq!(req.version(), None);
        assert_eq!(req.to_string(), "numpy");
    }

    #[test]
    fn pinned_version_is_reported() {
        let req = parse("numpy==1.26.4");
        assert_eq!(req.version(), Some("1.26.4"));
        assert_eq!(req.to_string(), "numpy==1.26.4");
    }

    #[test]
    fn name_is_normalized() {
        assert_eq!(parse("Typing_Extensions==4.9").name().as_str(), "typing-extensions");
    }

    #[test]
    fn extras_and_marker_are_preserved() {
        let req = parse("uvicorn[standard, Socks]>=0.20; sys_platform == 'linux'");
        let extras: Vec<&str> = req.extras().iter().map(PackageName::as_str).collect();
        assert_eq!(extras, vec!["standard", "socks"]);
        assert_eq!(req.marker(), Some("sys_platform == 'linux'"));
        assert_eq!(
            req.to_string(),
            "uvicorn[standard,socks]>=0.20; sys_platform == 'linux'"
        );
    }

    #[test]
    fn parenthesized_specifiers() {
        let req = parse("django (>=4.2, <5)");
        assert_eq!(req.to_string(), "django>=4.2,<5");
    }

    #[test]
    fn url_reference() {
        let req = parse("pkg @ https://example.com/pkg-1.0.tar.gz");
        assert_eq!(req.url(), Some("https://example.com/pkg-1.0.tar.gz"));
        assert_eq!(req.to_string(), "pkg @ https://example.com/pkg-1.0.tar.gz");
    }

    #[test]
    fn url_reference_with_marker() {
        let req = parse("pkg @ https://example.com/pkg.whl ; python_version >= '3.9'");
        assert_eq!(req.marker(), Some("python_version >= '3.9'"));
        assert_eq!(
            req.to_string(),
            "pkg @ https://example.com/pkg.whl ; python_version >= '3.9'"
        );
    }

    #[test]
    fn canonical_form_parses_back_to_same_value() {
        for line in [
            "numpy==1.2",
            "requests[socks,security]>=2.0,<3; python_version < '3.12'",
            "pkg @ git+https://github.com/org/pkg@v1 ; os_name == 'nt'",
            "weird===custom-build",
            "pkg==1.0; platform_version == 'x #1'",
        ] {
            let req = parse(line);
            assert_eq!(parse(&req.to_string()), req, "round trip of {line}");
        }
    }

    #[test]
    fn editable_installs_are_unsupported() {
        for line in ["-e .", "-e git+https://github.com/org/pkg#egg=pkg", "--editable ./pkg"] {
            let err = line.parse::<FullRequirement>().unwrap_err();
            assert!(
                matches!(err, EnvsnapError::UnsupportedRequirement { .. }),
                "{line} gave {err:?}"
            );
        }
    }

    #[test]
    fn local_paths_are_unsupported() {
        for line in [
            "./pkg",
            "../pkg.whl",
            "/opt/wheels/pkg.whl",
            "~/src/pkg",
            "file:///tmp/pkg.whl",
            "C:\\wheels\\pkg.whl",
            "pkg @ file:///tmp/pkg.whl",
        ] {
            let err = line.parse::<FullRequirement>().unwrap_err();
            assert!(
                matches!(err, EnvsnapError::UnsupportedRequirement { .. }),
                "{line} gave {err:?}"
            );
        }
    }

    #[test]
    fn option_lines_are_unsupported() {
        let err = "-r other.txt".parse::<FullRequirement>().unwrap_err();
        assert!(matches!(err, EnvsnapError::UnsupportedRequirement { .. }));
    }

    #[test]
    fn malformed_lines_fail_to_parse() {
        for line in [
            "",
            "numpy==",
            "numpy 1.0",
            "numpy[",
            "pkg @ not-a-url",
            "pkg @ https://example.com/p.whl trailing",
            "numpy==1;",
            "pkg==1.0; platform_version == 'x",
            "pkg @ https://example.com/p.whl ; os_name == \"nt",
        ] {
            let err = line.parse::<FullRequirement>().unwrap_err();
            assert!(
                matches!(err, EnvsnapError::RequirementParse { .. }),
                "{line:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn pinned_constructor_validates() {
        let req = FullRequirement::pinned("Click", "8.1.7").unwrap();
        assert_eq!(req.to_string(), "click==8.1.7");
        assert!(FullRequirement::pinned("click", "").is_err());
    }

    #[test]
    fn serializes_as_requirement_line() {
        let req = parse("Flask[async]==3.0.0");
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, "\"flask[async]==3.0.0\"");
        let back: FullRequirement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }
}
