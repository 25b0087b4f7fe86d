//! Version specifiers (`>=1.0`, `==2.*`, `~=3.1`).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EnvsnapError, Result};

/// One comparison clause: operator followed by a version.
static CLAUSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(===|==|!=|<=|>=|~=|<|>)\s*([^\s,;()]+)$").expect("CLAUSE_REGEX must compile")
});

/// Version text accepted after every operator except `===`.
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!+._*-]*$").expect("VERSION_REGEX must compile")
});

/// Comparison operator of a version clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `===`
    Arbitrary,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `~=`
    Compatible,
    /// `<`
    Less,
    /// `>`
    Greater,
}

impl Comparator {
    /// The operator as written in a requirement line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arbitrary => "===",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Compatible => "~=",
            Self::Less => "<",
            Self::Greater => ">",
        }
    }

    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "===" => Self::Arbitrary,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            "~=" => Self::Compatible,
            "<" => Self::Less,
            ">" => Self::Greater,
            _ => return None,
        })
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<op><version>` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSpecifier {
    comparator: Comparator,
    version: String,
}

impl VersionSpecifier {
    /// Build a clause, validating the version text.
    pub fn new(comparator: Comparator, version: &str) -> Result<Self> {
        let version = version.trim();
        let valid = if comparator == Comparator::Arbitrary {
            !version.is_empty() && !version.contains(char::is_whitespace)
        } else {
            VERSION_REGEX.is_match(version)
        };
        if !valid {
            return Err(EnvsnapError::RequirementParse {
                line: format!("{}{}", comparator, version),
                message: "invalid version".to_string(),
            });
        }
        Ok(Self {
            comparator,
            version: version.to_string(),
        })
    }

    /// An exact `==version` pin.
    pub fn pinned(version: &str) -> Result<Self> {
        Self::new(Comparator::Equal, version)
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparator, self.version)
    }
}

impl FromStr for VersionSpecifier {
    type Err = EnvsnapError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = CLAUSE_REGEX
            .captures(s.trim())
            .ok_or_else(|| EnvsnapError::RequirementParse {
                line: s.to_string(),
                message: "expected an operator followed by a version".to_string(),
            })?;
        let comparator = Comparator::parse(&caps[1]).ok_or_else(|| EnvsnapError::RequirementParse {
            line: s.to_string(),
            message: format!("unknown operator '{}'", &caps[1]),
        })?;
        Self::new(comparator, &caps[2])
    }
}

/// An ordered, comma-separated list of clauses. Empty means "any version".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecifierSet(Vec<VersionSpecifier>);

impl SpecifierSet {
    /// The set containing only `==version`.
    pub fn pinned(version: &str) -> Result<Self> {
        Ok(Self(vec![VersionSpecifier::pinned(version)?]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionSpecifier> {
        self.0.iter()
    }

    /// The exact version when the set is a single `==` or `===` pin.
    ///
    /// Wildcard `==` pins (`==1.2.*`) are ranges, not versions. `===` compares
    /// strings, so a `*` there is literal.
    pub fn pinned_version(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => match only.comparator {
                Comparator::Equal if !only.version.contains('*') => Some(&only.version),
                Comparator::Arbitrary => Some(&only.version),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&clauses.join(","))
    }
}

impl FromStr for SpecifierSet {
    type Err = EnvsnapError;

    fn from_str(s: &str) -> Result<Self> {
        let mut text = s.trim();
        if let Some(inner) = text.strip_prefix('(') {
            text = inner
                .strip_suffix(')')
                .ok_or_else(|| EnvsnapError::RequirementParse {
                    line: s.to_string(),
                    message: "unbalanced parenthesis in version specifier".to_string(),
                })?
                .trim();
        }
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.split(',')
            .map(str::parse)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_operator() {
        for op in ["===", "==", "!=", "<=", ">=", "~=", "<", ">"] {
            let spec: VersionSpecifier = format!("{op}1.0").parse().unwrap();
            assert_eq!(spec.comparator().as_str(), op);
            assert_eq!(spec.version(), "1.0");
        }
    }

    #[test]
    fn tolerates_whitespace_between_operator_and_version() {
        let spec: VersionSpecifier = ">= 2.31.0".parse().unwrap();
        assert_eq!(spec.to_string(), ">=2.31.0");
    }

    #[test]
    fn rejects_missing_operator() {
        assert!("1.0".parse::<VersionSpecifier>().is_err());
    }

    #[test]
    fn rejects_missing_version() {
        assert!("==".parse::<VersionSpecifier>().is_err());
    }

    #[test]
    fn set_parses_comma_separated_clauses() {
        let set: SpecifierSet = ">=1.0, <2.0,!=1.5".parse().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_string(), ">=1.0,<2.0,!=1.5");
    }

    #[test]
    fn set_strips_parentheses() {
        let set: SpecifierSet = "(>=1.0,<2)".parse().unwrap();
        assert_eq!(set.to_string(), ">=1.0,<2");
    }

    #[test]
    fn set_rejects_unbalanced_parenthesis() {
        assert!("(>=1.0".parse::<SpecifierSet>().is_err());
    }

    #[test]
    fn empty_set_means_any_version() {
        let set: SpecifierSet = "".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn pinned_version_only_for_single_exact_pin() {
        assert_eq!(SpecifierSet::pinned("1.2").unwrap().pinned_version(), Some("1.2"));
        let wildcard: SpecifierSet = "==1.2.*".parse().unwrap();
        assert_eq!(wildcard.pinned_version(), None);
        let range: SpecifierSet = ">=1,<2".parse().unwrap();
        assert_eq!(range.pinned_version(), None);
        let arbitrary: SpecifierSet = "===foobar".parse().unwrap();
        assert_eq!(arbitrary.pinned_version(), Some("foobar"));
    }

    #[test]
    fn arbitrary_pin_keeps_literal_star() {
        let arbitrary: SpecifierSet = "===1.0*".parse().unwrap();
        assert_eq!(arbitrary.pinned_version(), Some("1.0*"));
    }

    #[test]
    fn local_and_epoch_versions_are_accepted() {
        assert!("==1!2.0+cpu".parse::<VersionSpecifier>().is_ok());
    }
}
