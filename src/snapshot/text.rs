//! The plain-text requirements format.
//!
//! One requirement per line. Output always uses the separator the caller
//! asks for (`\n` unless told otherwise), never the host's native line
//! ending, so a file written on Windows can be copied straight into a
//! container build context.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::requirements::FullRequirement;

/// Separator placed between requirement lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSeparator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// Anything else the caller wants between lines.
    Custom(String),
}

impl LineSeparator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Custom(sep) => sep,
        }
    }
}

impl fmt::Display for LineSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("lf"),
            Self::CrLf => f.write_str("crlf"),
            Self::Custom(sep) => write!(f, "{:?}", sep),
        }
    }
}

/// Join requirement lines with `separator`. No trailing separator is added.
pub fn render_lines(requirements: &[FullRequirement], separator: &LineSeparator) -> String {
    requirements
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Parse every requirement line of `text`.
///
/// Blank lines and comments are skipped; `\r\n` endings are accepted. The
/// first malformed line aborts the whole parse.
pub fn parse_lines(text: &str) -> Result<Vec<FullRequirement>> {
    text.trim_end()
        .lines()
        .map(strip_comment)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim().parse())
        .collect()
}

/// Cut a trailing comment: a `#` at the start of the line or after
/// whitespace, outside any quoted marker string.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    let mut previous = None;
    for (index, c) in line.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '#') if previous.is_none_or(char::is_whitespace) => return &line[..index],
            (None, _) => {}
        }
        previous = Some(c);
    }
    line
}
