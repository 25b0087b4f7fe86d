//! The Python interpreter whose environment is being captured.

use std::path::{Path, PathBuf};

use crate::error::{EnvsnapError, Result};
use crate::shell::{display_command, CommandRunner};

/// Prints executable, prefix and `major.minor`, one per line.
const PROBE_SCRIPT: &str =
    "import sys; print(sys.executable); print(sys.prefix); print('%d.%d' % sys.version_info[:2])";

/// Facts about a Python interpreter, gathered once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    executable: PathBuf,
    prefix: PathBuf,
    version: String,
}

impl Interpreter {
    pub fn new(executable: impl Into<PathBuf>, prefix: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            prefix: prefix.into(),
            version: version.into(),
        }
    }

    /// Ask `python` about itself.
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` if the interpreter cannot be run and
    /// `SourceQueryFailed` if its answer is not understood.
    pub fn discover<R: CommandRunner + ?Sized>(runner: &R, python: &Path) -> Result<Self> {
        let args = ["-c", PROBE_SCRIPT];
        let result = runner
            .run(python, &args)?
            .into_success(&display_command(python, &args))?;
        let interpreter = Self::parse_probe(&result.stdout)?;
        tracing::debug!(
            "Interpreter {} (Python {}, prefix {})",
            interpreter.executable.display(),
            interpreter.version,
            interpreter.prefix.display()
        );
        Ok(interpreter)
    }

    /// Parse the three lines printed by the probe script.
    pub fn parse_probe(output: &str) -> Result<Self> {
        let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
        let (Some(executable), Some(prefix), Some(version)) = (lines.next(), lines.next(), lines.next())
        else {
            return Err(probe_error("expected executable, prefix and version"));
        };

        let well_formed = version
            .split_once('.')
            .is_some_and(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.chars().all(|c| c.is_ascii_digit())
                    && minor.chars().all(|c| c.is_ascii_digit())
            });
        if !well_formed {
            return Err(probe_error(&format!("unexpected version '{}'", version)));
        }

        Ok(Self::new(executable, prefix, version))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// `major.minor` of the interpreter.
    pub fn version(&self) -> &str {
        &self.version
    }
}

fn probe_error(message: &str) -> EnvsnapError {
    EnvsnapError::SourceQueryFailed {
        manager: "python".to_string(),
        message: message.to_string(),
    }
}
