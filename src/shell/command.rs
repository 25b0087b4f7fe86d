//! External command execution.
//!
//! Package managers are queried by running them directly (no intermediate
//! shell), so arguments never need quoting and the executable that answers
//! is exactly the one configured.

use crate::error::{EnvsnapError, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Turn a non-zero exit into [`EnvsnapError::CommandFailed`].
    pub fn into_success(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            if !self.stderr.trim().is_empty() {
                tracing::debug!("{} stderr: {}", command, self.stderr.trim());
            }
            Err(EnvsnapError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
            })
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,
}

/// Something that can run a program and capture its output.
///
/// Sources take a runner so tests can answer with canned output instead of
/// spawning real package managers.
pub trait CommandRunner {
    /// Run `program` with `args`, capturing stdout and stderr.
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandResult>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandResult> {
        (**self).run(program, args)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    options: CommandOptions,
}

impl SystemRunner {
    pub fn new(options: CommandOptions) -> Self {
        Self { options }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandResult> {
        execute(program, args, &self.options)
    }
}

/// Execute a program and capture its output.
pub fn execute<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = display_command(program, args);
    tracing::debug!("Running: {}", rendered);

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", rendered, e);
        EnvsnapError::CommandFailed {
            command: rendered.clone(),
            code: None,
        }
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let result = if output.status.success() {
        CommandResult::success(stdout, stderr, duration)
    } else {
        CommandResult::failure(output.status.code(), stdout, stderr, duration)
    };
    tracing::debug!(
        "{} exited with {:?} after {:?}",
        rendered,
        result.exit_code,
        result.duration
    );
    Ok(result)
}

/// Render a program and its arguments for messages.
pub fn display_command<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(
        args.iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let result = execute(&sh(), &["-c", "echo hello"], &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command() {
        let result = execute(&sh(), &["-c", "exit 3"], &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_env() {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = execute(&sh(), &["-c", "echo $MY_VAR"], &options).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let result = execute(&sh(), &["-c", "pwd"], &options).unwrap();

        assert!(result.success);
        let name = temp.path().file_name().unwrap().to_string_lossy();
        assert!(result.stdout.contains(name.as_ref()));
    }

    #[cfg(unix)]
    #[test]
    fn execute_measures_duration() {
        let result = execute(&sh(), &["-c", "sleep 0.05"], &CommandOptions::default()).unwrap();
        assert!(result.duration >= Duration::from_millis(50));
    }

    #[cfg(unix)]
    #[test]
    fn execute_captures_stderr() {
        let result = execute(&sh(), &["-c", "echo oops >&2"], &CommandOptions::default()).unwrap();
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn missing_program_is_command_failed() {
        let err = execute(
            Path::new("/definitely/not/a/real/program"),
            &["--version"],
            &CommandOptions::default(),
        )
        .unwrap_err();

        match err {
            EnvsnapError::CommandFailed { command, code } => {
                assert!(command.contains("--version"));
                assert_eq!(code, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn into_success_maps_failure() {
        let result = CommandResult::failure(Some(1), String::new(), "bad".into(), Duration::ZERO);
        let err = result.into_success("conda list").unwrap_err();
        assert!(matches!(err, EnvsnapError::CommandFailed { code: Some(1), .. }));

        let ok = CommandResult::success("out".into(), String::new(), Duration::ZERO);
        assert_eq!(ok.into_success("conda list").unwrap().stdout, "out");
    }

    #[test]
    fn display_command_joins_arguments() {
        assert_eq!(
            display_command(Path::new("python"), &["-m", "pip", "list"]),
            "python -m pip list"
        );
    }
}
