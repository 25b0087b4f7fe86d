//! The `capture` command: snapshot a live Python environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::CaptureArgs;
use crate::config::{apply_env_overrides, load_config, EnvsnapConfig};
use crate::detection::EnvironmentDetector;
use crate::error::Result;
use crate::shell::{CommandOptions, CommandRunner, SystemRunner};
use crate::snapshot::{Capture, LineSeparator, Snapshot};
use crate::sources::{CondaCli, Interpreter, PipCli};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

#[cfg(windows)]
const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
const DEFAULT_PYTHON: &str = "python3";

const DEFAULT_CONDA: &str = "conda";

/// The capture command implementation.
pub struct CaptureCommand<R = SystemRunner> {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: CaptureArgs,
    runner: R,
}

impl CaptureCommand {
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: CaptureArgs) -> Self {
        let mut options = CommandOptions {
            cwd: Some(project_root.to_path_buf()),
            ..Default::default()
        };
        options
            .env
            .insert("PYTHONIOENCODING".to_string(), "utf-8".to_string());

        Self::with_runner(project_root, config_override, args, SystemRunner::new(options))
    }
}

impl<R: CommandRunner> CaptureCommand<R> {
    /// Create a capture command that runs package managers through `runner`.
    pub fn with_runner(
        project_root: &Path,
        config_override: Option<&Path>,
        args: CaptureArgs,
        runner: R,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
            runner,
        }
    }

    fn load_config(&self) -> Result<EnvsnapConfig> {
        let config = load_config(&self.project_root, self.config_override.as_deref())?;
        Ok(apply_env_overrides(config))
    }

    fn capture(&self, config: &EnvsnapConfig) -> Result<Capture> {
        let python = self
            .args
            .python
            .clone()
            .or_else(|| config.python.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON));
        let interpreter = Interpreter::discover(&self.runner, &python)?;

        let kind = match self.args.environment.or(config.environment) {
            Some(kind) => {
                tracing::debug!("Environment kind set to {}", kind);
                kind
            }
            None => EnvironmentDetector::detect(&interpreter),
        };

        let conda_executable = self
            .args
            .conda
            .clone()
            .or_else(|| config.conda.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONDA));
        let conda = CondaCli::new(
            &self.runner,
            conda_executable,
            Some(interpreter.prefix().to_path_buf()),
        );
        let pip = PipCli::new(&self.runner, interpreter.executable());

        let mut options = config.capture_options();
        if self.args.top_level {
            options.include_nested = false;
        }
        if let Some(policy) = self.args.on_unreportable {
            options.on_unreportable = policy;
        }

        tracing::debug!(
            "Capturing {} environment at {}",
            kind,
            interpreter.prefix().display()
        );
        Snapshot::from_environment(kind, &conda, &pip, &options, interpreter.version())
    }

    fn separator(&self, config: &EnvsnapConfig) -> LineSeparator {
        if self.args.crlf {
            LineSeparator::CrLf
        } else {
            config.line_separator.clone().unwrap_or_default()
        }
    }
}

impl<R: CommandRunner> Command for CaptureCommand<R> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.load_config()?;
        let Capture { snapshot, skipped } = self.capture(&config)?;

        for package in &skipped {
            ui.warning(&format!("Skipped {}: {}", package.name, package.reason));
        }

        let output = if self.args.json {
            snapshot.to_json()?
        } else {
            snapshot.to_text(&self.separator(&config))
        };

        match &self.args.output {
            Some(path) => {
                let path = self.project_root.join(path);
                fs::write(&path, &output)?;
                ui.success(&format!(
                    "Wrote {} requirements for Python {} to {}",
                    snapshot.primary_requirements().len(),
                    snapshot.runtime_version(),
                    path.display()
                ));
            }
            None if output.is_empty() => {
                ui.message("No requirements to report");
            }
            None => ui.emit(&output),
        }

        Ok(CommandResult::success())
    }
}
