//! The `show` command: validate a requirements file and print it back.

use std::path::{Path, PathBuf};

use crate::cli::args::ShowArgs;
use crate::error::Result;
use crate::snapshot::{LineSeparator, Snapshot};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Shown as the runtime version of a file-based snapshot; requirements
/// files do not record one.
const UNKNOWN_RUNTIME: &str = "unknown";

/// The show command implementation.
pub struct ShowCommand {
    project_root: PathBuf,
    args: ShowArgs,
}

impl ShowCommand {
    pub fn new(project_root: &Path, args: ShowArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for ShowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = self.project_root.join(&self.args.file);
        let snapshot = Snapshot::from_requirements_file(&path, UNKNOWN_RUNTIME)?;

        if self.args.json {
            ui.emit(&snapshot.to_json()?);
        } else if !snapshot.primary_requirements().is_empty() {
            ui.emit(&snapshot.to_text(&LineSeparator::default()));
        }

        ui.success(&format!(
            "{} requirements in {}",
            snapshot.primary_requirements().len(),
            path.display()
        ));
        Ok(CommandResult::success())
    }
}
