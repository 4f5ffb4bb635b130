//! `texdock clean` - remove LaTeX auxiliary files.

use std::path::{Path, PathBuf};

use crate::build::clean;
use crate::cli::args::CleanArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::config::Config;
use crate::error::Result;
use crate::ui;

pub struct CleanCommand {
    project_root: PathBuf,
    args: CleanArgs,
}

impl CleanCommand {
    pub fn new(project_root: &Path, args: CleanArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for CleanCommand {
    fn execute(&self) -> Result<CommandResult> {
        ui::info("Cleaning auxiliary files...");

        let config = Config::load(&self.project_root)?;
        let removed = clean(&self.project_root, &config, self.args.all)?;

        if removed == 0 {
            ui::info("No auxiliary files found");
        } else {
            ui::success(&format!("{removed} file(s) removed"));
        }

        Ok(CommandResult::success())
    }
}
