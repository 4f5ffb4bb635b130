//! `texdock watch` - monitor sources and recompile on changes.

use std::path::{Path, PathBuf};

use crate::cli::commands::{Command, CommandResult};
use crate::config::Config;
use crate::docker::{docker_available, DockerCompose};
use crate::error::{Result, TexdockError};
use crate::ui;
use crate::watch::watch_project;

pub struct WatchCommand {
    project_root: PathBuf,
}

impl WatchCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl Command for WatchCommand {
    fn execute(&self) -> Result<CommandResult> {
        let config = Config::load(&self.project_root)?;

        if !docker_available() {
            return Err(TexdockError::CommandFailed {
                command: "docker version".to_string(),
                code: None,
            });
        }

        let runner = DockerCompose::new(self.project_root.join(&config.compose_file));
        watch_project(&self.project_root, &config, &runner, &mut ui::confirm)?;

        Ok(CommandResult::success())
    }
}
