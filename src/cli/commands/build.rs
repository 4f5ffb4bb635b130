//! `texdock build` - compile the document once.

use std::path::{Path, PathBuf};

use crate::build::{run_build, BuildOptions};
use crate::cli::args::BuildArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::config::Config;
use crate::docker::{docker_available, DockerCompose};
use crate::error::{Result, TexdockError};
use crate::ui;

pub struct BuildCommand {
    project_root: PathBuf,
    args: BuildArgs,
}

impl BuildCommand {
    pub fn new(project_root: &Path, args: BuildArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for BuildCommand {
    fn execute(&self) -> Result<CommandResult> {
        ui::info("Compiling LaTeX document...");

        let config = Config::load(&self.project_root)?;

        if !docker_available() {
            return Err(TexdockError::CommandFailed {
                command: "docker version".to_string(),
                code: None,
            });
        }

        let runner = DockerCompose::new(self.project_root.join(&config.compose_file));
        let options = BuildOptions {
            engine: self.args.engine.clone(),
            clean_first: self.args.clean,
        };

        run_build(
            &self.project_root,
            &config,
            &runner,
            &options,
            &mut ui::confirm,
        )?;

        Ok(CommandResult::success())
    }
}
