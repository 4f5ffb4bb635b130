//! `texdock status` - show project and container state.

use std::path::{Path, PathBuf};

use crate::cli::commands::{Command, CommandResult};
use crate::config::Config;
use crate::docker::{docker_available, ComposeRunner, DockerCompose};
use crate::error::Result;
use crate::ui;

pub struct StatusCommand {
    project_root: PathBuf,
}

impl StatusCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self) -> Result<CommandResult> {
        let config = Config::load(&self.project_root)?;

        ui::info("Project");
        println!("  root:       {}", self.project_root.display());
        println!("  engine:     {}", config.latex_engine);
        println!("  source dir: {}", config.source_dir.display());
        println!("  output dir: {}", config.output_dir.display());
        println!("  container:  {}", config.container_name);

        let main_tex = config.source_path(&self.project_root).join("main.tex");
        if main_tex.exists() {
            println!("  document:   {}", main_tex.display());
        } else {
            println!("  document:   not initialized (run `texdock init`)");
        }
        println!();

        ui::info("Docker");
        if !docker_available() {
            println!("  docker: not available");
            return Ok(CommandResult::success());
        }
        println!("  docker: available");

        // Best-effort container probe; any failure just reads as "down".
        let runner = DockerCompose::new(self.project_root.join(&config.compose_file));
        let up = runner
            .output(&["ps", "-q", &config.container_name])
            .map(|r| r.success && !r.stdout.trim().is_empty())
            .unwrap_or(false);
        println!(
            "  container {}: {}",
            config.container_name,
            if up { "running" } else { "not running" }
        );

        Ok(CommandResult::success())
    }
}
