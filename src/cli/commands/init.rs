//! `texdock init` - scaffold a new document from a template.

use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::config::Config;
use crate::error::{Result, TexdockError};
use crate::template::{Loader, ProjectInfo, Registry};
use crate::ui;

pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for InitCommand {
    fn execute(&self) -> Result<CommandResult> {
        ui::info("Initializing new LaTeX document...");

        let config = Config::load(&self.project_root)?;
        let source_dir = config.source_path(&self.project_root);

        let main_tex = source_dir.join("main.tex");
        if main_tex.exists() && !self.args.force {
            return Err(anyhow::anyhow!(
                "A document already exists at {}. Use --force to overwrite",
                main_tex.display()
            )
            .into());
        }

        let mut registry = Registry::new();
        for root in config.template_roots(&self.project_root) {
            registry.add_path(root);
        }
        registry.load()?;

        if !registry.exists(&self.args.template) {
            let available = registry.list();
            if !available.is_empty() {
                ui::info("Available templates:");
                for template in available {
                    println!(
                        "  - {}: {}",
                        template.metadata.name, template.metadata.description
                    );
                }
            }
            return Err(TexdockError::TemplateNotFound {
                name: self.args.template.clone(),
            });
        }

        let info = ProjectInfo {
            title: self
                .args
                .title
                .clone()
                .unwrap_or_else(|| "Untitled Document".to_string()),
            author: self.args.author.clone().unwrap_or_else(|| "Author".to_string()),
            r#type: self.args.template.clone(),
            language: self.args.language.clone(),
            bibliography: true,
        };

        let loader = Loader::new(&registry);
        loader.create_project(
            &self.args.template,
            &info,
            &source_dir,
            &config.output_path(&self.project_root),
        )?;

        ui::success("LaTeX document initialized");
        ui::info(&format!("Files created in: {}", source_dir.display()));
        ui::info("To compile: texdock build");

        Ok(CommandResult::success())
    }
}
