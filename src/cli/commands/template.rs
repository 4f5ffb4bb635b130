//! `texdock template` - list and validate templates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::args::TemplateCommands;
use crate::cli::commands::{Command, CommandResult};
use crate::config::Config;
use crate::error::Result;
use crate::template::{Registry, Template, METADATA_FILE};
use crate::ui;

pub struct TemplateCommand<'a> {
    project_root: PathBuf,
    subcommand: &'a TemplateCommands,
}

impl<'a> TemplateCommand<'a> {
    pub fn new(project_root: &Path, subcommand: &'a TemplateCommands) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            subcommand,
        }
    }

    fn load_registry(&self) -> Result<Registry> {
        let config = Config::load(&self.project_root)?;
        let mut registry = Registry::new();
        for root in config.template_roots(&self.project_root) {
            registry.add_path(root);
        }
        registry.load()?;
        Ok(registry)
    }

    fn list(&self) -> Result<CommandResult> {
        let registry = self.load_registry()?;
        let templates = registry.list();

        if templates.is_empty() {
            ui::info("No templates found.");
            println!();
            println!("To add templates:");
            println!("  1. Put the template under 'templates/' or 'user-templates/'");
            println!("  2. Optionally add a '{METADATA_FILE}' describing it");
            println!("  3. Run 'texdock template list' again");
            return Ok(CommandResult::success());
        }

        ui::info("Available templates:");
        println!();

        // BTreeMap keeps the type groups in a deterministic order.
        let mut groups: BTreeMap<&str, Vec<&Template>> = BTreeMap::new();
        for template in &templates {
            groups
                .entry(template.metadata.r#type.as_str())
                .or_default()
                .push(template);
        }

        for (template_type, group) in groups {
            println!("{}", template_type.to_uppercase());
            for template in group {
                println!("  {}", template.metadata.name);
                if !template.metadata.description.is_empty() {
                    println!("    {}", template.metadata.description);
                }
                println!(
                    "    by {} (v{})",
                    template.metadata.author, template.metadata.version
                );
                if !template.metadata.dependencies.is_empty() {
                    println!("    deps: {}", template.metadata.dependencies.join(", "));
                }
                println!("    {}", template.path.display());
            }
            println!();
        }

        ui::info(&format!("Total: {} template(s)", templates.len()));
        Ok(CommandResult::success())
    }

    fn validate(&self, path: &Path) -> Result<CommandResult> {
        ui::info(&format!("Validating template at: {}", path.display()));

        let registry = self.load_registry()?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let template = registry.get(&name)?;

        let has_metadata = path.join(METADATA_FILE).exists();
        if !has_metadata {
            ui::info("Auto-detected template (no metadata file)");
        }

        println!("  name:    {}", template.metadata.name);
        println!("  type:    {}", template.metadata.r#type);
        println!("  author:  {}", template.metadata.author);
        println!("  version: {}", template.metadata.version);
        println!("  files:   {}", template.metadata.files.len());

        if has_metadata {
            let mut missing = Vec::new();
            for file in &template.metadata.files {
                if !template.path.join(&file.source).exists() {
                    if file.required {
                        missing.push(file.source.clone());
                    } else {
                        ui::warn(&format!("Optional file not found: {}", file.source));
                    }
                }
            }

            if !missing.is_empty() {
                ui::error("Required files not found:");
                for file in &missing {
                    println!("  - {file}");
                }
                return Err(anyhow::anyhow!("template is incomplete").into());
            }

            ui::success("All required files are present");
        } else {
            // Auto-detected: a usable template needs at least one .tex file.
            let has_tex = std::fs::read_dir(path)?
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().map_or(false, |ext| ext == "tex"));

            if !has_tex {
                ui::error("No .tex files found");
                return Err(anyhow::anyhow!("template has no LaTeX files").into());
            }
            ui::success("Template contains LaTeX (.tex) files");
        }

        ui::success("Template is valid");
        Ok(CommandResult::success())
    }
}

impl Command for TemplateCommand<'_> {
    fn execute(&self) -> Result<CommandResult> {
        match self.subcommand {
            TemplateCommands::List => self.list(),
            TemplateCommands::Validate { path } => self.validate(path),
        }
    }
}
