//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// texdock - Containerized LaTeX project scaffolding and builds.
#[derive(Debug, Parser)]
#[command(name = "texdock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new LaTeX document from a template
    Init(InitArgs),

    /// Compile the document inside the build container
    Build(BuildArgs),

    /// Watch sources and recompile on changes
    Watch,

    /// Remove LaTeX auxiliary files from the output directory
    Clean(CleanArgs),

    /// List and validate templates
    Template(TemplateArgs),

    /// Show project and container status
    Status,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InitArgs {
    /// Document title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Author name
    #[arg(short, long)]
    pub author: Option<String>,

    /// Template to use
    #[arg(long, default_value = "default")]
    pub template: String,

    /// Document language
    #[arg(long, default_value = "english")]
    pub language: String,

    /// Overwrite an existing document
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BuildArgs {
    /// LaTeX engine to use (pdflatex, xelatex, lualatex)
    #[arg(long)]
    pub engine: Option<String>,

    /// Remove auxiliary files before compiling
    #[arg(long)]
    pub clean: bool,
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CleanArgs {
    /// Also remove the compiled PDF
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `template` command.
#[derive(Debug, clap::Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommands,
}

/// Template management subcommands.
#[derive(Debug, Subcommand)]
pub enum TemplateCommands {
    /// List available templates, grouped by type
    List,

    /// Validate a template directory
    Validate {
        /// Path to the template directory
        path: PathBuf,
    },
}
