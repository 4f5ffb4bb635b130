//! Project configuration.
//!
//! Configuration lives in an optional `texdock.yml` at the project root.
//! Every field has a default, so a project without a config file works out
//! of the box. The resolved [`Config`] is built once per command invocation
//! and passed down explicitly; there is no process-wide mutable state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TexdockError};

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "texdock.yml";

/// Resolved project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LaTeX engine passed to latexmk (pdflatex, xelatex, lualatex).
    pub latex_engine: String,

    /// Document source directory, relative to the project root.
    pub source_dir: PathBuf,

    /// Build output directory, relative to the project root.
    pub output_dir: PathBuf,

    /// Compose service name of the build container.
    pub container_name: String,

    /// Container image used by the compose file.
    pub image_name: String,

    /// Compose file driving the build container.
    pub compose_file: PathBuf,

    /// Debounce window for watch mode, in milliseconds.
    pub watch_debounce_ms: u64,

    /// Template search roots, scanned in order.
    pub template_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latex_engine: "pdflatex".to_string(),
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("dist"),
            container_name: "latex-env".to_string(),
            image_name: "blang/latex:ubuntu".to_string(),
            compose_file: PathBuf::from("config/docker/docker-compose.yml"),
            watch_debounce_ms: 500,
            template_paths: vec![
                PathBuf::from("templates"),
                PathBuf::from("user-templates"),
            ],
        }
    }
}

impl Config {
    /// Load configuration for a project root.
    ///
    /// A missing `texdock.yml` yields the defaults; a malformed one is an
    /// error (a config the user wrote should never be silently ignored).
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| TexdockError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Source directory resolved against the project root.
    pub fn source_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.source_dir)
    }

    /// Output directory resolved against the project root.
    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output_dir)
    }

    /// Template search roots resolved against the project root.
    pub fn template_roots(&self, project_root: &Path) -> Vec<PathBuf> {
        self.template_paths
            .iter()
            .map(|p| project_root.join(p))
            .collect()
    }
}
