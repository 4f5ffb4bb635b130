//! Template metadata definitions.
//!
//! A template is a directory of LaTeX sources, optionally described by a
//! `template.yaml` manifest. The manifest declares which files to materialize
//! and which of them go through variable substitution; templates without a
//! manifest fall back to auto-detection in the loader.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the metadata file looked up inside each template directory.
pub const METADATA_FILE: &str = "template.yaml";

/// One file entry in a template manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Path relative to the template root.
    pub source: String,

    /// Path relative to the project source root.
    pub destination: String,

    /// Whether a missing source aborts the whole materialization.
    #[serde(default)]
    pub required: bool,

    /// Whether the content goes through variable substitution before writing.
    #[serde(default)]
    pub template: bool,
}

/// Parsed or synthesized `template.yaml` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Unique name within a registry. On collision the last-loaded
    /// template silently wins.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Document type: article, book, thesis, presentation, or any
    /// free-form string.
    #[serde(default = "default_type")]
    pub r#type: String,

    #[serde(default)]
    pub author: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub language: String,

    /// LaTeX packages the template expects, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Explicit file manifest. Empty means "auto-detect".
    #[serde(default)]
    pub files: Vec<TemplateFile>,

    /// Extra substitution variables with their default values.
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_type() -> String {
    "article".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// A loaded template: metadata plus the directory it was found in.
///
/// Owned by the [`Registry`](super::Registry) that loaded it; the loader only
/// borrows it for the duration of one materialization.
#[derive(Debug, Clone)]
pub struct Template {
    pub metadata: TemplateMetadata,
    pub path: PathBuf,
}

/// Variable bindings for one `init` invocation.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub title: String,
    pub author: String,
    pub r#type: String,
    pub language: String,
    pub bibliography: bool,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            title: "Untitled Document".to_string(),
            author: "Author".to_string(),
            r#type: "article".to_string(),
            language: "english".to_string(),
            bibliography: true,
        }
    }
}
