//! Template discovery, resolution and materialization.
//!
//! # Architecture
//!
//! - [`metadata`] - `template.yaml` data model and project bindings
//! - [`registry`] - search-root scanning and the name index
//! - [`loader`] - manifest replay and auto-detection materialization
//! - [`render`] - placeholder and `{{ ... }}` variable substitution
//! - [`normalize`] - LaTeX path normalization to the canonical layout

pub mod loader;
pub mod metadata;
pub mod normalize;
pub mod registry;
pub mod render;

pub use loader::{map_destination, Loader};
pub use metadata::{ProjectInfo, Template, TemplateFile, TemplateMetadata, METADATA_FILE};
pub use normalize::normalize_latex_paths;
pub use registry::Registry;
pub use render::is_template_file;
