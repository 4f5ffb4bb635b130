//! texdock - Containerized LaTeX project scaffolding and build automation.
//!
//! texdock materializes LaTeX document skeletons from a template registry
//! and drives a containerized `latexmk` build pipeline, with a watch mode
//! that recompiles on debounced filesystem changes.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Project configuration loading
//! - [`template`] - Template discovery, resolution and materialization
//! - [`build`] - The containerized build pipeline
//! - [`watch`] - File watching with debounced rebuilds
//! - [`docker`] - Compose process boundary and the compilation guard
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Terminal output and prompts
//!
//! # Example
//!
//! ```
//! use texdock::template::normalize_latex_paths;
//!
//! // Legacy template paths are rewritten onto the canonical layout
//! let normalized = normalize_latex_paths("\\input{content/intro}");
//! assert_eq!(normalized, "\\input{chapters/intro}");
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod docker;
pub mod error;
pub mod template;
pub mod ui;
pub mod watch;

pub use error::{Result, TexdockError};
