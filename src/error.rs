//! Error types for texdock operations.
//!
//! This module defines [`TexdockError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TexdockError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `TexdockError::Other`) for unexpected errors
//! - Failures on *optional* paths (optional manifest files, unparsable
//!   template metadata) are logged as warnings and never surface here
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for texdock operations.
#[derive(Debug, Error)]
pub enum TexdockError {
    /// Referenced template does not exist in the registry.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    /// A file marked `required` in a template manifest is missing on disk.
    #[error("Required template file not found: {path}")]
    RequiredFileMissing { path: PathBuf },

    /// Failed to parse template metadata or project configuration.
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Template content could not be rendered.
    #[error("Failed to render {path}: {message}")]
    RenderError { path: PathBuf, message: String },

    /// A project prerequisite is missing (e.g. no `src/main.tex` yet).
    #[error("{message}")]
    ProjectNotInitialized { message: String },

    /// External tool (docker, latexmk) failed or is unreachable.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The user declined a confirmation prompt.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// File watcher error that the watch loop cannot recover from.
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for texdock operations.
pub type Result<T> = std::result::Result<T, TexdockError>;
