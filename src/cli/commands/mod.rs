//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed through [`CommandDispatcher`] and stay thin: the real work lives
//! in the domain modules (`template`, `build`, `watch`, `docker`).

pub mod build;
pub mod clean;
pub mod dispatcher;
pub mod init;
pub mod status;
pub mod template;
pub mod watch;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
