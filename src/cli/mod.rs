//! Command-line interface for texdock.
//!
//! - [`args`] - argument definitions using clap derive macros
//! - [`commands`] - command implementations and dispatching

pub mod args;
pub mod commands;

pub use args::{BuildArgs, CleanArgs, Cli, Commands, InitArgs, TemplateArgs, TemplateCommands};
pub use commands::{Command, CommandDispatcher, CommandResult};
