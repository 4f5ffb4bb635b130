//! Build container integration.
//!
//! - [`compose`] - the `docker compose` process boundary
//! - [`guard`] - arbitration against overlapping compilations

pub mod compose;
pub mod guard;

pub use compose::{docker_available, ComposeRunner, DockerCompose, ExecResult};
pub use guard::CompilationGuard;
