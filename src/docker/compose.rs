//! Docker compose process boundary.
//!
//! Every interaction with the build container goes through a single
//! compose-style invocation: `docker compose -f <file> <args...>`. The
//! [`ComposeRunner`] trait is the seam that lets the guard, the build
//! pipeline and the watch loop run against a mock in tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Result, TexdockError};

/// Outcome of one compose invocation.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output (empty when streaming).
    pub stdout: String,

    /// Whether the command exited with code 0.
    pub success: bool,
}

impl ExecResult {
    pub fn success(stdout: String) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            success: true,
        }
    }

    pub fn failure(exit_code: Option<i32>, stdout: String) -> Self {
        Self {
            exit_code,
            stdout,
            success: false,
        }
    }
}

/// Executes compose subcommands against the build container.
pub trait ComposeRunner {
    /// Run a subcommand with stdout/stderr streamed through unmodified.
    fn run(&self, args: &[&str]) -> Result<ExecResult>;

    /// Run a subcommand capturing stdout.
    fn output(&self, args: &[&str]) -> Result<ExecResult>;
}

/// Real compose invocation via the `docker` binary.
#[derive(Debug, Clone)]
pub struct DockerCompose {
    compose_file: PathBuf,
}

impl DockerCompose {
    pub fn new(compose_file: impl Into<PathBuf>) -> Self {
        Self {
            compose_file: compose_file.into(),
        }
    }

    pub fn compose_file(&self) -> &Path {
        &self.compose_file
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("docker");
        cmd.arg("compose").arg("-f").arg(&self.compose_file);
        cmd.args(args);
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!(
            "docker compose -f {} {}",
            self.compose_file.display(),
            args.join(" ")
        )
    }
}

impl ComposeRunner for DockerCompose {
    fn run(&self, args: &[&str]) -> Result<ExecResult> {
        tracing::debug!(command = %self.describe(args), "running compose command");

        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|_| TexdockError::CommandFailed {
                command: self.describe(args),
                code: None,
            })?;

        if status.success() {
            Ok(ExecResult::success(String::new()))
        } else {
            Ok(ExecResult::failure(status.code(), String::new()))
        }
    }

    fn output(&self, args: &[&str]) -> Result<ExecResult> {
        tracing::debug!(command = %self.describe(args), "capturing compose command");

        let output = self
            .command(args)
            .stderr(Stdio::null())
            .output()
            .map_err(|_| TexdockError::CommandFailed {
                command: self.describe(args),
                code: None,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            Ok(ExecResult::success(stdout))
        } else {
            Ok(ExecResult::failure(output.status.code(), stdout))
        }
    }
}

/// Check that the `docker` binary is available at all.
pub fn docker_available() -> bool {
    Command::new("docker")
        .arg("version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
