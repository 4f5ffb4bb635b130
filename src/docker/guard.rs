//! Compilation guard.
//!
//! Defends against a `latexmk` run left over from a previous invocation
//! (for example a crashed watch session) by inspecting the container's
//! process table rather than any in-process state.
//!
//! The status query is fail-open: an unreachable container or a failing
//! `pgrep` is reported as "not running", never as an error, since a
//! reachability failure usually just means the container isn't up yet.

use std::time::Duration;

use crate::docker::compose::ComposeRunner;
use crate::error::{Result, TexdockError};

/// Grace period after signalling termination.
const TERMINATION_GRACE: Duration = Duration::from_secs(2);

/// Arbitrates access to the build container's single compilation slot.
pub struct CompilationGuard<'a> {
    runner: &'a dyn ComposeRunner,
    container: &'a str,
    grace: Duration,
}

impl<'a> CompilationGuard<'a> {
    pub fn new(runner: &'a dyn ComposeRunner, container: &'a str) -> Self {
        Self {
            runner,
            container,
            grace: TERMINATION_GRACE,
        }
    }

    /// Override the post-termination grace period (tests).
    #[cfg(test)]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Whether a `latexmk` process is currently running in the container.
    pub fn is_compilation_running(&self) -> bool {
        let args = ["exec", "-T", self.container, "pgrep", "-f", "latexmk"];
        match self.runner.output(&args) {
            Ok(result) if result.success => !result.stdout.trim().is_empty(),
            // pgrep found nothing, or the container is unreachable.
            _ => false,
        }
    }

    /// Signal the in-container compilation to stop and wait out the grace
    /// period. "No such process" counts as success.
    pub fn request_termination(&self) -> Result<()> {
        tracing::info!(container = self.container, "terminating running compilation");

        let args = ["exec", "-T", self.container, "pkill", "-f", "latexmk"];
        if let Ok(result) = self.runner.run(&args) {
            if !result.success {
                tracing::debug!("no compilation process found to terminate");
            }
        }

        std::thread::sleep(self.grace);
        Ok(())
    }

    /// Ensure no compilation is in flight before starting a new one.
    ///
    /// If one is detected, `confirm` is asked whether to terminate it;
    /// declining cancels the whole operation.
    pub fn ensure_clear(&self, confirm: &mut dyn FnMut(&str) -> Result<bool>) -> Result<()> {
        if !self.is_compilation_running() {
            return Ok(());
        }

        if confirm("A LaTeX compilation is already running. Terminate it and continue?")? {
            self.request_termination()?;
            Ok(())
        } else {
            Err(TexdockError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::compose::ExecResult;
    use std::cell::RefCell;

    /// Runner scripted with canned responses, recording invocations.
    struct MockRunner {
        output_response: Result<ExecResult>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl MockRunner {
        fn new(output_response: Result<ExecResult>) -> Self {
            Self {
                output_response,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, args: &[&str]) {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
        }

        fn clone_response(&self) -> Result<ExecResult> {
            match &self.output_response {
                Ok(r) => Ok(r.clone()),
                Err(_) => Err(TexdockError::CommandFailed {
                    command: "mock".into(),
                    code: None,
                }),
            }
        }
    }

    impl ComposeRunner for MockRunner {
        fn run(&self, args: &[&str]) -> Result<ExecResult> {
            self.record(args);
            self.clone_response()
        }

        fn output(&self, args: &[&str]) -> Result<ExecResult> {
            self.record(args);
            self.clone_response()
        }
    }

    fn unreachable_runner() -> MockRunner {
        MockRunner::new(Err(TexdockError::CommandFailed {
            command: "docker compose".into(),
            code: None,
        }))
    }

    #[test]
    fn running_when_pgrep_reports_pids() {
        let runner = MockRunner::new(Ok(ExecResult::success("1234\n".into())));
        let guard = CompilationGuard::new(&runner, "latex-env");
        assert!(guard.is_compilation_running());
    }

    #[test]
    fn not_running_when_pgrep_output_empty() {
        let runner = MockRunner::new(Ok(ExecResult::success("  \n".into())));
        let guard = CompilationGuard::new(&runner, "latex-env");
        assert!(!guard.is_compilation_running());
    }

    #[test]
    fn not_running_when_pgrep_fails() {
        let runner = MockRunner::new(Ok(ExecResult::failure(Some(1), String::new())));
        let guard = CompilationGuard::new(&runner, "latex-env");
        assert!(!guard.is_compilation_running());
    }

    #[test]
    fn fail_open_when_container_unreachable() {
        let runner = unreachable_runner();
        let guard = CompilationGuard::new(&runner, "latex-env");
        assert!(!guard.is_compilation_running());
    }

    #[test]
    fn termination_tolerates_missing_process() {
        let runner = MockRunner::new(Ok(ExecResult::failure(Some(1), String::new())));
        let guard =
            CompilationGuard::new(&runner, "latex-env").with_grace(Duration::from_millis(0));
        guard.request_termination().unwrap();

        let calls = runner.calls.borrow();
        assert!(calls[0].contains(&"pkill".to_string()));
    }

    #[test]
    fn ensure_clear_passes_when_idle() {
        let runner = MockRunner::new(Ok(ExecResult::success(String::new())));
        let guard = CompilationGuard::new(&runner, "latex-env");

        let mut confirm = |_: &str| -> Result<bool> { panic!("must not prompt when idle") };
        guard.ensure_clear(&mut confirm).unwrap();
    }

    #[test]
    fn ensure_clear_terminates_on_accept() {
        let runner = MockRunner::new(Ok(ExecResult::success("4321\n".into())));
        let guard =
            CompilationGuard::new(&runner, "latex-env").with_grace(Duration::from_millis(0));

        let mut confirm = |_: &str| -> Result<bool> { Ok(true) };
        guard.ensure_clear(&mut confirm).unwrap();

        let calls = runner.calls.borrow();
        assert!(calls.iter().any(|c| c.contains(&"pkill".to_string())));
    }

    #[test]
    fn ensure_clear_cancels_on_decline() {
        let runner = MockRunner::new(Ok(ExecResult::success("4321\n".into())));
        let guard = CompilationGuard::new(&runner, "latex-env");

        let mut confirm = |_: &str| -> Result<bool> { Ok(false) };
        let err = guard.ensure_clear(&mut confirm).unwrap_err();
        assert!(matches!(err, TexdockError::Cancelled));
    }
}
