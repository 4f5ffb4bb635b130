//! Watch mode.
//!
//! Monitors the project source tree and triggers debounced rebuilds. The
//! loop is single-threaded and cooperative: it blocks on a channel fed by
//! the filesystem watcher, waking early when the debounce deadline is due.
//! A failed rebuild is reported and watching continues.
//!
//! Directories are registered recursively once at startup; directories
//! created afterwards are not picked up (accepted limitation).

pub mod debounce;

use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::event::{EventKind, ModifyKind};
use notify::{Event, RecursiveMode, Watcher};
use walkdir::WalkDir;

use crate::build::{run_build, BuildOptions};
use crate::config::Config;
use crate::docker::{CompilationGuard, ComposeRunner};
use crate::error::{Result, TexdockError};
use crate::ui;

pub use debounce::{Debouncer, WatchState};

/// Extensions whose changes trigger a rebuild.
const RELEVANT_EXTENSIONS: &[&str] = &[
    "tex", "bib", "cls", "sty", "png", "jpg", "jpeg", "pdf", "svg",
];

/// Whether an event should feed the debouncer: create or content-write on
/// an allow-listed extension. Deletes, renames and metadata churn are
/// ignored.
fn is_relevant(event: &Event) -> bool {
    let kind_relevant = match event.kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => true,
        _ => false,
    };
    if !kind_relevant {
        return false;
    }

    event.paths.iter().any(|path| {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .map_or(false, |ext| RELEVANT_EXTENSIONS.contains(&ext.as_str()))
    })
}

/// Register the source tree with the watcher, one directory at a time.
fn register_tree<W: Watcher>(watcher: &mut W, source_dir: &Path) -> Result<()> {
    for entry in WalkDir::new(source_dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() {
            watcher.watch(entry.path(), RecursiveMode::NonRecursive)?;
        }
    }
    Ok(())
}

/// Run watch mode until the watcher channel closes or the process is
/// interrupted.
pub fn watch_project(
    project_root: &Path,
    config: &Config,
    runner: &dyn ComposeRunner,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<()> {
    ui::info("Starting watch mode...");

    CompilationGuard::new(runner, &config.container_name).ensure_clear(confirm)?;

    let source_dir = config.source_path(project_root);
    if !source_dir.exists() {
        return Err(TexdockError::ProjectNotInitialized {
            message: format!(
                "{} not found. Run `texdock init` first",
                source_dir.display()
            ),
        });
    }

    // One unconditional build before entering the loop.
    ui::info("Initial build...");
    if let Err(e) = run_build(project_root, config, runner, &BuildOptions::default(), confirm) {
        ui::warn(&format!("Initial build failed: {e}"));
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })?;
    register_tree(&mut watcher, &source_dir)?;

    ui::info("Watching for changes (press Ctrl+C to stop)");

    let window = Duration::from_millis(config.watch_debounce_ms);
    let mut rebuild = || {
        ui::info("Rebuilding...");
        let start = Instant::now();
        match run_build(project_root, config, runner, &BuildOptions::default(), &mut |_| {
            // A rebuild inside the loop never prompts; the loop itself is
            // the only build source in this process.
            Ok(true)
        }) {
            Ok(()) => ui::success(&format!(
                "Rebuild finished in {:.1}s",
                start.elapsed().as_secs_f64()
            )),
            Err(e) => ui::error(&format!("Rebuild failed: {e}")),
        }
    };

    run_event_loop(&rx, Debouncer::new(window), &mut rebuild)
}

/// The multiplexed wait: watcher events, debounce expiry, watcher errors.
///
/// Split from [`watch_project`] so the coalescing behavior is testable with
/// a scripted channel.
fn run_event_loop(
    rx: &Receiver<notify::Result<Event>>,
    mut debouncer: Debouncer,
    rebuild: &mut dyn FnMut(),
) -> Result<()> {
    loop {
        let received = match debouncer.time_until_deadline(Instant::now()) {
            Some(timeout) => rx.recv_timeout(timeout),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Ok(event)) => {
                if is_relevant(&event) {
                    if let Some(path) = event.paths.first() {
                        tracing::debug!(path = %path.display(), "change detected");
                    }
                    debouncer.note_event(Instant::now());
                }
            }
            Ok(Err(e)) => {
                // Watcher errors are reported but never end the loop.
                tracing::error!(error = %e, "watcher error");
            }
            Err(RecvTimeoutError::Timeout) => {
                if debouncer.fire(Instant::now()) {
                    rebuild();
                    debouncer.build_finished();
                }
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}
