//! Build pipeline.
//!
//! Compilation runs inside the build container as a single blocking
//! `latexmk` invocation with output streamed through unmodified. The
//! pipeline never runs two builds concurrently: the compilation guard
//! checks the container's process table before anything starts, and the
//! call itself blocks until latexmk exits (no timeout).

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::docker::{CompilationGuard, ComposeRunner};
use crate::error::{Result, TexdockError};
use crate::ui;

/// Options for one build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// LaTeX engine override (falls back to the configured engine).
    pub engine: Option<String>,

    /// Remove auxiliary files before compiling.
    pub clean_first: bool,
}

/// LaTeX auxiliary extensions removed by `clean`. The compiled PDF is
/// deliberately not on this list.
const TEMP_EXTENSIONS: &[&str] = &[
    ".aux",
    ".log",
    ".bbl",
    ".blg",
    ".fls",
    ".fdb_latexmk",
    ".synctex.gz",
    ".out",
    ".toc",
    ".lot",
    ".lof",
    ".nav",
    ".snm",
    ".vrb",
    ".idx",
    ".ind",
    ".ilg",
];

/// Compile the project once.
///
/// `confirm` resolves the guard prompt when a previous compilation is still
/// running; declining aborts with [`TexdockError::Cancelled`].
pub fn run_build(
    project_root: &Path,
    config: &Config,
    runner: &dyn ComposeRunner,
    options: &BuildOptions,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<()> {
    let start = Instant::now();

    CompilationGuard::new(runner, &config.container_name).ensure_clear(confirm)?;

    let main_tex = config.source_path(project_root).join("main.tex");
    if !main_tex.exists() {
        return Err(TexdockError::ProjectNotInitialized {
            message: format!(
                "{} not found. Run `texdock init` first",
                main_tex.display()
            ),
        });
    }

    if options.clean_first {
        if let Err(e) = clean(project_root, config, false) {
            ui::warn(&format!("Failed to clean auxiliary files: {e}"));
        }
    }

    ensure_container_running(runner, config)?;

    let engine = options.engine.as_deref().unwrap_or(&config.latex_engine);
    ui::info(&format!("Compiling {} with {engine}...", main_tex.display()));

    compile(runner, config, engine)?;

    let elapsed = start.elapsed();
    ui::success(&format!("Build finished in {:.1}s", elapsed.as_secs_f64()));
    ui::info(&format!(
        "PDF generated: {}",
        config.output_dir.join("main.pdf").display()
    ));

    Ok(())
}

/// Start the compose service if it isn't up yet.
fn ensure_container_running(runner: &dyn ComposeRunner, config: &Config) -> Result<()> {
    let ps = runner.output(&["ps", "-q", &config.container_name]);
    let running = matches!(ps, Ok(ref r) if r.success && !r.stdout.trim().is_empty());
    if running {
        return Ok(());
    }

    ui::info("Starting Docker environment...");
    let result = runner.run(&["up", "-d"])?;
    if !result.success {
        return Err(TexdockError::CommandFailed {
            command: "docker compose up -d".to_string(),
            code: result.exit_code,
        });
    }

    // Give the container a moment to pass its health check.
    std::thread::sleep(std::time::Duration::from_secs(2));
    ui::success("Docker environment started");
    Ok(())
}

/// Map an engine name onto the latexmk mode flag.
fn engine_flag(engine: &str) -> &'static str {
    match engine {
        "xelatex" => "-pdfxe",
        "lualatex" => "-pdflua",
        _ => "-pdf",
    }
}

/// The single latexmk invocation inside the container.
fn compile(runner: &dyn ComposeRunner, config: &Config, engine: &str) -> Result<()> {
    let output_arg = format!("-output-directory={}", config.output_dir.display());
    let main_arg = config.source_dir.join("main.tex");
    let main_arg = main_arg.to_string_lossy();

    let args = [
        "exec",
        "-T",
        config.container_name.as_str(),
        "latexmk",
        engine_flag(engine),
        "-interaction=nonstopmode",
        "-file-line-error",
        "-synctex=1",
        "-recorder",
        output_arg.as_str(),
        main_arg.as_ref(),
    ];

    let result = runner.run(&args)?;
    if !result.success {
        return Err(TexdockError::CommandFailed {
            command: format!("latexmk {}", main_arg),
            code: result.exit_code,
        });
    }

    Ok(())
}

/// Remove LaTeX auxiliary files from the output directory.
///
/// Returns the number of files removed. With `all`, the compiled
/// `main.pdf` is removed too.
pub fn clean(project_root: &Path, config: &Config, all: bool) -> Result<usize> {
    let output_dir = config.output_path(project_root);
    if !output_dir.exists() {
        ui::info("Output directory does not exist, nothing to clean");
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(&output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        let is_temp = TEMP_EXTENSIONS.iter().any(|ext| name.ends_with(ext));
        let is_pdf_target = all && name.as_ref() == "main.pdf";

        if is_temp || is_pdf_target {
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(file = %path.display(), "removed");
                    removed += 1;
                }
                Err(e) => ui::warn(&format!("Could not remove {}: {e}", path.display())),
            }
        }
    }

    Ok(removed)
}
