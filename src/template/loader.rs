//! Project materialization.
//!
//! The loader turns a resolved template into a project tree. Templates with
//! an explicit `files` manifest are replayed entry by entry; templates
//! without one are walked and every file is classified by a fixed-priority
//! destination mapping plus a content sniff deciding whether it needs
//! variable substitution.
//!
//! Failure policy: a missing or broken *required* manifest file aborts the
//! whole materialization; optional and auto-detected files are best-effort
//! and only log a warning.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, TexdockError};
use crate::template::metadata::{ProjectInfo, Template, TemplateFile, METADATA_FILE};
use crate::template::normalize::normalize_latex_paths;
use crate::template::registry::Registry;
use crate::template::render::{is_template_file, render};
use crate::ui;

/// Image extensions routed to `images/` during auto-detection.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf", "svg", "eps"];

/// Materializes templates into project directories.
///
/// Borrows the registry for lookups; never mutates templates.
pub struct Loader<'a> {
    registry: &'a Registry,
}

impl<'a> Loader<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Create a project from the named template.
    ///
    /// The skeleton directories are always created first, so a later
    /// required-file failure still leaves a usable directory layout (and
    /// never a half-written `main.tex` claiming success).
    pub fn create_project(
        &self,
        template_name: &str,
        info: &ProjectInfo,
        target_dir: &Path,
        dist_dir: &Path,
    ) -> Result<()> {
        let template = self.registry.get(template_name)?;

        ui::info(&format!(
            "Using template: {} ({})",
            template.metadata.name, template.metadata.description
        ));

        create_skeleton(target_dir, dist_dir)?;

        if !template.metadata.files.is_empty() {
            self.replay_manifest(template, info, target_dir)
        } else {
            self.auto_detect(template, info, target_dir)
        }
    }

    /// Materialize by replaying the declared file manifest in order.
    fn replay_manifest(
        &self,
        template: &Template,
        info: &ProjectInfo,
        target_dir: &Path,
    ) -> Result<()> {
        for file in &template.metadata.files {
            if let Err(e) = self.process_file(template, file, info, target_dir) {
                if file.required {
                    return Err(e);
                }
                tracing::warn!(
                    source = %file.source,
                    error = %e,
                    "skipping optional template file"
                );
                ui::warn(&format!("Skipping optional file {}: {e}", file.source));
            }
        }
        Ok(())
    }

    /// Materialize by walking the template tree and classifying each file.
    fn auto_detect(&self, template: &Template, info: &ProjectInfo, target_dir: &Path) -> Result<()> {
        tracing::debug!(template = %template.path.display(), "auto-detecting template files");

        for entry in WalkDir::new(&template.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file()
                || entry.file_name() == std::ffi::OsStr::new(METADATA_FILE)
            {
                continue;
            }

            let rel_path = entry
                .path()
                .strip_prefix(&template.path)
                .expect("walk entry outside template root")
                .to_path_buf();

            let file = TemplateFile {
                source: path_to_slash(&rel_path),
                destination: path_to_slash(&map_destination(&rel_path)),
                required: false,
                template: fs::read(entry.path())
                    .map(|content| is_template_file(&content))
                    .unwrap_or(false),
            };

            if let Err(e) = self.process_file(template, &file, info, target_dir) {
                tracing::warn!(source = %file.source, error = %e, "skipping auto-detected file");
                ui::warn(&format!("Skipping {}: {e}", file.source));
            }
        }

        Ok(())
    }

    /// Materialize one manifest entry: render or copy, creating parents.
    fn process_file(
        &self,
        template: &Template,
        file: &TemplateFile,
        info: &ProjectInfo,
        target_dir: &Path,
    ) -> Result<()> {
        let source = template.path.join(&file.source);
        let destination = target_dir.join(&file.destination);

        if !source.exists() {
            if file.required {
                return Err(TexdockError::RequiredFileMissing { path: source });
            }
            tracing::debug!(source = %source.display(), "optional file absent");
            return Ok(());
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        if file.template {
            self.render_file(template, &source, &destination, info)
        } else {
            copy_file(&source, &destination)
        }
    }

    fn render_file(
        &self,
        template: &Template,
        source: &Path,
        destination: &Path,
        info: &ProjectInfo,
    ) -> Result<()> {
        let content = fs::read_to_string(source)?;
        let rendered = render(&content, source, info, &template.metadata.variables)?;
        fs::write(destination, rendered)?;
        ui::success(&format!("Created: {}", destination.display()));
        Ok(())
    }
}

/// Create the canonical project skeleton, idempotently.
fn create_skeleton(target_dir: &Path, dist_dir: &Path) -> Result<()> {
    for dir in [
        target_dir,
        &target_dir.join("chapters"),
        &target_dir.join("images"),
        &target_dir.join("styles"),
        dist_dir,
    ] {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Copy a non-template file. `.tex` content is still path-normalized;
/// everything else is transferred byte for byte.
fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    let is_tex = source
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("tex"));

    if is_tex {
        let content = fs::read_to_string(source)?;
        fs::write(destination, normalize_latex_paths(&content))?;
        ui::success(&format!("Copied: {} (normalized)", destination.display()));
    } else {
        fs::copy(source, destination)?;
        ui::success(&format!("Copied: {}", destination.display()));
    }

    Ok(())
}

/// Map a template-relative path onto its project destination.
///
/// Pure function of the path's suffix and substrings; rules apply in fixed
/// priority order. Later `.bib` files in a walk overwrite earlier ones since
/// the destination is always `references.bib` (accepted limitation).
pub fn map_destination(rel_path: &Path) -> PathBuf {
    let slash_path = path_to_slash(rel_path);
    let lower = slash_path.to_lowercase();
    let basename = rel_path.file_name().map(PathBuf::from).unwrap_or_default();

    if lower.ends_with(".tex") {
        if slash_path.contains("main") || slash_path.contains("template") {
            return PathBuf::from("main.tex");
        }
        if slash_path.contains('/') {
            return Path::new("chapters").join(basename);
        }
        return rel_path.to_path_buf();
    }

    if lower.ends_with(".sty") || lower.ends_with(".cls") {
        return Path::new("styles").join(basename);
    }

    if lower.ends_with(".bib") {
        return PathBuf::from("references.bib");
    }

    let ext = rel_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Path::new("images").join(basename);
    }

    rel_path.to_path_buf()
}

/// Render a relative path with forward slashes regardless of platform.
fn path_to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn info() -> ProjectInfo {
        ProjectInfo {
            title: "My Thesis".to_string(),
            author: "Ada".to_string(),
            ..ProjectInfo::default()
        }
    }

    fn registry_with(temp: &TempDir) -> Registry {
        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();
        registry
    }

    #[test]
    fn map_destination_rules() {
        let cases: &[(&str, &str)] = &[
            ("main.tex", "main.tex"),
            ("src/template.tex", "main.tex"),
            ("chapters/intro.tex", "chapters/intro.tex"),
            ("deep/nested/outro.tex", "chapters/outro.tex"),
            ("standalone.tex", "standalone.tex"),
            ("misc/fancy.sty", "styles/fancy.sty"),
            ("thesis.cls", "styles/thesis.cls"),
            ("refs/a.bib", "references.bib"),
            ("z.bib", "references.bib"),
            ("assets/logo.png", "images/logo.png"),
            ("cover.PDF", "images/cover.PDF"),
            ("README.md", "README.md"),
            ("scripts/build.sh", "scripts/build.sh"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                map_destination(Path::new(input)),
                PathBuf::from(expected),
                "for {input}"
            );
        }
    }

    #[test]
    fn map_destination_is_deterministic() {
        let p = Path::new("figures/plot.png");
        assert_eq!(map_destination(p), map_destination(p));
    }

    #[test]
    fn auto_detection_renders_and_copies() {
        let temp = TempDir::new().unwrap();
        let tpl = temp.path().join("article");
        fs::create_dir_all(tpl.join("frontmatter")).unwrap();
        fs::write(
            tpl.join("main.tex"),
            "\\title{{{.Title}}}\n\\includegraphics{frontmatter/logo.png}\n",
        )
        .unwrap();
        fs::write(tpl.join("frontmatter/logo.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");
        let dist = project.path().join("dist");

        Loader::new(&registry)
            .create_project("article", &info(), &src, &dist)
            .unwrap();

        let main = fs::read_to_string(src.join("main.tex")).unwrap();
        assert!(main.contains("\\title{My Thesis}"));
        assert!(main.contains("\\includegraphics{images/logo.png}"));

        let logo = fs::read(src.join("images/logo.png")).unwrap();
        assert_eq!(logo, vec![0x89u8, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn missing_required_file_is_fatal_but_skeleton_remains() {
        let temp = TempDir::new().unwrap();
        let tpl = temp.path().join("strict");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(
            tpl.join(METADATA_FILE),
            "name: strict\nfiles:\n  - source: skeleton.tex\n    destination: main.tex\n    required: true\n    template: true\n",
        )
        .unwrap();

        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");
        let dist = project.path().join("dist");

        let err = Loader::new(&registry)
            .create_project("strict", &info(), &src, &dist)
            .unwrap_err();
        assert!(matches!(err, TexdockError::RequiredFileMissing { .. }));

        // Skeleton is created before the manifest runs.
        assert!(src.join("chapters").is_dir());
        assert!(src.join("images").is_dir());
        assert!(src.join("styles").is_dir());
        assert!(dist.is_dir());
        assert!(!src.join("main.tex").exists());
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let tpl = temp.path().join("lenient");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(
            tpl.join(METADATA_FILE),
            "name: lenient\nfiles:\n  - source: ghost.tex\n    destination: ghost.tex\n  - source: real.tex\n    destination: main.tex\n",
        )
        .unwrap();
        fs::write(tpl.join("real.tex"), "\\documentclass{article}").unwrap();

        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");

        Loader::new(&registry)
            .create_project("lenient", &info(), &src, &project.path().join("dist"))
            .unwrap();

        assert!(!src.join("ghost.tex").exists());
        assert!(src.join("main.tex").exists());
    }

    #[test]
    fn later_bib_file_wins() {
        let temp = TempDir::new().unwrap();
        let tpl = temp.path().join("bibs");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(tpl.join("a.bib"), "@article{a}").unwrap();
        fs::write(tpl.join("z.bib"), "@article{z}").unwrap();

        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");

        Loader::new(&registry)
            .create_project("bibs", &info(), &src, &project.path().join("dist"))
            .unwrap();

        // Walk order is lexicographic here, so z.bib lands last.
        let refs = fs::read_to_string(src.join("references.bib")).unwrap();
        assert_eq!(refs, "@article{z}");
    }

    #[test]
    fn manifest_replay_honors_template_flag() {
        let temp = TempDir::new().unwrap();
        let tpl = temp.path().join("flagged");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(
            tpl.join(METADATA_FILE),
            concat!(
                "name: flagged\n",
                "variables:\n  university: Example U\n",
                "files:\n",
                "  - source: main.tex\n    destination: main.tex\n    required: true\n    template: true\n",
                "  - source: raw.tex\n    destination: chapters/raw.tex\n",
            ),
        )
        .unwrap();
        fs::write(tpl.join("main.tex"), "{{.Title}} at {{.Variables.university}}").unwrap();
        fs::write(tpl.join("raw.tex"), "{{.Title}} stays \\input{content/x}").unwrap();

        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");

        Loader::new(&registry)
            .create_project("flagged", &info(), &src, &project.path().join("dist"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(src.join("main.tex")).unwrap(),
            "My Thesis at Example U"
        );
        // Raw .tex is normalized but never substituted.
        assert_eq!(
            fs::read_to_string(src.join("chapters/raw.tex")).unwrap(),
            "{{.Title}} stays \\input{chapters/x}"
        );
    }

    #[test]
    fn unknown_template_propagates_not_found() {
        let temp = TempDir::new().unwrap();
        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();

        let err = Loader::new(&registry)
            .create_project(
                "ghost",
                &info(),
                &project.path().join("src"),
                &project.path().join("dist"),
            )
            .unwrap_err();
        assert!(matches!(err, TexdockError::TemplateNotFound { .. }));
    }

    #[test]
    fn auto_detected_legacy_placeholders_render() {
        let temp = TempDir::new().unwrap();
        let tpl = temp.path().join("legacy");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(tpl.join("main.tex"), "\\title{TITLE}\\author{AUTHOR}\\date{DATE}").unwrap();

        let registry = registry_with(&temp);
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");

        Loader::new(&registry)
            .create_project("legacy", &info(), &src, &project.path().join("dist"))
            .unwrap();

        let main = fs::read_to_string(src.join("main.tex")).unwrap();
        assert_eq!(main, "\\titleMy Thesis\\authorAda\\date\\today");
    }
}
