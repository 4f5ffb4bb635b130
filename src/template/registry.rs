//! Template registry.
//!
//! The registry scans a list of search roots for template directories and
//! builds a name index. A directory with a `template.yaml` is parsed; a
//! directory without one is synthesized into an auto-detected template whose
//! type is inferred from its `.tex` content. A template that fails to parse
//! is skipped with a warning so one broken template never hides the rest.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, TexdockError};
use crate::template::metadata::{Template, TemplateMetadata, METADATA_FILE};

/// Name index over templates discovered across the configured search roots.
///
/// Lifecycle: created once per CLI invocation, populated by a single
/// [`load`](Registry::load) rescan, then queried read-only.
#[derive(Debug, Default)]
pub struct Registry {
    paths: Vec<PathBuf>,
    templates: HashMap<String, Template>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a search root. Roots are scanned in insertion order; a name
    /// collision is resolved by last-loaded-wins, silently.
    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Rescan every search root, replacing any previously loaded index.
    pub fn load(&mut self) -> Result<()> {
        self.templates = HashMap::new();

        let paths = self.paths.clone();
        for base in &paths {
            self.load_from_root(base)?;
        }

        Ok(())
    }

    fn load_from_root(&mut self, base: &Path) -> Result<()> {
        // A missing search root is not an error.
        if !base.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(base)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let template = if path.join(METADATA_FILE).exists() {
                match Self::load_template(&path) {
                    Ok(template) => template,
                    Err(e) => {
                        tracing::warn!(
                            template = %path.display(),
                            error = %e,
                            "skipping template with invalid metadata"
                        );
                        continue;
                    }
                }
            } else {
                Self::synthesize_template(&path)
            };

            self.templates
                .insert(template.metadata.name.clone(), template);
        }

        Ok(())
    }

    fn load_template(template_path: &Path) -> Result<Template> {
        let metadata_path = template_path.join(METADATA_FILE);
        let content = fs::read_to_string(&metadata_path)?;

        let metadata: TemplateMetadata =
            serde_yaml::from_str(&content).map_err(|e| TexdockError::ParseError {
                path: metadata_path,
                message: e.to_string(),
            })?;

        Ok(Template {
            metadata,
            path: template_path.to_path_buf(),
        })
    }

    /// Build metadata for a directory that ships no `template.yaml`.
    ///
    /// The empty `files` manifest signals the loader to use auto-detection.
    fn synthesize_template(template_path: &Path) -> Template {
        let name = template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Template {
            metadata: TemplateMetadata {
                name: name.clone(),
                description: format!("Auto-detected template: {name}"),
                r#type: detect_template_type(template_path),
                author: "auto-detected".to_string(),
                version: "1.0.0".to_string(),
                language: "multilingual".to_string(),
                dependencies: Vec::new(),
                files: Vec::new(),
                variables: HashMap::new(),
                created_at: None,
            },
            path: template_path.to_path_buf(),
        }
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Result<&Template> {
        self.templates
            .get(name)
            .ok_or_else(|| TexdockError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    /// All templates, sorted lexicographically by name.
    pub fn list(&self) -> Vec<&Template> {
        let mut templates: Vec<&Template> = self.templates.values().collect();
        templates.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        templates
    }

    /// Check if a template exists.
    pub fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Case-insensitive filter by document type, sorted by name.
    pub fn by_type(&self, template_type: &str) -> Vec<&Template> {
        let mut filtered: Vec<&Template> = self
            .templates
            .values()
            .filter(|t| t.metadata.r#type.eq_ignore_ascii_case(template_type))
            .collect();
        filtered.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        filtered
    }
}

/// Infer a document type by sniffing the `.tex` files under a template root.
///
/// Priority: beamer wins over thesis wins over book; everything else is an
/// article. Scan failures fall back to `article` as well.
fn detect_template_type(template_path: &Path) -> String {
    let mut has_beamer = false;
    let mut has_thesis = false;
    let mut has_book = false;

    for entry in WalkDir::new(template_path)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().map_or(true, |e| e != "tex") {
            continue;
        }

        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };
        let content = content.to_lowercase();

        if content.contains("\\documentclass{beamer}") || content.contains("beamer") {
            has_beamer = true;
        }
        if content.contains("thesis") || content.contains("dissertation") {
            has_thesis = true;
        }
        if content.contains("\\documentclass{book}") || content.contains("\\chapter") {
            has_book = true;
        }
    }

    if has_beamer {
        "presentation"
    } else if has_thesis {
        "thesis"
    } else if has_book {
        "book"
    } else {
        "article"
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_template(root: &Path, name: &str, yaml: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(METADATA_FILE), yaml).unwrap();
    }

    #[test]
    fn load_skips_missing_search_root() {
        let mut registry = Registry::new();
        registry.add_path("/nonexistent/templates");
        registry.load().unwrap();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn load_parses_metadata_templates() {
        let temp = TempDir::new().unwrap();
        write_template(
            temp.path(),
            "ieee",
            "name: ieee\ndescription: IEEE article\ntype: article\n",
        );

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        let template = registry.get("ieee").unwrap();
        assert_eq!(template.metadata.description, "IEEE article");
        assert_eq!(template.path, temp.path().join("ieee"));
    }

    #[test]
    fn invalid_metadata_is_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "broken", ": not yaml [");
        write_template(temp.path(), "good", "name: good\n");

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        assert!(!registry.exists("broken"));
        assert!(registry.exists("good"));
    }

    #[test]
    fn directory_without_metadata_is_synthesized() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("plain");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("doc.tex"), "\\documentclass{article}").unwrap();

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        let template = registry.get("plain").unwrap();
        assert_eq!(template.metadata.r#type, "article");
        assert!(template.metadata.files.is_empty());
        assert_eq!(template.metadata.name, "plain");
    }

    #[test]
    fn beamer_takes_priority_over_book() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("slides");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("deck.tex"), "\\chapter{One}\nuses beamer overlays").unwrap();

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        assert_eq!(registry.get("slides").unwrap().metadata.r#type, "presentation");
    }

    #[test]
    fn thesis_takes_priority_over_book() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("phd");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.tex"), "\\chapter{Intro} a doctoral dissertation").unwrap();

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        assert_eq!(registry.get("phd").unwrap().metadata.r#type, "thesis");
    }

    #[test]
    fn chapter_macro_classifies_as_book() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("novel");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.tex"), "\\chapter{The Beginning}").unwrap();

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        assert_eq!(registry.get("novel").unwrap().metadata.r#type, "book");
    }

    #[test]
    fn name_collision_last_loaded_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_template(first.path(), "dup", "name: dup\ndescription: first\n");
        write_template(second.path(), "dup", "name: dup\ndescription: second\n");

        let mut registry = Registry::new();
        registry.add_path(first.path());
        registry.add_path(second.path());
        registry.load().unwrap();

        assert_eq!(registry.get("dup").unwrap().metadata.description, "second");
    }

    #[test]
    fn list_is_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "zeta", "name: zeta\n");
        write_template(temp.path(), "alpha", "name: alpha\n");
        write_template(temp.path(), "mid", "name: mid\n");

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        let names: Vec<&str> = registry
            .list()
            .iter()
            .map(|t| t.metadata.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn by_type_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "a", "name: a\ntype: Thesis\n");
        write_template(temp.path(), "b", "name: b\ntype: article\n");

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();

        let theses = registry.by_type("thesis");
        assert_eq!(theses.len(), 1);
        assert_eq!(theses[0].metadata.name, "a");
    }

    #[test]
    fn reload_replaces_previous_index() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "one", "name: one\n");

        let mut registry = Registry::new();
        registry.add_path(temp.path());
        registry.load().unwrap();
        assert!(registry.exists("one"));

        fs::remove_dir_all(temp.path().join("one")).unwrap();
        registry.load().unwrap();
        assert!(!registry.exists("one"));
    }
}
