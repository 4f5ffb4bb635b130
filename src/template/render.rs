//! Template content rendering.
//!
//! Rendering happens in three passes:
//!
//! 1. Legacy placeholder substitution (`{TITLE}`, `{AUTHOR}`, `{DATE}`),
//!    kept for compatibility with older templates.
//! 2. LaTeX path normalization (see [`super::normalize`]).
//! 3. `{{ ... }}` variable substitution against the project context and the
//!    template's declared variables, only if both delimiters are present.
//!
//! The `{{ ... }}` engine is substitution-only: a reference is a dotted key
//! (`{{.Title}}`, `{{ .Variables.university }}`), resolved against `Title`,
//! `Author`, `Type`, `Language` and the `Variables` mapping. Anything else is
//! a render error.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, TexdockError};
use crate::template::metadata::ProjectInfo;
use crate::template::normalize::normalize_latex_paths;

/// A segment of parsed template content.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: {{ key }}
    Variable(String),
}

/// Parse content into literal and variable segments.
///
/// Returns an error message for an opening `{{` without a closing `}}`.
fn parse_segments(input: &str) -> std::result::Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut current_literal = String::new();
    let mut rest = input;

    while let Some(mut start) = rest.find("{{") {
        // LaTeX braces nest around references (`\title{{{.Title}}}`), so a
        // run of opening braces keeps all but the final pair as literal text.
        while rest.as_bytes().get(start + 2) == Some(&b'{') {
            start += 1;
        }
        current_literal.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            return Err("unbalanced template delimiters: '{{' without '}}'".to_string());
        };

        if !current_literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
        }
        segments.push(Segment::Variable(after_open[..end].trim().to_string()));
        rest = &after_open[end + 2..];
    }

    current_literal.push_str(rest);
    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    Ok(segments)
}

/// Resolve a dotted variable key against the rendering context.
///
/// Accepts the Go-style leading dot (`.Title`) as well as bare keys.
fn resolve_key(
    key: &str,
    info: &ProjectInfo,
    variables: &HashMap<String, String>,
) -> std::result::Result<String, String> {
    let key = key.strip_prefix('.').unwrap_or(key);

    match key {
        "Title" => Ok(info.title.clone()),
        "Author" => Ok(info.author.clone()),
        "Type" => Ok(info.r#type.clone()),
        "Language" => Ok(info.language.clone()),
        _ => {
            let name = key.strip_prefix("Variables.").unwrap_or(key);
            variables
                .get(name)
                .cloned()
                .ok_or_else(|| format!("unknown template variable '{key}'"))
        }
    }
}

/// Substitute legacy single-brace placeholders.
pub fn apply_legacy_placeholders(content: &str, info: &ProjectInfo) -> String {
    content
        .replace("{TITLE}", &info.title)
        .replace("{AUTHOR}", &info.author)
        .replace("{DATE}", "\\today")
}

/// Render template content for one project.
///
/// `path` is only used for error reporting.
pub fn render(
    content: &str,
    path: &Path,
    info: &ProjectInfo,
    variables: &HashMap<String, String>,
) -> Result<String> {
    let content = apply_legacy_placeholders(content, info);
    let content = normalize_latex_paths(&content);

    // No delimiter pair left after normalization: write verbatim.
    if !(content.contains("{{") && content.contains("}}")) {
        return Ok(content);
    }

    let segments = parse_segments(&content).map_err(|message| TexdockError::RenderError {
        path: path.to_path_buf(),
        message,
    })?;

    let mut output = String::with_capacity(content.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => output.push_str(&text),
            Segment::Variable(key) => {
                let value = resolve_key(&key, info, variables).map_err(|message| {
                    TexdockError::RenderError {
                        path: path.to_path_buf(),
                        message,
                    }
                })?;
                output.push_str(&value);
            }
        }
    }

    Ok(output)
}

/// Known placeholder tokens that immediately mark a file as a template.
const TEMPLATE_TOKENS: &[&str] = &["{{.Title}}", "{{.Author}}", "{TITLE}", "{AUTHOR}", "{DATE}"];

/// Decide whether a file's content should go through variable substitution.
///
/// A known placeholder token wins outright. Otherwise the content must be
/// free of 0x80-0x9F control bytes (a conservative binary/encoded-content
/// guard) and carry a `{{ ... }}` span whose interior is pure 7-bit ASCII.
pub fn is_template_file(content: &[u8]) -> bool {
    let text = String::from_utf8_lossy(content);

    for token in TEMPLATE_TOKENS {
        if text.contains(token) {
            return true;
        }
    }

    if content.iter().any(|&b| b > 127 && b < 160) {
        return false;
    }

    if let (Some(start), Some(end)) = (text.find("{{"), text.find("}}")) {
        if end > start {
            let span = &text[start..end + 2];
            return span.is_ascii();
        }
    }

    false
}
