//! LaTeX path normalization.
//!
//! Templates written for other directory layouts reference packages, images
//! and chapters through a handful of legacy conventions (`misc/`, `figures/`,
//! `frontmatter/`, ...). [`normalize_latex_paths`] collapses all of them onto
//! the canonical project layout (`styles/`, `images/`, `chapters/`) so that a
//! materialized document compiles without touching TEXINPUTS.
//!
//! The transform is total and idempotent: it never fails, and applying it
//! twice yields the same output as applying it once.

/// Literal substitution table. Source and target prefixes are disjoint, so
/// application order does not matter.
const PATH_REPLACEMENTS: &[(&str, &str)] = &[
    // Packages and style files
    ("\\usepackage{misc/options}", "\\usepackage{options}"),
    ("\\usepackage{styles/options}", "\\usepackage{options}"),
    ("\\usepackage{misc/", "\\usepackage{"),
    ("\\usepackage{style/", "\\usepackage{"),
    ("\\usepackage{sty/", "\\usepackage{"),
    ("\\input{misc/", "\\input{styles/"),
    ("\\input{style/", "\\input{styles/"),
    ("\\input{sty/", "\\input{styles/"),
    // Images: unify every known directory onto images/
    ("\\includegraphics{frontmatter/", "\\includegraphics{images/"),
    ("\\includegraphics{image/", "\\includegraphics{images/"),
    ("\\includegraphics{img/", "\\includegraphics{images/"),
    ("\\includegraphics{figures/", "\\includegraphics{images/"),
    ("\\includegraphics{fig/", "\\includegraphics{images/"),
    ("\\includegraphics{graphics/", "\\includegraphics{images/"),
    ("\\includegraphics{assets/", "\\includegraphics{images/"),
    // Same image directories behind an optional-argument form
    ("]{frontmatter/", "]{images/"),
    ("]{image/", "]{images/"),
    ("]{img/", "]{images/"),
    ("]{figures/", "]{images/"),
    ("]{fig/", "]{images/"),
    ("]{graphics/", "]{images/"),
    ("]{assets/", "]{images/"),
    // Chapter-like content directories
    ("\\input{frontmatter/", "\\input{chapters/"),
    ("\\input{content/", "\\input{chapters/"),
    ("\\input{chapter/", "\\input{chapters/"),
    ("\\input{section/", "\\input{chapters/"),
    ("\\input{sections/", "\\input{chapters/"),
    ("\\include{frontmatter/", "\\include{chapters/"),
    ("\\include{content/", "\\include{chapters/"),
    ("\\include{chapter/", "\\include{chapters/"),
    ("\\include{section/", "\\include{chapters/"),
    ("\\include{sections/", "\\include{chapters/"),
    // Backmatter
    ("\\input{back/", "\\input{chapters/"),
    ("\\input{backmatter/", "\\input{chapters/"),
];

/// Normalize legacy LaTeX path conventions to the canonical project layout.
pub fn normalize_latex_paths(content: &str) -> String {
    // Strip relative-path markers first: a stripped path like `sty/colors`
    // must still hit the table below, and no table target reintroduces a
    // marker. "../" before "./", otherwise the "./" pass would leave a
    // dangling ".".
    let mut result = content.replace("../", "");
    result = result.replace("./", "");

    for (from, to) in PATH_REPLACEMENTS {
        result = result.replace(from, to);
    }

    result
}
