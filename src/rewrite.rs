//! Source rewriting
//!
//! Pure text transformations over a `SourceDocument`:
//! - `rewrite_source`: cut main at the parse call and return the parser instead
//! - `strip_decorator`: drop decorator-marker lines only
//! - `has_parse_call`: cheap pre-check before any parsing happens

use crate::boundary::Boundary;
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::source::SourceDocument;
use crate::syntax::parse_python;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static LEADING_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t\x0c]*").unwrap());

/// Rewritten client source whose entry point returns the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenModule {
    source: String,
    entry_point: String,
}

impl RewrittenModule {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn into_source(self) -> String {
        self.source
    }
}

/// Stitch `top + return + bottom`, dropping decorator-marker lines
pub fn rewrite_source(
    doc: &SourceDocument,
    boundary: &Boundary,
    config: &ExtractorConfig,
) -> Result<RewrittenModule> {
    let cut_line = check_boundary(doc, boundary)?;

    let indent = leading_whitespace(cut_line);
    if indent.len() != boundary.column_offset {
        return Err(ExtractError::invariant(format!(
            "statement at line {} starts at column {} but the line is indented by {}",
            boundary.cutoff_line,
            boundary.column_offset,
            indent.len()
        )));
    }
    let indent = &indent[..boundary.column_offset];

    let newline = if cut_line.ends_with("\r\n") { "\r\n" } else { "\n" };
    let return_statement = format!(
        "{indent}return {target}{newline}{newline}",
        target = boundary.target_name
    );

    let lines = doc.lines();
    let top = &lines[..boundary.cutoff_line - 1];
    let bottom = lines.get(boundary.restart_line..).unwrap_or(&[]);
    check_restart(bottom, boundary)?;

    let marker = config.decorator_marker.to_lowercase();
    let source: String = top
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(return_statement.as_str()))
        .chain(bottom.iter().map(String::as_str))
        .filter(|line| !is_marked(line, &marker))
        .collect();

    if config.verify_rewrite {
        if let Err(err) = parse_python(&source) {
            return Err(ExtractError::invariant(format!(
                "rewritten source no longer parses: {err}"
            )));
        }
    }

    debug!(
        "Rewrote {} lines into {} lines (kept {} above cutoff, {} below restart)",
        doc.line_count(),
        source.lines().count(),
        top.len(),
        bottom.len()
    );

    Ok(RewrittenModule {
        source,
        entry_point: boundary.entry_point.clone(),
    })
}

/// Remove every line whose lowercased text contains `marker`
pub fn strip_decorator(source: &str, marker: &str) -> String {
    let marker = marker.to_lowercase();
    source
        .split_inclusive('\n')
        .filter(|line| !is_marked(line, &marker))
        .collect()
}

/// Whether any line contains `marker`, ignoring case
pub fn has_parse_call(source: &str, marker: &str) -> bool {
    let marker = marker.to_lowercase();
    source
        .lines()
        .any(|line| line.to_lowercase().contains(&marker))
}

fn is_marked(line: &str, lowered_marker: &str) -> bool {
    !lowered_marker.is_empty() && line.to_lowercase().contains(lowered_marker)
}

fn leading_whitespace(line: &str) -> &str {
    LEADING_WHITESPACE.find(line).map_or("", |m| m.as_str())
}

/// The first statement kept after main must be a module-level one
fn check_restart(bottom: &[String], boundary: &Boundary) -> Result<()> {
    let first = bottom.iter().enumerate().find(|(_, line)| {
        let code = line.trim_start();
        !code.is_empty() && !code.starts_with('#')
    });
    match first {
        Some((offset, line)) if !leading_whitespace(line).is_empty() => {
            Err(ExtractError::invariant(format!(
                "line {} kept after restart line {} is indented, so main's region was cut short",
                boundary.restart_line + offset + 1,
                boundary.restart_line
            )))
        }
        _ => Ok(()),
    }
}

/// Check the boundary against the document; returns the cutoff line's text
fn check_boundary<'a>(doc: &'a SourceDocument, boundary: &Boundary) -> Result<&'a str> {
    let count = doc.line_count();
    if boundary.cutoff_line < 1 || boundary.cutoff_line > count {
        return Err(ExtractError::invariant(format!(
            "cutoff line {} outside document of {count} lines",
            boundary.cutoff_line
        )));
    }
    if boundary.restart_line < boundary.cutoff_line || boundary.restart_line > count + 1 {
        return Err(ExtractError::invariant(format!(
            "restart line {} not between cutoff line {} and end of document",
            boundary.restart_line, boundary.cutoff_line
        )));
    }
    if boundary.target_name.is_empty() {
        return Err(ExtractError::invariant("empty return target"));
    }
    doc.line(boundary.cutoff_line)
        .ok_or_else(|| ExtractError::invariant("cutoff line missing"))
}
