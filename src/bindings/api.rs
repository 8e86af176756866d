// API Functions - PyO3-exposed functions for Python
//
// These functions provide the public API the Gooey orchestrator calls.
// Every function that looks for markers accepts an optional `config`.

use super::{PyBoundary, PyExtractorConfig, PyRunTarget};
use crate::extractor::Extractor;
use crate::source::SourceDocument;
use crate::summary::ParserSummary;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn extractor_for(config: Option<PyRef<'_, PyExtractorConfig>>) -> Extractor {
    config
        .map(|c| Extractor::new(c.inner().clone()))
        .unwrap_or_default()
}

/// Check whether the source calls `.parse_args(` anywhere (case-insensitive)
///
/// Args:
///     source (str): Client script text
///     config (ExtractorConfig, optional): Marker overrides
///
/// Returns:
///     bool: True if at least one line contains the parse-call marker
#[pyfunction]
#[pyo3(signature = (source, config=None))]
pub fn has_parse_call(source: &str, config: Option<PyRef<'_, PyExtractorConfig>>) -> bool {
    extractor_for(config).has_parse_call(source)
}

/// Remove every line containing the decorator marker (`@gooey` by default)
#[pyfunction]
#[pyo3(signature = (source, config=None))]
pub fn strip_decorator(source: &str, config: Option<PyRef<'_, PyExtractorConfig>>) -> String {
    extractor_for(config).strip_decorator(source)
}

/// Read a script and strip its decorator lines
///
/// Raises:
///     OSError: If the file cannot be read
#[pyfunction]
#[pyo3(signature = (path, config=None))]
pub fn clean_source(path: &str, config: Option<PyRef<'_, PyExtractorConfig>>) -> PyResult<String> {
    Ok(extractor_for(config).clean_source(path)?)
}

/// Locate the parse call and the end of main in a script
///
/// Raises:
///     ParseFailure: If the script is not valid Python
///     PatternNotFound: If there is no main function or parse-call assignment
#[pyfunction]
#[pyo3(signature = (path, config=None))]
pub fn find_boundary(
    py: Python<'_>,
    path: &str,
    config: Option<PyRef<'_, PyExtractorConfig>>,
) -> PyResult<PyBoundary> {
    let extractor = extractor_for(config);
    let doc = SourceDocument::read(path)?;
    extractor.check_syntax(py, &doc)?;
    let boundary = extractor.find_boundary(&doc)?;
    Ok(PyBoundary::from_boundary(boundary))
}

/// Rewritten source whose main returns the parser instead of running
#[pyfunction]
#[pyo3(signature = (path, config=None))]
pub fn rewrite_source(
    py: Python<'_>,
    path: &str,
    config: Option<PyRef<'_, PyExtractorConfig>>,
) -> PyResult<String> {
    let extractor = extractor_for(config);
    let doc = SourceDocument::read(path)?;
    extractor.check_syntax(py, &doc)?;
    Ok(extractor.rewrite(&doc)?.into_source())
}

/// Statements that build the parser, found without running the script
///
/// Returns:
///     list[tuple[str, int, str]]: (node kind, line, source text) for each
///     import, `ArgumentParser` assignment and `add_argument` call
///
/// Raises:
///     ParseFailure: If the script is not valid Python
#[pyfunction]
pub fn argparse_statements(path: &str) -> PyResult<Vec<(&'static str, usize, String)>> {
    let doc = SourceDocument::read(path)?;
    let statements = Extractor::default().argparse_statements(&doc)?;
    Ok(statements
        .into_iter()
        .map(|s| (s.kind.as_str(), s.line, s.text))
        .collect())
}

/// Extract the fully populated parser object from a client script
///
/// The script's top-level code runs once in an isolated module; nothing after
/// the parse call in main is executed.
///
/// Raises:
///     ParseFailure, PatternNotFound, RewriteInvariantViolation, LoadFailure
#[pyfunction]
#[pyo3(signature = (path, config=None))]
pub fn extract_parser(
    py: Python<'_>,
    path: &str,
    config: Option<PyRef<'_, PyExtractorConfig>>,
) -> PyResult<Py<PyAny>> {
    let parser = extractor_for(config).extract(py, path)?;
    Ok(parser.unbind())
}

/// JSON description (prog, description, options) of an argparse parser
#[pyfunction]
pub fn describe_parser(parser: &Bound<'_, PyAny>) -> PyResult<String> {
    ParserSummary::from_parser(parser)?
        .to_json()
        .map_err(|e| PyValueError::new_err(format!("Summary serialization failed: {}", e)))
}

/// Decorator-free copy of the script in a scoped temp file
///
/// Args:
///     path (str): Client script
///     interpreter (str): Executable used in `RunTarget.command`
///
/// Returns:
///     RunTarget: Owns the temp file; use as a context manager or call close()
#[pyfunction]
#[pyo3(signature = (path, interpreter="python", config=None))]
pub fn create_run_target(
    path: &str,
    interpreter: &str,
    config: Option<PyRef<'_, PyExtractorConfig>>,
) -> PyResult<PyRunTarget> {
    let script = extractor_for(config).create_run_target(path)?;
    Ok(PyRunTarget::new(script, interpreter.to_string()))
}
