// Gooey Core - Rust-powered argparse extraction for Gooey
//
// Finds the parse call inside a client script's main function, rewrites the
// script so main returns the parser instead of running, and loads the result
// in isolation. Architecture: tree-sitter for boundaries, plain text
// stitching for the rewrite, the embedded interpreter for the load.

use pyo3::prelude::*;

pub mod boundary;
pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod rewrite;
pub mod scan;
pub mod source;
pub mod summary;
pub mod syntax;

// PyO3 bindings layer
pub mod bindings;

pub use boundary::{resolve_boundary, Boundary};
pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use extractor::Extractor;
pub use loader::{compile_check, load_and_invoke, CompileError, ScratchScript};
pub use rewrite::{has_parse_call, rewrite_source, strip_decorator, RewrittenModule};
pub use scan::{argparse_statements, ArgparseStatement};
pub use source::SourceDocument;
pub use summary::{OptionSummary, ParserSummary};
pub use syntax::{find_by_kind, find_containing, parse_python, walk, NodeKind, SyntaxNode, SyntaxTree};

/// Gooey Core Python module
#[pymodule]
fn gooey_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Add Python functions
    m.add_function(wrap_pyfunction!(bindings::has_parse_call, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::strip_decorator, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::clean_source, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::find_boundary, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::rewrite_source, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_parser, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::describe_parser, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::argparse_statements, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::create_run_target, m)?)?;

    // Add Python classes
    m.add_class::<bindings::PyExtractorConfig>()?;
    m.add_class::<bindings::PyBoundary>()?;
    m.add_class::<bindings::PyRunTarget>()?;

    // Exceptions
    let py = m.py();
    m.add("ExtractionError", py.get_type::<error::ExtractionError>())?;
    m.add("ParseFailure", py.get_type::<error::ParseFailure>())?;
    m.add("PatternNotFound", py.get_type::<error::PatternNotFound>())?;
    m.add(
        "RewriteInvariantViolation",
        py.get_type::<error::RewriteInvariantViolation>(),
    )?;
    m.add("LoadFailure", py.get_type::<error::LoadFailure>())?;

    Ok(())
}
