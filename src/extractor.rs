//! Extractor - public entry point for the extraction pipeline
//!
//! read → compile check → parse → resolve boundary → rewrite → load. Each
//! step is also available on its own so the orchestrator can stop early (for
//! instance to show the rewritten text, or to skip extraction when there is
//! no parse call).

use crate::boundary::{resolve_boundary, Boundary};
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::loader::{compile_check, load_and_invoke, ScratchScript};
use crate::rewrite::{self, rewrite_source, RewrittenModule};
use crate::scan::{argparse_statements, ArgparseStatement};
use crate::source::SourceDocument;
use crate::syntax::parse_python;
use pyo3::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Stateless apart from its configuration; one call = one extraction
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Textual pre-check: does the script call the parser at all?
    pub fn has_parse_call(&self, source: &str) -> bool {
        rewrite::has_parse_call(source, &self.config.parse_call_marker)
    }

    pub fn strip_decorator(&self, source: &str) -> String {
        rewrite::strip_decorator(source, &self.config.decorator_marker)
    }

    /// The script at `path` with decorator lines removed
    pub fn clean_source(&self, path: impl AsRef<Path>) -> Result<String> {
        let doc = SourceDocument::read(path)?;
        Ok(self.strip_decorator(doc.text()))
    }

    pub fn find_boundary(&self, doc: &SourceDocument) -> Result<Boundary> {
        let tree = parse_python(doc.text())?;
        resolve_boundary(&tree, doc.line_count(), &self.config)
    }

    /// Compile the document with the interpreter itself; nothing runs
    ///
    /// A rejection is a `ParseFailure` at the compiler's position.
    pub fn check_syntax(&self, py: Python<'_>, doc: &SourceDocument) -> Result<()> {
        compile_check(py, doc.text(), &display_name(doc)).map_err(|e| {
            ExtractError::ParseFailure {
                line: e.line,
                column: e.column,
                message: e.message,
            }
        })
    }

    /// Parser-building statements found without running the script
    pub fn argparse_statements(&self, doc: &SourceDocument) -> Result<Vec<ArgparseStatement>> {
        let tree = parse_python(doc.text())?;
        Ok(argparse_statements(&tree, doc.text()))
    }

    pub fn rewrite(&self, doc: &SourceDocument) -> Result<RewrittenModule> {
        let boundary = self.find_boundary(doc)?;
        rewrite_source(doc, &boundary, &self.config)
    }

    pub fn rewrite_file(&self, path: impl AsRef<Path>) -> Result<RewrittenModule> {
        self.rewrite(&SourceDocument::read(path)?)
    }

    /// Run the full pipeline on the script at `path` and return its parser
    pub fn extract<'py>(&self, py: Python<'py>, path: impl AsRef<Path>) -> Result<Bound<'py, PyAny>> {
        let path = path.as_ref();
        info!("Extracting parser from {}", path.display());
        let doc = SourceDocument::read(path)?;
        self.extract_document(py, &doc)
    }

    /// Like `extract`, but skips scripts that never call the parser
    pub fn extract_if_present<'py>(
        &self,
        py: Python<'py>,
        path: impl AsRef<Path>,
    ) -> Result<Option<Bound<'py, PyAny>>> {
        let path = path.as_ref();
        let doc = SourceDocument::read(path)?;
        if !self.has_parse_call(doc.text()) {
            info!("No parse call in {}, skipping extraction", path.display());
            return Ok(None);
        }
        self.extract_document(py, &doc).map(Some)
    }

    pub fn extract_document<'py>(
        &self,
        py: Python<'py>,
        doc: &SourceDocument,
    ) -> Result<Bound<'py, PyAny>> {
        self.check_syntax(py, doc)?;
        let module = self.rewrite(doc)?;
        if self.config.verify_rewrite {
            compile_check(py, module.source(), &display_name(doc)).map_err(|e| {
                ExtractError::invariant(format!(
                    "rewritten source does not compile at line {}: {}",
                    e.line, e.message
                ))
            })?;
        }
        let search_path = doc.path().and_then(Path::parent).filter(|p| !p.as_os_str().is_empty());
        debug!(
            "Loading rewritten module (entry point '{}', search path {:?})",
            module.entry_point(),
            search_path
        );
        load_and_invoke(py, &module, &self.config.module_prefix, search_path)
    }

    /// Decorator-free copy of the script for the real run
    ///
    /// The copy lives in a scoped temp file owned by the returned guard.
    pub fn create_run_target(&self, path: impl AsRef<Path>) -> Result<ScratchScript> {
        let cleaned = self.clean_source(path)?;
        ScratchScript::create(&cleaned, &self.config.module_prefix)
    }
}

fn display_name(doc: &SourceDocument) -> String {
    doc.path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<client>".to_string())
}
