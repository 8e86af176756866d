// Extraction errors
//
// Every failure in the pipeline is structural (bad source, missing pattern,
// broken rewrite, client exception), so nothing here is retried.

use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::PyErr;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading the client script or writing the scratch module failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The client document is not syntactically valid Python
    #[error("Parse failure at line {line}, column {column}: {message}")]
    ParseFailure {
        line: usize,
        column: usize,
        message: String,
    },

    /// No qualifying main function or parse-call assignment
    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    /// The computed boundary would produce broken source
    #[error("Rewrite invariant violated: {0}")]
    RewriteInvariantViolation(String),

    /// The rewritten module raised, or its entry point returned nothing
    #[error("Load failure: {message}")]
    LoadFailure {
        message: String,
        traceback: Option<String>,
    },
}

impl ExtractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn pattern_not_found(msg: impl Into<String>) -> Self {
        ExtractError::PatternNotFound(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        ExtractError::RewriteInvariantViolation(msg.into())
    }

    pub fn load_failure(msg: impl Into<String>) -> Self {
        ExtractError::LoadFailure {
            message: msg.into(),
            traceback: None,
        }
    }
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

create_exception!(gooey_core, ExtractionError, PyException);
create_exception!(gooey_core, ParseFailure, ExtractionError);
create_exception!(gooey_core, PatternNotFound, ExtractionError);
create_exception!(gooey_core, RewriteInvariantViolation, ExtractionError);
create_exception!(gooey_core, LoadFailure, ExtractionError);

impl From<ExtractError> for PyErr {
    fn from(err: ExtractError) -> PyErr {
        let message = err.to_string();
        match err {
            ExtractError::Io { .. } => pyo3::exceptions::PyOSError::new_err(message),
            ExtractError::ParseFailure { .. } => ParseFailure::new_err(message),
            ExtractError::PatternNotFound(_) => PatternNotFound::new_err(message),
            ExtractError::RewriteInvariantViolation(_) => {
                RewriteInvariantViolation::new_err(message)
            }
            ExtractError::LoadFailure { traceback, .. } => match traceback {
                Some(tb) => LoadFailure::new_err(format!("{message}\n{tb}")),
                None => LoadFailure::new_err(message),
            },
        }
    }
}
