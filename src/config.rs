//! Extraction configuration
//!
//! The markers the pipeline looks for. Defaults match the argparse/Gooey
//! pattern; every field can be overridden from JSON or from Python.

use serde::{Deserialize, Serialize};

/// Markers and switches used by the extraction pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Substring a function name must contain to be treated as the entry routine
    pub entry_marker: String,
    /// Method name of the terminal parse call (matched as an exact token)
    pub parse_call: String,
    /// Raw-text marker for the `has_parse_call` pre-check (case-insensitive)
    pub parse_call_marker: String,
    /// Lines containing this (lowercased) are dropped from rewritten source
    pub decorator_marker: String,
    /// Prefix for the scratch module's file and module name
    pub module_prefix: String,
    /// Re-parse (and, when loading, compile) rewritten source; reject it if that fails
    pub verify_rewrite: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            entry_marker: "main".to_string(),
            parse_call: "parse_args".to_string(),
            parse_call_marker: ".parse_args(".to_string(),
            decorator_marker: "@gooey".to_string(),
            module_prefix: "gooey_client_".to_string(),
            verify_rewrite: true,
        }
    }
}

impl ExtractorConfig {
    /// Build a config from a JSON object; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
