// PyO3 Bindings Module
//
// Python surface for the extraction pipeline. Wraps the Rust types
// (ExtractorConfig, Boundary, ScratchScript) in PyO3-compatible classes.

mod api;
mod boundary;
mod config;
mod run_target;

// Re-export for lib.rs
pub use api::{
    argparse_statements, clean_source, create_run_target, describe_parser, extract_parser,
    find_boundary, has_parse_call, rewrite_source, strip_decorator,
};
pub use boundary::PyBoundary;
pub use config::PyExtractorConfig;
pub use run_target::PyRunTarget;
