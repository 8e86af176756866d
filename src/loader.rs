//! Isolated loader
//!
//! Materializes a rewritten module in a scoped temp file, executes it under a
//! unique module name (never `__main__`), calls its entry point once and hands
//! back whatever the entry point returned.

use crate::error::{ExtractError, Result};
use crate::rewrite::RewrittenModule;
use pyo3::exceptions::PySyntaxError;
use pyo3::prelude::*;
use pyo3::types::{PyModule, PyTracebackMethods};
use std::ffi::CString;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A Python source file that lives exactly as long as this guard
///
/// The backing file is removed when the guard is dropped, whether or not
/// loading succeeded.
#[derive(Debug)]
pub struct ScratchScript {
    file: NamedTempFile,
    module_name: String,
}

impl ScratchScript {
    pub fn create(source: &str, prefix: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".py")
            .tempfile()
            .map_err(|e| ExtractError::io(std::env::temp_dir(), e))?;

        let path = file.path().to_path_buf();
        file.write_all(source.as_bytes())
            .map_err(|e| ExtractError::io(&path, e))?;
        file.flush().map_err(|e| ExtractError::io(&path, e))?;

        let module_name = module_name_for(&path);
        debug!("Wrote scratch module {} to {}", module_name, path.display());
        Ok(Self { file, module_name })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Importable name derived from the file stem
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Delete the backing file now, reporting any failure
    pub fn close(self) -> Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close().map_err(|e| ExtractError::io(path, e))
    }
}

fn module_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) || name.is_empty() {
        format!("_{name}")
    } else {
        name
    }
}

/// Where the interpreter's compiler rejected a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// 1-indexed line, 0 when the compiler gave none
    pub line: usize,
    /// 0-indexed column
    pub column: usize,
    pub message: String,
}

/// Compile `source` with the interpreter's own `compile(..., "exec")`
///
/// Nothing is executed. Catches what the tree-sitter grammar lets through,
/// such as tab/space mixing or `return` outside a function.
pub fn compile_check(
    py: Python<'_>,
    source: &str,
    file_name: &str,
) -> std::result::Result<(), CompileError> {
    let compiled = py
        .import("builtins")
        .and_then(|builtins| builtins.getattr("compile"))
        .and_then(|compile| compile.call1((source, file_name, "exec")));

    let err = match compiled {
        Ok(_) => return Ok(()),
        Err(err) => err,
    };
    if !err.is_instance_of::<PySyntaxError>(py) {
        return Err(CompileError {
            line: 0,
            column: 0,
            message: err.to_string(),
        });
    }

    let value = err.value(py);
    let line = value
        .getattr("lineno")
        .ok()
        .and_then(|v| v.extract::<usize>().ok());
    let offset = value
        .getattr("offset")
        .ok()
        .and_then(|v| v.extract::<usize>().ok());
    let message = value
        .getattr("msg")
        .ok()
        .and_then(|v| v.extract::<String>().ok())
        .unwrap_or_else(|| err.to_string());

    Err(CompileError {
        line: line.unwrap_or(0),
        column: offset.map_or(0, |o| o.saturating_sub(1)),
        message,
    })
}

/// Load `module` in isolation and call its entry point
///
/// `search_path` (normally the client script's directory) is put at the front
/// of `sys.path` while the module executes so sibling imports resolve the way
/// they do when the script is run directly.
pub fn load_and_invoke<'py>(
    py: Python<'py>,
    module: &RewrittenModule,
    module_prefix: &str,
    search_path: Option<&Path>,
) -> Result<Bound<'py, PyAny>> {
    let script = ScratchScript::create(module.source(), module_prefix)?;

    let pushed = match search_path {
        Some(dir) => push_search_path(py, dir),
        None => None,
    };

    let result = invoke(py, &script, module.entry_point());

    forget_module(py, script.module_name());
    if let Some(entry) = pushed {
        pop_search_path(py, &entry);
    }
    if let Err(e) = script.close() {
        warn!("Failed to remove scratch module: {}", e);
    }

    result
}

fn invoke<'py>(py: Python<'py>, script: &ScratchScript, entry_point: &str) -> Result<Bound<'py, PyAny>> {
    let source = std::fs::read_to_string(script.path())
        .map_err(|e| ExtractError::io(script.path(), e))?;
    let code = CString::new(source)
        .map_err(|_| ExtractError::load_failure("rewritten source contains a NUL byte"))?;
    let file_name = CString::new(script.path().to_string_lossy().as_bytes())
        .map_err(|_| ExtractError::load_failure("scratch path contains a NUL byte"))?;
    let module_name = CString::new(script.module_name())
        .map_err(|_| ExtractError::load_failure("module name contains a NUL byte"))?;

    let loaded = PyModule::from_code(py, &code, &file_name, &module_name)
        .map_err(|e| load_error(py, "executing rewritten module", e))?;

    let entry = loaded
        .getattr(entry_point)
        .map_err(|e| load_error(py, &format!("entry point '{entry_point}' not found"), e))?;

    let value = entry
        .call0()
        .map_err(|e| load_error(py, &format!("calling '{entry_point}'"), e))?;

    if value.is_none() {
        return Err(ExtractError::load_failure(format!(
            "'{entry_point}' returned None instead of the parser"
        )));
    }

    debug!(
        "Entry point '{}' returned {}",
        entry_point,
        value
            .get_type()
            .name()
            .map(|n| n.to_string())
            .unwrap_or_default()
    );
    Ok(value)
}

fn load_error(py: Python<'_>, context: &str, err: PyErr) -> ExtractError {
    let traceback = err.traceback(py).and_then(|tb| tb.format().ok());
    ExtractError::LoadFailure {
        message: format!("{context}: {err}"),
        traceback,
    }
}

fn forget_module(py: Python<'_>, name: &str) {
    let removed = py
        .import("sys")
        .and_then(|sys| sys.getattr("modules"))
        .and_then(|modules| modules.del_item(name));
    if let Err(e) = removed {
        debug!("Module {} was not registered in sys.modules: {}", name, e);
    }
}

/// Insert `dir` at `sys.path[0]`; returns the inserted entry on success
fn push_search_path(py: Python<'_>, dir: &Path) -> Option<String> {
    let entry = dir.to_string_lossy().into_owned();
    let inserted = py
        .import("sys")
        .and_then(|sys| sys.getattr("path"))
        .and_then(|path| path.call_method1("insert", (0, entry.as_str())));
    match inserted {
        Ok(_) => Some(entry),
        Err(e) => {
            warn!("Could not add {} to sys.path: {}", entry, e);
            None
        }
    }
}

fn pop_search_path(py: Python<'_>, entry: &str) {
    let removed = py
        .import("sys")
        .and_then(|sys| sys.getattr("path"))
        .and_then(|path| path.call_method1("remove", (entry,)));
    if let Err(e) = removed {
        debug!("Search path entry {} already gone: {}", entry, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_script_is_removed_on_drop() {
        let script = ScratchScript::create("x = 1\n", "gooey_client_").unwrap();
        let path = script.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\n");
        drop(script);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_removes_file() {
        let script = ScratchScript::create("", "gooey_client_").unwrap();
        let path = script.path().to_path_buf();
        script.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_module_name_is_importable() {
        let script = ScratchScript::create("", "gooey_client_").unwrap();
        let name = script.module_name();
        assert!(name.starts_with("gooey_client_"));
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_module_name_sanitizes_stem() {
        assert_eq!(module_name_for(Path::new("/tmp/a-b.c.py")), "a_b_c");
        assert_eq!(module_name_for(Path::new("/tmp/9lives.py")), "_9lives");
    }
}
