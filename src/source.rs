//! Client script source as read from disk
//!
//! Lines keep their terminators so slices can be concatenated back into
//! byte-identical text.

use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};

/// Immutable client document: full text plus 1-indexed lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: Option<PathBuf>,
    text: String,
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.split_inclusive('\n').map(str::to_string).collect();
        Self {
            path: None,
            text,
            lines,
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        tracing::debug!("Read client script {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::from_text(text)
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// All lines, terminators included
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line `number` (1-indexed)
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lines_keep_terminators() {
        let doc = SourceDocument::from_text("a = 1\r\nb = 2\nc = 3");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line(1), Some("a = 1\r\n"));
        assert_eq!(doc.line(3), Some("c = 3"));
        assert_eq!(doc.line(0), None);
        assert_eq!(doc.line(4), None);
        assert_eq!(doc.lines().concat(), doc.text());
    }

    #[test]
    fn test_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"import os\n").unwrap();

        let doc = SourceDocument::read(file.path()).unwrap();
        assert_eq!(doc.text(), "import os\n");
        assert_eq!(doc.path(), Some(file.path()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SourceDocument::read("/definitely/not/here.py").unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
