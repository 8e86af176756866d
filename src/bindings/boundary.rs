// PyBoundary - PyO3 wrapper for Boundary
//
// Read-only from Python; mostly useful for diagnostics.

use crate::boundary::Boundary;
use pyo3::prelude::*;

#[pyclass(name = "Boundary")]
pub struct PyBoundary {
    inner: Boundary,
}

impl PyBoundary {
    pub fn from_boundary(boundary: Boundary) -> Self {
        PyBoundary { inner: boundary }
    }
}

#[pymethods]
impl PyBoundary {
    #[getter]
    fn cutoff_line(&self) -> usize {
        self.inner.cutoff_line
    }

    #[getter]
    fn restart_line(&self) -> usize {
        self.inner.restart_line
    }

    #[getter]
    fn column_offset(&self) -> usize {
        self.inner.column_offset
    }

    #[getter]
    fn target_name(&self) -> String {
        self.inner.target_name.clone()
    }

    #[getter]
    fn entry_point(&self) -> String {
        self.inner.entry_point.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "Boundary(cutoff_line={}, restart_line={}, column_offset={}, target_name={:?}, entry_point={:?})",
            self.inner.cutoff_line,
            self.inner.restart_line,
            self.inner.column_offset,
            self.inner.target_name,
            self.inner.entry_point
        )
    }
}
