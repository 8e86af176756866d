// PyRunTarget - decorator-free copy of the client script for the real run
//
// Owns the scratch file. It is deleted on close(), on context-manager exit,
// or when Python drops the object.

use crate::loader::ScratchScript;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyTuple;

#[pyclass(name = "RunTarget")]
pub struct PyRunTarget {
    script: Option<ScratchScript>,
    interpreter: String,
}

impl PyRunTarget {
    pub fn new(script: ScratchScript, interpreter: String) -> Self {
        PyRunTarget {
            script: Some(script),
            interpreter,
        }
    }

    fn script(&self) -> PyResult<&ScratchScript> {
        self.script
            .as_ref()
            .ok_or_else(|| PyValueError::new_err("RunTarget is closed"))
    }
}

#[pymethods]
impl PyRunTarget {
    #[getter]
    fn path(&self) -> PyResult<String> {
        Ok(self.script()?.path().to_string_lossy().into_owned())
    }

    /// Command line that runs the cleaned script
    #[getter]
    fn command(&self) -> PyResult<String> {
        let path = self.path()?;
        if path.chars().any(char::is_whitespace) {
            Ok(format!("{} \"{}\"", self.interpreter, path))
        } else {
            Ok(format!("{} {}", self.interpreter, path))
        }
    }

    #[getter]
    fn closed(&self) -> bool {
        self.script.is_none()
    }

    fn close(&mut self) -> PyResult<()> {
        match self.script.take() {
            Some(script) => script.close().map_err(PyErr::from),
            None => Ok(()),
        }
    }

    fn __enter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    #[pyo3(signature = (*_args))]
    fn __exit__(&mut self, _args: &Bound<'_, PyTuple>) -> PyResult<bool> {
        self.close()?;
        Ok(false)
    }

    fn __repr__(&self) -> String {
        match &self.script {
            Some(script) => format!("RunTarget(path={:?})", script.path()),
            None => "RunTarget(closed)".to_string(),
        }
    }
}
