// PyExtractorConfig - PyO3 wrapper for ExtractorConfig
//
// Every keyword is optional; omitted ones keep the Rust defaults.

use crate::config::ExtractorConfig;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python-accessible extraction configuration
#[pyclass(name = "ExtractorConfig")]
#[derive(Clone)]
pub struct PyExtractorConfig {
    inner: ExtractorConfig,
}

impl PyExtractorConfig {
    pub fn inner(&self) -> &ExtractorConfig {
        &self.inner
    }
}

#[pymethods]
impl PyExtractorConfig {
    #[new]
    #[pyo3(signature = (
        entry_marker=None,
        parse_call=None,
        parse_call_marker=None,
        decorator_marker=None,
        module_prefix=None,
        verify_rewrite=None
    ))]
    fn new(
        entry_marker: Option<String>,
        parse_call: Option<String>,
        parse_call_marker: Option<String>,
        decorator_marker: Option<String>,
        module_prefix: Option<String>,
        verify_rewrite: Option<bool>,
    ) -> Self {
        let defaults = ExtractorConfig::default();
        PyExtractorConfig {
            inner: ExtractorConfig {
                entry_marker: entry_marker.unwrap_or(defaults.entry_marker),
                parse_call: parse_call.unwrap_or(defaults.parse_call),
                parse_call_marker: parse_call_marker.unwrap_or(defaults.parse_call_marker),
                decorator_marker: decorator_marker.unwrap_or(defaults.decorator_marker),
                module_prefix: module_prefix.unwrap_or(defaults.module_prefix),
                verify_rewrite: verify_rewrite.unwrap_or(defaults.verify_rewrite),
            },
        }
    }

    /// Build a config from a JSON object string
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        ExtractorConfig::from_json(json)
            .map(|inner| PyExtractorConfig { inner })
            .map_err(|e| PyValueError::new_err(format!("Invalid config: {}", e)))
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner)
            .map_err(|e| PyValueError::new_err(format!("Config serialization failed: {}", e)))
    }

    #[getter]
    fn entry_marker(&self) -> String {
        self.inner.entry_marker.clone()
    }

    #[getter]
    fn parse_call(&self) -> String {
        self.inner.parse_call.clone()
    }

    #[getter]
    fn parse_call_marker(&self) -> String {
        self.inner.parse_call_marker.clone()
    }

    #[getter]
    fn decorator_marker(&self) -> String {
        self.inner.decorator_marker.clone()
    }

    #[getter]
    fn module_prefix(&self) -> String {
        self.inner.module_prefix.clone()
    }

    #[getter]
    fn verify_rewrite(&self) -> bool {
        self.inner.verify_rewrite
    }

    fn __repr__(&self) -> String {
        format!(
            "ExtractorConfig(entry_marker={:?}, parse_call={:?}, decorator_marker={:?})",
            self.inner.entry_marker, self.inner.parse_call, self.inner.decorator_marker
        )
    }
}
