use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rsroofer::ReconstructionConfig;

/// ReconstructionConfig Python binding
#[pyclass]
#[derive(Clone)]
pub struct PyReconstructionConfig {
    pub(crate) inner: ReconstructionConfig,
}

#[pymethods]
impl PyReconstructionConfig {
    #[new]
    fn new() -> Self {
        PyReconstructionConfig {
            inner: ReconstructionConfig::default(),
        }
    }

    /// Load from a JSON file
    #[staticmethod]
    fn from_json_file(path: String) -> PyResult<Self> {
        ReconstructionConfig::from_json_file(&path)
            .map(|inner| PyReconstructionConfig { inner })
            .map_err(|e| PyValueError::new_err(format!("Failed to load config: {}", e)))
    }

    #[getter]
    fn complexity_factor(&self) -> f64 {
        self.inner.complexity_factor
    }

    #[setter]
    fn set_complexity_factor(&mut self, value: f64) {
        self.inner.complexity_factor = value;
    }

    #[getter]
    fn simplify_tolerance(&self) -> f64 {
        self.inner.simplify_tolerance
    }

    #[setter]
    fn set_simplify_tolerance(&mut self, value: f64) {
        self.inner.simplify_tolerance = value;
    }

    #[getter]
    fn roof_percentile(&self) -> f64 {
        self.inner.roof_percentile
    }

    #[setter]
    fn set_roof_percentile(&mut self, value: f64) {
        self.inner.roof_percentile = value;
    }

    #[getter]
    fn ground_percentile(&self) -> f64 {
        self.inner.ground_percentile
    }

    #[setter]
    fn set_ground_percentile(&mut self, value: f64) {
        self.inner.ground_percentile = value;
    }

    #[getter]
    fn floor_elevation(&self) -> Option<f64> {
        self.inner.floor_elevation
    }

    #[setter]
    fn set_floor_elevation(&mut self, value: Option<f64>) {
        self.inner.floor_elevation = value;
    }

    #[getter]
    fn clip_to_footprint(&self) -> bool {
        self.inner.clip_to_footprint
    }

    #[setter]
    fn set_clip_to_footprint(&mut self, value: bool) {
        self.inner.clip_to_footprint = value;
    }

    #[getter]
    fn min_roof_points(&self) -> usize {
        self.inner.min_roof_points
    }

    #[setter]
    fn set_min_roof_points(&mut self, value: usize) {
        self.inner.min_roof_points = value;
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}
