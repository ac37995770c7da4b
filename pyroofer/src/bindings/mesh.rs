use pyo3::prelude::*;
use rsroofer::{Mesh, SurfaceType};

/// Reconstructed building mesh, opaque on the Python side
#[pyclass]
#[derive(Clone)]
pub struct PyMesh {
    pub(crate) inner: Mesh,
}

#[pymethods]
impl PyMesh {
    #[getter]
    fn floor_elevation(&self) -> f64 {
        self.inner.floor_elevation
    }

    #[getter]
    fn roof_elevation(&self) -> f64 {
        self.inner.roof_elevation
    }

    /// Number of surfaces
    fn __len__(&self) -> usize {
        self.inner.surfaces.len()
    }

    /// Surface labels: "ground", "roof" or "wall"
    fn labels(&self) -> Vec<&'static str> {
        self.inner
            .surfaces
            .iter()
            .map(|s| match s.surface_type {
                SurfaceType::Ground => "ground",
                SurfaceType::Roof => "roof",
                SurfaceType::Wall => "wall",
            })
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Mesh(surfaces={}, floor={:.3}, roof={:.3})",
            self.inner.surfaces.len(),
            self.inner.floor_elevation,
            self.inner.roof_elevation
        )
    }
}
