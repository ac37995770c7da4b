use pyo3::prelude::*;
use rsroofer::{Point3D, ReconstructionConfig, Ring};

use crate::bindings::config::PyReconstructionConfig;
use crate::bindings::io::to_py_err;
use crate::bindings::mesh::PyMesh;

/// Reconstruct building meshes from building points, ground points and a footprint
#[pyfunction]
#[pyo3(signature = (building_pts, ground_pts, footprint, config = None))]
pub fn reconstruct(
    building_pts: Vec<Point3D>,
    ground_pts: Vec<Point3D>,
    footprint: Vec<Ring>,
    config: Option<PyRef<'_, PyReconstructionConfig>>,
) -> PyResult<Vec<PyMesh>> {
    let config: ReconstructionConfig = config.map(|c| c.inner.clone()).unwrap_or_default();
    let meshes = rsroofer::reconstruct(&building_pts, &ground_pts, &footprint, &config)
        .map_err(to_py_err)?;
    Ok(meshes.into_iter().map(|inner| PyMesh { inner }).collect())
}

/// Triangulate a mesh into (vertices, faces)
#[pyfunction]
pub fn triangulate_mesh(mesh: PyRef<'_, PyMesh>) -> PyResult<(Vec<Point3D>, Vec<[usize; 3]>)> {
    let triangulated = rsroofer::triangulate_mesh(&mesh.inner).map_err(to_py_err)?;
    Ok((triangulated.vertices, triangulated.faces))
}
