use pyo3::prelude::*;

mod bindings;

use bindings::{io, reconstruction, PyMesh, PyReconstructionConfig};

/// Python bindings for rsroofer
/// LoD1.2 building reconstruction from classified LiDAR and WKT footprints

#[pymodule]
fn roofer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyReconstructionConfig>()?;
    m.add_class::<PyMesh>()?;
    // Add aliases for Pythonic API
    m.setattr("ReconstructionConfig", m.getattr("PyReconstructionConfig")?)?;
    m.setattr("Mesh", m.getattr("PyMesh")?)?;

    m.add_function(wrap_pyfunction!(io::read_las_from_file, m)?)?;
    m.add_function(wrap_pyfunction!(io::read_wkt_from_file, m)?)?;
    m.add_function(wrap_pyfunction!(io::wkt_polygon_to_rings, m)?)?;
    m.add_function(wrap_pyfunction!(io::apply_offset, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruction::reconstruct, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruction::triangulate_mesh, m)?)?;

    m.add(
        "__doc__",
        "Python bindings for rsroofer - building reconstruction from LiDAR point clouds",
    )?;

    Ok(())
}
