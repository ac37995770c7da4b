use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use rsroofer::{Error, Offset, Point3D, Ring};

pub(crate) fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::Io { .. } | Error::Las(_) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Read building (class 6) and ground (class 2) points from a LAS/LAZ file
#[pyfunction]
#[pyo3(signature = (file_path, x_offset = 0.0, y_offset = 0.0))]
pub fn read_las_from_file(
    file_path: String,
    x_offset: f64,
    y_offset: f64,
) -> PyResult<(Vec<Point3D>, Vec<Point3D>)> {
    let points = rsroofer::read_las_from_file(&file_path, Offset::new(x_offset, y_offset))
        .map_err(to_py_err)?;
    Ok((points.building, points.ground))
}

/// Read a WKT string from a text file
#[pyfunction]
pub fn read_wkt_from_file(file_path: String) -> PyResult<String> {
    rsroofer::read_wkt_from_file(&file_path).map_err(to_py_err)
}

/// Parse a WKT polygon into [exterior, *interiors] rings of [x, y, z]
#[pyfunction]
#[pyo3(signature = (wkt_str, x_offset = 0.0, y_offset = 0.0))]
pub fn wkt_polygon_to_rings(wkt_str: &str, x_offset: f64, y_offset: f64) -> PyResult<Vec<Ring>> {
    rsroofer::wkt_polygon_to_rings(wkt_str, Offset::new(x_offset, y_offset)).map_err(to_py_err)
}

/// Add (x_offset, y_offset) to every point; points need at least 2 coordinates
#[pyfunction]
pub fn apply_offset(
    mut points: Vec<Vec<f64>>,
    x_offset: f64,
    y_offset: f64,
) -> PyResult<Vec<Vec<f64>>> {
    rsroofer::apply_offset_rows(&mut points, Offset::new(x_offset, y_offset))
        .map_err(to_py_err)?;
    Ok(points)
}
