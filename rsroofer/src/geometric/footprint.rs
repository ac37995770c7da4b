use geo::{Coord, LineString, Polygon};
use log::debug;
use std::path::Path;
use std::str::FromStr;
use wkt::Wkt;

use crate::error::{Error, Result};
use crate::geo_core::{Offset, Point3D};

/// Closed boundary loop; first and last coordinate coincide per WKT convention
pub type Ring = Vec<Point3D>;

/// Read a WKT file as one trimmed string
pub fn read_wkt_from_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(content.trim().to_string())
}

/// WKT name of the geometry type
fn geometry_type(geometry: &Wkt<f64>) -> &'static str {
    match geometry {
        Wkt::Point(_) => "Point",
        Wkt::LineString(_) => "LineString",
        Wkt::Polygon(_) => "Polygon",
        Wkt::MultiPoint(_) => "MultiPoint",
        Wkt::MultiLineString(_) => "MultiLineString",
        Wkt::MultiPolygon(_) => "MultiPolygon",
        Wkt::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Parse a WKT polygon into rings of `[x + dx, y + dy, z]`, exterior first.
/// A missing z becomes 0.0.
pub fn wkt_polygon_to_rings(wkt_str: &str, offset: Offset) -> Result<Vec<Ring>> {
    let geometry = Wkt::<f64>::from_str(wkt_str).map_err(|e| Error::WktParse(e.to_string()))?;

    let polygon = match geometry {
        Wkt::Polygon(polygon) => polygon,
        other => {
            return Err(Error::NotAPolygon {
                found: geometry_type(&other).to_string(),
            })
        }
    };

    if polygon.0.is_empty() {
        return Err(Error::EmptyPolygon);
    }

    let rings: Vec<Ring> = polygon
        .0
        .iter()
        .map(|line_string| {
            line_string
                .0
                .iter()
                .map(|c| [c.x + offset.x, c.y + offset.y, c.z.unwrap_or(0.0)])
                .collect()
        })
        .collect();

    debug!(
        "Footprint: exterior of {} coordinates, {} interior ring(s)",
        rings[0].len(),
        rings.len() - 1
    );
    Ok(rings)
}

/// Planar polygon of the footprint rings (z dropped)
pub fn rings_to_polygon(rings: &[Ring]) -> Result<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first().ok_or(Error::EmptyPolygon)?;
    let to_line_string = |ring: &Ring| -> LineString<f64> {
        ring.iter()
            .map(|p| Coord { x: p[0], y: p[1] })
            .collect::<Vec<_>>()
            .into()
    };
    Ok(Polygon::new(
        to_line_string(exterior),
        interiors.iter().map(to_line_string).collect(),
    ))
}
