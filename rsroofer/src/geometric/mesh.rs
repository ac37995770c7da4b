//! Polygonal building meshes and their triangulation

use geo::{Coord, LineString, Polygon, TriangulateEarcut};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geo_core::Point3D;

/// Semantic class of a mesh surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    Ground,
    Roof,
    Wall,
}

/// Planar polygon of a mesh. Rings are open (no repeated closing vertex);
/// the first ring is the outer boundary, the exterior winding gives the
/// outward normal by the right-hand rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub surface_type: SurfaceType,
    pub rings: Vec<Vec<Point3D>>,
}

/// Reconstructed building as a set of planar surfaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub surfaces: Vec<Surface>,
    /// Elevation of the ground surface
    pub floor_elevation: f64,
    /// Elevation of the (flat) roof surface
    pub roof_elevation: f64,
}

impl Mesh {
    pub fn surface_count(&self, surface_type: SurfaceType) -> usize {
        self.surfaces
            .iter()
            .filter(|s| s.surface_type == surface_type)
            .count()
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangulatedMesh {
    pub vertices: Vec<Point3D>,
    pub faces: Vec<[usize; 3]>,
    /// Surface type of each face
    pub labels: Vec<SurfaceType>,
}

impl TriangulatedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn vertex_index(&mut self, lookup: &mut HashMap<[u64; 3], usize>, p: Point3D) -> usize {
        let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
        *lookup.entry(key).or_insert_with(|| {
            self.vertices.push(p);
            self.vertices.len() - 1
        })
    }
}

fn sub(a: Point3D, b: Point3D) -> Point3D {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: Point3D, b: Point3D) -> Point3D {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: Point3D, b: Point3D) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Newell normal of a ring (not normalized)
fn newell_normal(ring: &[Point3D]) -> Point3D {
    let mut n = [0.0; 3];
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        n[0] += (a[1] - b[1]) * (a[2] + b[2]);
        n[1] += (a[2] - b[2]) * (a[0] + b[0]);
        n[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    n
}

/// Drop the coordinate axis the normal is most aligned with
fn project(p: &Point3D, axis: usize) -> Coord<f64> {
    match axis {
        0 => Coord { x: p[1], y: p[2] },
        1 => Coord { x: p[2], y: p[0] },
        _ => Coord { x: p[0], y: p[1] },
    }
}

fn coord_key(c: &Coord<f64>) -> (u64, u64) {
    (c.x.to_bits(), c.y.to_bits())
}

/// Triangulate every surface of `mesh` into one indexed triangle mesh.
/// Vertices with identical coordinates are shared between surfaces.
pub fn triangulate_mesh(mesh: &Mesh) -> Result<TriangulatedMesh> {
    let mut out = TriangulatedMesh::default();
    let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();

    for (surface_idx, surface) in mesh.surfaces.iter().enumerate() {
        let exterior = surface
            .rings
            .first()
            .filter(|ring| ring.len() >= 3)
            .ok_or_else(|| {
                Error::Triangulation(format!("surface {} has fewer than 3 vertices", surface_idx))
            })?;

        let normal = newell_normal(exterior);
        if dot(normal, normal) <= f64::EPSILON {
            return Err(Error::Triangulation(format!(
                "surface {} is degenerate",
                surface_idx
            )));
        }

        // Fast path for plain triangles
        if surface.rings.len() == 1 && exterior.len() == 3 {
            let face = [
                out.vertex_index(&mut lookup, exterior[0]),
                out.vertex_index(&mut lookup, exterior[1]),
                out.vertex_index(&mut lookup, exterior[2]),
            ];
            out.faces.push(face);
            out.labels.push(surface.surface_type);
            continue;
        }

        let axis = (0..3)
            .max_by(|&a, &b| normal[a].abs().total_cmp(&normal[b].abs()))
            .unwrap_or(2);

        let mut by_projection: HashMap<(u64, u64), Point3D> = HashMap::new();
        let mut rings_2d: Vec<LineString<f64>> = Vec::with_capacity(surface.rings.len());
        for ring in &surface.rings {
            let coords: Vec<Coord<f64>> = ring
                .iter()
                .map(|p| {
                    let c = project(p, axis);
                    by_projection.insert(coord_key(&c), *p);
                    c
                })
                .collect();
            rings_2d.push(LineString::from(coords));
        }
        let exterior_2d = rings_2d.remove(0);
        let polygon = Polygon::new(exterior_2d, rings_2d);

        for triangle in polygon.earcut_triangles() {
            let mut corners = [[0.0; 3]; 3];
            for (corner, c) in corners.iter_mut().zip(triangle.to_array().iter()) {
                *corner = *by_projection.get(&coord_key(c)).ok_or_else(|| {
                    Error::Triangulation(format!(
                        "surface {}: triangle corner ({}, {}) not on any ring",
                        surface_idx, c.x, c.y
                    ))
                })?;
            }

            let tri_normal = cross(sub(corners[1], corners[0]), sub(corners[2], corners[0]));
            if dot(tri_normal, normal) < 0.0 {
                corners.swap(1, 2);
            }

            let face = [
                out.vertex_index(&mut lookup, corners[0]),
                out.vertex_index(&mut lookup, corners[1]),
                out.vertex_index(&mut lookup, corners[2]),
            ];
            out.faces.push(face);
            out.labels.push(surface.surface_type);
        }
    }

    Ok(out)
}
