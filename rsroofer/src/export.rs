//! Writers for reconstructed buildings: Wavefront OBJ and CityJSON 2.0

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geo_core::Offset;
use crate::geometric::mesh::{Mesh, SurfaceType, TriangulatedMesh};

/// Vertex quantization of the CityJSON output (millimetres)
pub const CITYJSON_SCALE: f64 = 0.001;

/// Render a triangle mesh as OBJ text. Coordinates stay in the local frame.
pub fn to_obj(mesh: &TriangulatedMesh) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# rsroofer: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    for v in &mesh.vertices {
        let _ = writeln!(out, "v {} {} {}", v[0], v[1], v[2]);
    }
    // OBJ indices are 1-based
    for f in &mesh.faces {
        let _ = writeln!(out, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1);
    }
    out
}

pub fn write_obj(path: impl AsRef<Path>, mesh: &TriangulatedMesh) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_obj(mesh)).map_err(|e| Error::io(path, e))?;
    println!("OBJ saved to: {:?}", path);
    Ok(())
}

#[derive(Debug, Serialize)]
struct Transform {
    scale: [f64; 3],
    translate: [f64; 3],
}

#[derive(Debug, Serialize)]
struct SemanticSurface {
    #[serde(rename = "type")]
    surface_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Semantics {
    surfaces: Vec<SemanticSurface>,
    values: Vec<Vec<usize>>,
}

#[derive(Debug, Serialize)]
struct SolidGeometry {
    #[serde(rename = "type")]
    geometry_type: &'static str,
    lod: &'static str,
    /// shells > surfaces > rings > vertex indices
    boundaries: Vec<Vec<Vec<Vec<usize>>>>,
    semantics: Semantics,
}

#[derive(Debug, Serialize)]
struct CityObject {
    #[serde(rename = "type")]
    object_type: &'static str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    geometry: Vec<SolidGeometry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CityJson {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "version")]
    version: &'static str,
    #[serde(rename = "transform")]
    transform: Transform,
    city_objects: BTreeMap<String, CityObject>,
    #[serde(rename = "vertices")]
    vertices: Vec<[i64; 3]>,
}

fn semantic_name(surface_type: SurfaceType) -> &'static str {
    match surface_type {
        SurfaceType::Ground => "GroundSurface",
        SurfaceType::Roof => "RoofSurface",
        SurfaceType::Wall => "WallSurface",
    }
}

/// Shared, quantized vertex list of a CityJSON document
struct VertexPool {
    translate: [f64; 3],
    vertices: Vec<[i64; 3]>,
    lookup: HashMap<[i64; 3], usize>,
}

impl VertexPool {
    fn index(&mut self, p: &[f64; 3]) -> usize {
        let q = [
            ((p[0] - self.translate[0]) / CITYJSON_SCALE).round() as i64,
            ((p[1] - self.translate[1]) / CITYJSON_SCALE).round() as i64,
            ((p[2] - self.translate[2]) / CITYJSON_SCALE).round() as i64,
        ];
        let vertices = &mut self.vertices;
        *self.lookup.entry(q).or_insert_with(|| {
            vertices.push(q);
            vertices.len() - 1
        })
    }
}

fn solid(
    mesh: &Mesh,
    pool: &mut VertexPool,
    world: &impl Fn(&[f64; 3]) -> [f64; 3],
) -> SolidGeometry {
    let mut surface_types: Vec<SurfaceType> = Vec::new();
    let mut values: Vec<usize> = Vec::with_capacity(mesh.surfaces.len());
    let mut shell: Vec<Vec<Vec<usize>>> = Vec::with_capacity(mesh.surfaces.len());

    for surface in &mesh.surfaces {
        let semantic_idx = match surface_types.iter().position(|t| *t == surface.surface_type) {
            Some(idx) => idx,
            None => {
                surface_types.push(surface.surface_type);
                surface_types.len() - 1
            }
        };
        values.push(semantic_idx);
        shell.push(
            surface
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| pool.index(&world(p))).collect())
                .collect(),
        );
    }

    SolidGeometry {
        geometry_type: "Solid",
        lod: "1.2",
        boundaries: vec![shell],
        semantics: Semantics {
            surfaces: surface_types
                .into_iter()
                .map(|t| SemanticSurface {
                    surface_type: semantic_name(t),
                })
                .collect(),
            values: vec![values],
        },
    }
}

fn elevation_attributes(mesh: &Mesh) -> Map<String, Value> {
    let mut attributes = Map::new();
    attributes.insert("floor_elevation".to_string(), Value::from(mesh.floor_elevation));
    attributes.insert("roof_elevation".to_string(), Value::from(mesh.roof_elevation));
    attributes.insert(
        "height".to_string(),
        Value::from(mesh.roof_elevation - mesh.floor_elevation),
    );
    attributes
}

/// Build a CityJSON document for one building. `offset` is the local frame
/// the meshes were reconstructed in; output coordinates are back in the world
/// frame. Several meshes become `BuildingPart` children of the building.
pub fn to_cityjson(id: &str, meshes: &[Mesh], offset: Offset) -> Result<Value> {
    if meshes.is_empty() {
        return Err(Error::Reconstruction("no meshes to export".to_string()));
    }

    let origin = offset.negated();
    let mut pool = VertexPool {
        translate: [origin.x, origin.y, 0.0],
        vertices: Vec::new(),
        lookup: HashMap::new(),
    };
    let world = |p: &[f64; 3]| [p[0] - offset.x, p[1] - offset.y, p[2]];

    let mut city_objects = BTreeMap::new();
    if let [mesh] = meshes {
        city_objects.insert(
            id.to_string(),
            CityObject {
                object_type: "Building",
                attributes: elevation_attributes(mesh),
                geometry: vec![solid(mesh, &mut pool, &world)],
                children: Vec::new(),
                parents: Vec::new(),
            },
        );
    } else {
        let mut children = Vec::with_capacity(meshes.len());
        for (i, mesh) in meshes.iter().enumerate() {
            let child_id = format!("{}-{}", id, i);
            city_objects.insert(
                child_id.clone(),
                CityObject {
                    object_type: "BuildingPart",
                    attributes: elevation_attributes(mesh),
                    geometry: vec![solid(mesh, &mut pool, &world)],
                    children: Vec::new(),
                    parents: vec![id.to_string()],
                },
            );
            children.push(child_id);
        }
        city_objects.insert(
            id.to_string(),
            CityObject {
                object_type: "Building",
                attributes: Map::new(),
                geometry: Vec::new(),
                children,
                parents: Vec::new(),
            },
        );
    }

    let document = CityJson {
        kind: "CityJSON",
        version: "2.0",
        transform: Transform {
            scale: [CITYJSON_SCALE; 3],
            translate: pool.translate,
        },
        city_objects,
        vertices: pool.vertices,
    };
    Ok(serde_json::to_value(document)?)
}

pub fn write_cityjson(
    path: impl AsRef<Path>,
    id: &str,
    meshes: &[Mesh],
    offset: Offset,
) -> Result<()> {
    let path = path.as_ref();
    let document = to_cityjson(id, meshes, offset)?;
    let cityjson_str = serde_json::to_string(&document)?;
    std::fs::write(path, cityjson_str).map_err(|e| Error::io(path, e))?;
    println!("CityJSON saved to: {:?}", path);
    Ok(())
}
