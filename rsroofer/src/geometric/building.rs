use geo::orient::{Direction, Orient};
use geo::{Area, Intersects, Line, LineString, Point, Polygon, Simplify};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::commons::basic_functions::percentile;
use crate::error::{Error, Result};
use crate::geo_core::Point3D;
use crate::geometric::footprint::{rings_to_polygon, Ring};
use crate::geometric::mesh::{Mesh, Surface, SurfaceType};

/// Parameters of building reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Level of detail kept from the footprint, in [0, 1]. 1 keeps every
    /// vertex, lower values simplify the outline more aggressively.
    pub complexity_factor: f64,
    /// Simplification tolerance in metres at complexity 0
    pub simplify_tolerance: f64,
    /// Percentile of building point heights used as roof elevation
    pub roof_percentile: f64,
    /// Percentile of ground point heights used as floor elevation
    pub ground_percentile: f64,
    /// Fixed floor elevation, overrides the ground points
    pub floor_elevation: Option<f64>,
    /// Only use building points that fall inside the footprint
    pub clip_to_footprint: bool,
    /// Minimum number of roof points needed to reconstruct
    pub min_roof_points: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        ReconstructionConfig {
            complexity_factor: 0.888,
            simplify_tolerance: 0.5,
            roof_percentile: 0.7,
            ground_percentile: 0.05,
            floor_elevation: None,
            clip_to_footprint: true,
            min_roof_points: 3,
        }
    }
}

impl ReconstructionConfig {
    /// Load a configuration from a JSON file; missing fields take their default
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: ReconstructionConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| -> Result<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
            Ok(())
        };
        unit("complexity_factor", self.complexity_factor)?;
        unit("roof_percentile", self.roof_percentile)?;
        unit("ground_percentile", self.ground_percentile)?;

        if !(self.simplify_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "simplify_tolerance must be >= 0, got {}",
                self.simplify_tolerance
            )));
        }
        if let Some(floor) = self.floor_elevation {
            if !floor.is_finite() {
                return Err(Error::InvalidConfig(
                    "floor_elevation must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Turns classified points and a footprint into building meshes
pub trait Reconstructor {
    fn reconstruct(
        &self,
        building: &[Point3D],
        ground: &[Point3D],
        footprint: &[Ring],
        config: &ReconstructionConfig,
    ) -> Result<Vec<Mesh>>;
}

/// Flat-roof block model (LoD 1.2): the footprint extruded from the ground
/// elevation to a percentile of the roof point heights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lod12Reconstructor;

impl Reconstructor for Lod12Reconstructor {
    fn reconstruct(
        &self,
        building: &[Point3D],
        ground: &[Point3D],
        footprint: &[Ring],
        config: &ReconstructionConfig,
    ) -> Result<Vec<Mesh>> {
        config.validate()?;

        let polygon = rings_to_polygon(footprint)?;
        if polygon.exterior().0.len() < 4 || polygon.unsigned_area() <= 0.0 {
            return Err(Error::Reconstruction(
                "footprint exterior has no area".to_string(),
            ));
        }

        let mut roof_heights: Vec<f64> = building
            .iter()
            .filter(|p| !config.clip_to_footprint || polygon.intersects(&Point::new(p[0], p[1])))
            .map(|p| p[2])
            .collect();
        debug!(
            "{} of {} building points used for the roof",
            roof_heights.len(),
            building.len()
        );
        if roof_heights.len() < config.min_roof_points {
            return Err(Error::Reconstruction(format!(
                "{} roof point(s) found, at least {} required",
                roof_heights.len(),
                config.min_roof_points
            )));
        }

        let floor_elevation = match config.floor_elevation {
            Some(floor) => floor,
            None => {
                let mut ground_heights: Vec<f64> = ground.iter().map(|p| p[2]).collect();
                match percentile(&mut ground_heights, config.ground_percentile) {
                    Some(floor) => floor,
                    None => {
                        warn!("No ground points, using the lowest roof point as floor elevation");
                        roof_heights.iter().copied().fold(f64::INFINITY, f64::min)
                    }
                }
            }
        };
        let roof_elevation = percentile(&mut roof_heights, config.roof_percentile)
            .ok_or_else(|| Error::Reconstruction("no roof points".to_string()))?;

        if roof_elevation <= floor_elevation {
            return Err(Error::Reconstruction(format!(
                "roof elevation {:.3} is not above floor elevation {:.3}",
                roof_elevation, floor_elevation
            )));
        }
        debug!(
            "Floor elevation {:.3}, roof elevation {:.3}",
            floor_elevation, roof_elevation
        );

        let outline = simplify_footprint(&polygon, config).orient(Direction::Default);
        Ok(vec![extrude(&outline, floor_elevation, roof_elevation)])
    }
}

/// Reconstruct with [`Lod12Reconstructor`]
pub fn reconstruct(
    building: &[Point3D],
    ground: &[Point3D],
    footprint: &[Ring],
    config: &ReconstructionConfig,
) -> Result<Vec<Mesh>> {
    Lod12Reconstructor.reconstruct(building, ground, footprint, config)
}

fn is_usable_ring(ring: &LineString<f64>) -> bool {
    ring.0.len() >= 4 && Polygon::new(ring.clone(), vec![]).unsigned_area() > 0.0
}

/// Whether two non-adjacent edges of a closed ring touch
fn crosses_itself(ring: &LineString<f64>) -> bool {
    let edges: Vec<Line<f64>> = ring.lines().collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return true;
            }
        }
    }
    false
}

fn rings_touch(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    a.lines().any(|ea| b.lines().any(|eb| ea.intersects(&eb)))
}

/// Simple rings, pairwise disjoint, every hole inside the exterior
fn is_valid_outline(polygon: &Polygon<f64>) -> bool {
    let exterior = polygon.exterior();
    let shell = Polygon::new(exterior.clone(), vec![]);
    let rings: Vec<&LineString<f64>> = std::iter::once(exterior)
        .chain(polygon.interiors().iter())
        .collect();

    if rings.iter().any(|ring| crosses_itself(ring)) {
        return false;
    }
    for (i, a) in rings.iter().enumerate() {
        for b in &rings[i + 1..] {
            if rings_touch(a, b) {
                return false;
            }
        }
    }
    polygon
        .interiors()
        .iter()
        .all(|hole| hole.0.first().map_or(false, |c| shell.intersects(&Point::from(*c))))
}

/// Douglas-Peucker simplification scaled by `1 - complexity_factor`.
/// A collapsed exterior falls back to the input; collapsed holes are dropped.
/// Douglas-Peucker does not preserve topology, so an outline whose rings
/// cross after simplification also falls back to the input.
fn simplify_footprint(polygon: &Polygon<f64>, config: &ReconstructionConfig) -> Polygon<f64> {
    let epsilon = (1.0 - config.complexity_factor) * config.simplify_tolerance;
    if epsilon <= 0.0 {
        return polygon.clone();
    }

    let exterior = polygon.exterior().simplify(&epsilon);
    if !is_usable_ring(&exterior) {
        debug!("Simplified footprint degenerates, keeping the original");
        return polygon.clone();
    }
    let interiors: Vec<LineString<f64>> = polygon
        .interiors()
        .iter()
        .map(|ring| ring.simplify(&epsilon))
        .filter(is_usable_ring)
        .collect();

    let simplified = Polygon::new(exterior, interiors);
    if !is_valid_outline(&simplified) {
        debug!("Simplified footprint is not simple, keeping the original");
        return polygon.clone();
    }

    debug!(
        "Footprint simplified from {} to {} exterior vertices (epsilon {:.3})",
        polygon.exterior().0.len(),
        simplified.exterior().0.len(),
        epsilon
    );
    simplified
}

/// Open ring of a closed line string, consecutive duplicates removed
fn open_ring(ring: &LineString<f64>) -> Vec<(f64, f64)> {
    let mut coords: Vec<(f64, f64)> = ring.0.iter().map(|c| (c.x, c.y)).collect();
    coords.dedup();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

/// Prism between `floor` and `roof`. Expects exterior CCW and holes CW so that
/// every surface faces outward.
fn extrude(polygon: &Polygon<f64>, floor: f64, roof: f64) -> Mesh {
    let rings: Vec<Vec<(f64, f64)>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(open_ring)
        .collect();

    let at = |ring: &[(f64, f64)], z: f64| -> Vec<Point3D> {
        ring.iter().map(|&(x, y)| [x, y, z]).collect()
    };

    let mut surfaces = Vec::new();

    surfaces.push(Surface {
        surface_type: SurfaceType::Ground,
        rings: rings
            .iter()
            .map(|ring| {
                let mut reversed = at(ring, floor);
                reversed.reverse();
                reversed
            })
            .collect(),
    });

    surfaces.push(Surface {
        surface_type: SurfaceType::Roof,
        rings: rings.iter().map(|ring| at(ring, roof)).collect(),
    });

    for ring in &rings {
        for (i, &(ax, ay)) in ring.iter().enumerate() {
            let (bx, by) = ring[(i + 1) % ring.len()];
            surfaces.push(Surface {
                surface_type: SurfaceType::Wall,
                rings: vec![vec![
                    [ax, ay, floor],
                    [bx, by, floor],
                    [bx, by, roof],
                    [ax, ay, roof],
                ]],
            });
        }
    }

    Mesh {
        surfaces,
        floor_elevation: floor,
        roof_elevation: roof,
    }
}
