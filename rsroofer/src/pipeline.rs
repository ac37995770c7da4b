use log::info;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::geo_core::Offset;
use crate::geometric::building::{ReconstructionConfig, Reconstructor};
use crate::geometric::footprint::{read_wkt_from_file, wkt_polygon_to_rings, Ring};
use crate::geometric::lidar::{ClassifiedPoints, Lidar};
use crate::geometric::mesh::{triangulate_mesh, Mesh, TriangulatedMesh};

/// One building reconstruction: point cloud + footprint in, meshes out.
/// Steps run strictly in order and the first failure aborts the job.
#[derive(Debug, Clone)]
pub struct ReconstructionJob {
    pub point_cloud: PathBuf,
    pub footprint: PathBuf,
    pub offset: Offset,
    pub config: ReconstructionConfig,
}

/// Everything a job produced, in the job's local frame
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub points: ClassifiedPoints,
    pub footprint: Vec<Ring>,
    pub meshes: Vec<Mesh>,
    /// Triangulation of the first mesh
    pub triangulated: TriangulatedMesh,
}

impl ReconstructionJob {
    pub fn new(point_cloud: impl Into<PathBuf>, footprint: impl Into<PathBuf>) -> Self {
        ReconstructionJob {
            point_cloud: point_cloud.into(),
            footprint: footprint.into(),
            offset: Offset::default(),
            config: ReconstructionConfig::default(),
        }
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_config(mut self, config: ReconstructionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn run(&self, reconstructor: &dyn Reconstructor) -> Result<JobOutput> {
        println!("Reading .LAZ...");
        let points = Lidar::new(&self.point_cloud)
            .with_offset(self.offset)
            .load()?;
        info!(
            "{} building points, {} ground points",
            points.building.len(),
            points.ground.len()
        );

        println!("Reading the WKT polygon...");
        let footprint_str = read_wkt_from_file(&self.footprint)?;
        let footprint = wkt_polygon_to_rings(&footprint_str, self.offset)?;

        println!("Reconstructing building...");
        let meshes = reconstructor.reconstruct(
            &points.building,
            &points.ground,
            &footprint,
            &self.config,
        )?;
        let first = meshes
            .first()
            .ok_or_else(|| Error::Reconstruction("no mesh was produced".to_string()))?;

        println!("Triangulating mesh...");
        let triangulated = triangulate_mesh(first)?;
        info!(
            "Triangulated mesh: {} vertices, {} faces",
            triangulated.vertex_count(),
            triangulated.face_count()
        );

        Ok(JobOutput {
            points,
            footprint,
            meshes,
            triangulated,
        })
    }
}
