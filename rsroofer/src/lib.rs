pub mod collect;
pub mod commons;
pub mod error;
pub mod export;
pub mod geo_core;
pub mod geometric;
pub mod pipeline;

pub use error::{Error, Result};
pub use geo_core::{apply_offset, apply_offset_rows, Offset, Point3D, PointSet};
pub use geometric::building::{reconstruct, Lod12Reconstructor, ReconstructionConfig, Reconstructor};
pub use geometric::footprint::{read_wkt_from_file, wkt_polygon_to_rings, Ring};
pub use geometric::lidar::{read_las_from_file, ClassifiedPoints, Lidar};
pub use geometric::mesh::{triangulate_mesh, Mesh, Surface, SurfaceType, TriangulatedMesh};
