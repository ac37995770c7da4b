pub mod building;
pub mod footprint;
pub mod lidar;
pub mod mesh;
