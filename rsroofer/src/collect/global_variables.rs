/// ASPRS classification code for building points
pub const BUILDING_CLASSIFICATION: u8 = 6;
/// ASPRS classification code for ground points
pub const GROUND_CLASSIFICATION: u8 = 2;

// Demo inputs: one building of the Wippolder district (Delft), RD New coordinates
pub const DEFAULT_POINT_CLOUD: &str =
    "data/wippolder/objects/503100000030812/crop/503100000030812_pointcloud.las";
pub const DEFAULT_FOOTPRINT: &str = "data/wippolder/wippolder.txt";
pub const DEFAULT_X_OFFSET: f64 = -85205.20;
pub const DEFAULT_Y_OFFSET: f64 = -446846.0;
pub const DEFAULT_COMPLEXITY_FACTOR: f64 = 0.7;
