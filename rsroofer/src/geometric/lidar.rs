use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::collect::global_variables::{BUILDING_CLASSIFICATION, GROUND_CLASSIFICATION};
use crate::error::{Error, Result};
use crate::geo_core::{apply_offset, Offset, PointSet};

#[cfg(feature = "indicatif")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(feature = "indicatif")]
fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {percent} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// Point structure for LiDAR data
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LidarPoint {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    pub(crate) classification: u8,
}

/// Building and ground subsets of one point cloud file
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPoints {
    pub building: PointSet,
    pub ground: PointSet,
    /// Number of points read from the file
    pub total: usize,
    /// Points that were neither building nor ground
    pub discarded: usize,
}

/// LAS/LAZ point cloud loader
/// Splits the points of a file into building and ground subsets by
/// classification code and moves them into the local frame given by `offset`.
#[derive(Debug, Clone)]
pub struct Lidar {
    path: PathBuf,
    offset: Offset,
    building_class: u8,
    ground_class: u8,
}

impl Lidar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Lidar {
            path: path.into(),
            offset: Offset::default(),
            building_class: BUILDING_CLASSIFICATION,
            ground_class: GROUND_CLASSIFICATION,
        }
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    /// Override the classification codes (defaults: 6 building, 2 ground)
    pub fn with_classes(mut self, building: u8, ground: u8) -> Self {
        self.building_class = building;
        self.ground_class = ground;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file and split it by classification
    pub fn load(&self) -> Result<ClassifiedPoints> {
        info!("Reading pointcloud from {:?}", self.path);
        let raw_points = self.read_points()?;
        info!("Read {} points", raw_points.len());

        let mut classified = self.partition(&raw_points);
        apply_offset(&mut classified.building, self.offset);
        apply_offset(&mut classified.ground, self.offset);

        debug!(
            "{} building points (class {}), {} ground points (class {}), {} discarded",
            classified.building.len(),
            self.building_class,
            classified.ground.len(),
            self.ground_class,
            classified.discarded
        );
        Ok(classified)
    }

    /// The reader and its file handle live only inside this call and are
    /// dropped on every return path.
    fn read_points(&self) -> Result<Vec<LidarPoint>> {
        let file = File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let file_len = file
            .metadata()
            .map_err(|e| Error::io(&self.path, e))?
            .len();
        let mut reader = las::Reader::new(BufReader::new(file))?;

        let point_count = reader.header().number_of_points();
        // the header count is untrusted; never reserve more records than the file holds
        let record_len = u64::from(reader.header().point_format().len()).max(1);
        let capacity = point_count.min(file_len / record_len) as usize;

        #[cfg(feature = "indicatif")]
        let parse_pb = if capacity > 100_000 {
            let pb = ProgressBar::new(point_count);
            pb.set_style(progress_style());
            pb.set_message("Parsing points");
            Some(pb)
        } else {
            None
        };

        let mut points = Vec::with_capacity(capacity);
        for point in reader.points() {
            let point = point?;
            points.push(LidarPoint {
                x: point.x,
                y: point.y,
                z: point.z,
                classification: u8::from(point.classification),
            });
            #[cfg(feature = "indicatif")]
            if let Some(ref pb) = parse_pb {
                if points.len() % 10_000 == 0 {
                    pb.set_position(points.len() as u64);
                }
            }
        }

        #[cfg(feature = "indicatif")]
        if let Some(ref pb) = parse_pb {
            pb.finish_and_clear();
        }

        Ok(points)
    }

    fn partition(&self, raw_points: &[LidarPoint]) -> ClassifiedPoints {
        let select = |class: u8| -> PointSet {
            #[cfg(feature = "rayon")]
            let selected = raw_points
                .par_iter()
                .filter(|p| p.classification == class)
                .map(|p| [p.x, p.y, p.z])
                .collect();

            #[cfg(not(feature = "rayon"))]
            let selected = raw_points
                .iter()
                .filter(|p| p.classification == class)
                .map(|p| [p.x, p.y, p.z])
                .collect();

            selected
        };

        let building = select(self.building_class);
        let ground = if self.ground_class == self.building_class {
            building.clone()
        } else {
            select(self.ground_class)
        };
        let kept = if self.ground_class == self.building_class {
            building.len()
        } else {
            building.len() + ground.len()
        };

        ClassifiedPoints {
            total: raw_points.len(),
            discarded: raw_points.len() - kept,
            building,
            ground,
        }
    }
}

/// Read building (class 6) and ground (class 2) points, shifted by `offset`
pub fn read_las_from_file(path: impl AsRef<Path>, offset: Offset) -> Result<ClassifiedPoints> {
    Lidar::new(path.as_ref()).with_offset(offset).load()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use las::point::Classification;

    /// Write a LAS file holding `(x, y, z, class)` points
    pub(crate) fn write_las(path: &Path, points: &[(f64, f64, f64, u8)]) {
        let mut writer = las::Writer::from_path(path, las::Header::default()).unwrap();
        for &(x, y, z, class) in points {
            let point = las::Point {
                x,
                y,
                z,
                classification: Classification::new(class).unwrap(),
                ..Default::default()
            };
            writer.write_point(point).unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn test_partition_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.las");
        write_las(
            &path,
            &[
                (85210.0, 446850.0, 10.0, 6),
                (85211.0, 446851.0, 10.5, 6),
                (85212.0, 446852.0, 11.0, 6),
                (85200.0, 446840.0, 0.5, 2),
                (85201.0, 446841.0, 0.25, 2),
                (85202.0, 446842.0, 3.0, 1),
            ],
        );

        let classified = read_las_from_file(&path, Offset::default()).unwrap();
        assert_eq!(classified.building.len(), 3);
        assert_eq!(classified.ground.len(), 2);
        assert_eq!(classified.total, 6);
        assert_eq!(classified.discarded, 1);
    }

    #[test]
    fn test_offset_applied_to_xy_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.las");
        write_las(&path, &[(85210.5, 446850.25, 10.125, 6)]);

        let classified = read_las_from_file(&path, Offset::new(-85205.0, -446846.0)).unwrap();
        let p = classified.building[0];
        assert!((p[0] - 5.5).abs() < 1e-6);
        assert!((p[1] - 4.25).abs() < 1e-6);
        assert!((p[2] - 10.125).abs() < 1e-6);
        assert!(classified.ground.is_empty());
    }

    #[test]
    fn test_no_matching_class_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unclassified.las");
        write_las(&path, &[(1.0, 2.0, 3.0, 1), (4.0, 5.0, 6.0, 1)]);

        let classified = read_las_from_file(&path, Offset::default()).unwrap();
        assert!(classified.building.is_empty());
        assert!(classified.ground.is_empty());
        assert_eq!(classified.discarded, 2);
    }

    #[test]
    fn test_custom_classes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.las");
        write_las(&path, &[(1.0, 2.0, 3.0, 1), (4.0, 5.0, 6.0, 2)]);

        let classified = Lidar::new(&path).with_classes(1, 2).load().unwrap();
        assert_eq!(classified.building, vec![[1.0, 2.0, 3.0]]);
        assert_eq!(classified.ground, vec![[4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_bogus_header_point_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus_count.las");
        write_las(&path, &[(1.0, 2.0, 3.0, 6)]);

        // legacy number of point records lives at byte 107 of the header
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[107..111].copy_from_slice(&u32::MAX.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        match read_las_from_file(&path, Offset::default()) {
            Ok(classified) => assert_eq!(classified.building.len(), 1),
            Err(e) => assert!(matches!(e, Error::Las(_) | Error::Io { .. })),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = read_las_from_file("/nonexistent/points.las", Offset::default());
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
