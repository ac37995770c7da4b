use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 3D coordinate (x, y, z)
pub type Point3D = [f64; 3];

/// Ordered sequence of points, e.g. the building or ground subset of a LAS file
pub type PointSet = Vec<Point3D>;

/// Planar translation shared by every coordinate loaded in a session.
/// Point and polygon data must use the same offset to stay in one local frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Offset { x, y }
    }

    /// Offset that undoes this one
    pub fn negated(&self) -> Self {
        Offset::new(-self.x, -self.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Offset moving the minimum corner of `bbox` to the origin
    pub fn to_local_origin(bbox: &BoundingBox) -> Self {
        Offset::new(-bbox.min_x, -bbox.min_y)
    }
}

/// Add `offset` to the x and y of every point, in place.
pub fn apply_offset(points: &mut [Point3D], offset: Offset) -> &mut [Point3D] {
    for point in points.iter_mut() {
        point[0] += offset.x;
        point[1] += offset.y;
    }
    points
}

/// Same as [`apply_offset`] for untyped rows (e.g. lists coming from Python).
/// Rows with fewer than two coordinates are rejected before anything is mutated.
pub fn apply_offset_rows(rows: &mut [Vec<f64>], offset: Offset) -> Result<&mut [Vec<f64>]> {
    if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() < 2) {
        return Err(Error::MalformedPoint {
            index,
            dims: row.len(),
        });
    }
    for row in rows.iter_mut() {
        row[0] += offset.x;
        row[1] += offset.y;
    }
    Ok(rows)
}

/// Bounding box structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Planar extent of a set of points, `None` when empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        points.into_iter().fold(None, |bbox, p| {
            Some(match bbox {
                None => BoundingBox::new(p[0], p[1], p[0], p[1]),
                Some(b) => BoundingBox::new(
                    b.min_x.min(p[0]),
                    b.min_y.min(p[1]),
                    b.max_x.max(p[0]),
                    b.max_y.max(p[1]),
                ),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointSet {
        vec![
            [85210.25, 446850.5, 1.25],
            [85215.0, 446861.75, 7.5],
            [85201.125, 446849.0, -0.5],
        ]
    }

    #[test]
    fn test_zero_offset_is_identity() {
        let mut points = sample();
        apply_offset(&mut points, Offset::default());
        assert_eq!(points, sample());
    }

    #[test]
    fn test_offset_round_trip() {
        let offset = Offset::new(-85205.20, -446846.0);
        let mut points = sample();
        apply_offset(&mut points, offset);
        assert!((points[0][0] - 5.05).abs() < 1e-9);
        assert_eq!(points[1][2], 7.5);

        apply_offset(&mut points, offset.negated());
        for (p, q) in points.iter().zip(sample().iter()) {
            assert!((p[0] - q[0]).abs() < 1e-9);
            assert!((p[1] - q[1]).abs() < 1e-9);
            assert_eq!(p[2], q[2]);
        }
    }

    #[test]
    fn test_offset_rows_rejects_short_rows() {
        let mut rows = vec![vec![1.0, 2.0, 3.0], vec![4.0]];
        match apply_offset_rows(&mut rows, Offset::new(10.0, 10.0)) {
            Err(Error::MalformedPoint { index, dims }) => {
                assert_eq!(index, 1);
                assert_eq!(dims, 1);
            }
            other => panic!("expected MalformedPoint, got {:?}", other),
        }
        // nothing was touched
        assert_eq!(rows[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_offset_rows_2d() {
        let mut rows = vec![vec![1.0, 2.0], vec![3.0, 4.0, 5.0]];
        apply_offset_rows(&mut rows, Offset::new(1.0, -1.0)).unwrap();
        assert_eq!(rows, vec![vec![2.0, 1.0], vec![4.0, 3.0, 5.0]]);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::from_points(&sample()).unwrap();
        assert_eq!(bbox.min_x, 85201.125);
        assert_eq!(bbox.max_y, 446861.75);
        assert!(BoundingBox::from_points(&Vec::<Point3D>::new()).is_none());

        let offset = Offset::to_local_origin(&bbox);
        assert_eq!(offset, Offset::new(-85201.125, -446849.0));
    }
}
