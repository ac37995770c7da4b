//! Integration tests for rsroofer
//!
//! These tests write a small classified LAS file and a WKT footprint to disk
//! and run the whole flow through the public API.

use approx::assert_relative_eq;
use las::point::Classification;
use std::path::Path;

use rsroofer::export::{write_cityjson, write_obj};
use rsroofer::pipeline::ReconstructionJob;
use rsroofer::{
    read_las_from_file, read_wkt_from_file, reconstruct, triangulate_mesh, wkt_polygon_to_rings,
    Error, Lod12Reconstructor, Offset, ReconstructionConfig, SurfaceType,
};

const X0: f64 = 85205.20;
const Y0: f64 = 446846.0;

/// L-shaped building with a courtyard-free footprint, 12 m roof on 1 m ground
fn write_fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let las_path = dir.join("503100000030812_pointcloud.las");
    let mut writer = las::Writer::from_path(&las_path, las::Header::default()).unwrap();
    let mut push = |x: f64, y: f64, z: f64, class: u8| {
        writer
            .write_point(las::Point {
                x: X0 + x,
                y: Y0 + y,
                z,
                classification: Classification::new(class).unwrap(),
                ..Default::default()
            })
            .unwrap();
    };
    for i in 0..8 {
        for j in 0..8 {
            let (x, y) = (0.5 + i as f64, 0.5 + j as f64);
            // the upper right quadrant is outside the L
            if x > 4.0 && y > 4.0 {
                continue;
            }
            push(x, y, 13.0, 6);
        }
    }
    for i in 0..10 {
        push(-2.0 + i as f64, -2.0, 1.0, 2);
    }
    push(3.0, 3.0, 20.0, 1);
    writer.close().unwrap();

    let wkt_path = dir.join("footprint.txt");
    let wkt = format!(
        "POLYGON (({x0} {y0}, {x1} {y0}, {x1} {ym}, {xm} {ym}, {xm} {y1}, {x0} {y1}, {x0} {y0}))",
        x0 = X0,
        y0 = Y0,
        x1 = X0 + 8.0,
        y1 = Y0 + 8.0,
        xm = X0 + 4.0,
        ym = Y0 + 4.0,
    );
    std::fs::write(&wkt_path, wkt).unwrap();
    (las_path, wkt_path)
}

#[test]
fn test_step_by_step_flow() {
    let dir = tempfile::tempdir().unwrap();
    let (las_path, wkt_path) = write_fixture(dir.path());
    let offset = Offset::new(-X0, -Y0);

    let points = read_las_from_file(&las_path, offset).unwrap();
    assert_eq!(points.building.len(), 48);
    assert_eq!(points.ground.len(), 10);
    assert_eq!(points.discarded, 1);
    assert!(points
        .building
        .iter()
        .all(|p| p[0] > 0.0 && p[0] < 8.0 && p[1] > 0.0 && p[1] < 8.0));

    let footprint = wkt_polygon_to_rings(&read_wkt_from_file(&wkt_path).unwrap(), offset).unwrap();
    assert_eq!(footprint.len(), 1);
    assert_eq!(footprint[0].len(), 7);

    let config = ReconstructionConfig {
        complexity_factor: 0.7,
        ..Default::default()
    };
    let meshes = reconstruct(&points.building, &points.ground, &footprint, &config).unwrap();
    let mesh = &meshes[0];
    assert_relative_eq!(mesh.floor_elevation, 1.0, epsilon = 1e-6);
    assert_relative_eq!(mesh.roof_elevation, 13.0, epsilon = 1e-6);
    assert_eq!(mesh.surface_count(SurfaceType::Wall), 6);

    let triangulated = triangulate_mesh(mesh).unwrap();
    // 6 footprint corners at two heights
    assert_eq!(triangulated.vertex_count(), 12);
    // L-hexagon: 4 triangles for ground and roof each, 2 per wall
    assert_eq!(triangulated.face_count(), 4 + 4 + 12);
    assert_eq!(triangulated.labels.len(), triangulated.face_count());
}

#[test]
fn test_job_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let (las_path, wkt_path) = write_fixture(dir.path());
    let offset = Offset::new(-X0, -Y0);

    let output = ReconstructionJob::new(&las_path, &wkt_path)
        .with_offset(offset)
        .run(&Lod12Reconstructor)
        .unwrap();
    assert_eq!(output.meshes.len(), 1);

    let obj_path = dir.path().join("building.obj");
    write_obj(&obj_path, &output.triangulated).unwrap();
    let obj = std::fs::read_to_string(&obj_path).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 20);

    let cityjson_path = dir.path().join("building.city.json");
    write_cityjson(&cityjson_path, "NL.IMBAG.Pand.0503100000030812", &output.meshes, offset)
        .unwrap();
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cityjson_path).unwrap()).unwrap();
    let translate = &doc["transform"]["translate"];
    assert_relative_eq!(translate[0].as_f64().unwrap(), X0, epsilon = 1e-9);
    assert_relative_eq!(translate[1].as_f64().unwrap(), Y0, epsilon = 1e-9);
    assert_eq!(doc["vertices"].as_array().unwrap().len(), 12);
}

#[test]
fn test_non_polygon_footprint_aborts_job() {
    let dir = tempfile::tempdir().unwrap();
    let (las_path, wkt_path) = write_fixture(dir.path());
    std::fs::write(&wkt_path, "LINESTRING (0 0, 10 10)").unwrap();

    let err = ReconstructionJob::new(&las_path, &wkt_path)
        .run(&Lod12Reconstructor)
        .unwrap_err();
    match err {
        Error::NotAPolygon { found } => assert_eq!(found, "LineString"),
        other => panic!("unexpected error {:?}", other),
    }
}
