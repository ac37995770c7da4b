use anyhow::{Context, Result};
use rsroofer::collect::global_variables::{
    DEFAULT_COMPLEXITY_FACTOR, DEFAULT_FOOTPRINT, DEFAULT_POINT_CLOUD, DEFAULT_X_OFFSET,
    DEFAULT_Y_OFFSET,
};
use rsroofer::{
    read_las_from_file, read_wkt_from_file, reconstruct, triangulate_mesh, wkt_polygon_to_rings,
    Offset, ReconstructionConfig,
};

/// Example: reconstructing one building of the Wippolder district
/// Expects the demo data under ./data/wippolder
fn main() -> Result<()> {
    // Offsets keep the RD New coordinates small
    let offset = Offset::new(DEFAULT_X_OFFSET, DEFAULT_Y_OFFSET);

    println!("Reading .LAZ...");
    let points = read_las_from_file(DEFAULT_POINT_CLOUD, offset)?;

    println!("Reading the WKT polygon...");
    let footprint_str = read_wkt_from_file(DEFAULT_FOOTPRINT)?;
    let footprint = wkt_polygon_to_rings(&footprint_str, offset)?;

    let config = ReconstructionConfig {
        complexity_factor: DEFAULT_COMPLEXITY_FACTOR,
        ..Default::default()
    };

    println!("Reconstructing building...");
    let meshes = reconstruct(&points.building, &points.ground, &footprint, &config)?;

    println!("Triangulating mesh...");
    let mesh = meshes.first().context("Reconstruction returned no mesh")?;
    let triangulated = triangulate_mesh(mesh)?;

    println!(
        "  - {} vertices, {} faces",
        triangulated.vertex_count(),
        triangulated.face_count()
    );
    println!(
        "  - roof at {:.2} m, floor at {:.2} m",
        mesh.roof_elevation, mesh.floor_elevation
    );

    // For a viewer, write the mesh out:
    // rsroofer::export::write_obj("wippolder.obj", &triangulated)?;

    Ok(())
}
