use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::path::PathBuf;

use rsroofer::collect::global_variables::{
    DEFAULT_COMPLEXITY_FACTOR, DEFAULT_FOOTPRINT, DEFAULT_POINT_CLOUD, DEFAULT_X_OFFSET,
    DEFAULT_Y_OFFSET,
};
use rsroofer::export::{write_cityjson, write_obj};
use rsroofer::geo_core::BoundingBox;
use rsroofer::pipeline::ReconstructionJob;
use rsroofer::{
    read_wkt_from_file, wkt_polygon_to_rings, Lod12Reconstructor, Offset, ReconstructionConfig,
};

/// Reconstruct a LoD 1.2 building from a classified point cloud and a WKT footprint
#[derive(Parser, Debug)]
#[command(name = "rsroofer", version, about)]
struct Cli {
    /// LAS/LAZ point cloud (class 6 = building, class 2 = ground)
    #[arg(default_value = DEFAULT_POINT_CLOUD)]
    point_cloud: PathBuf,

    /// Text file holding one WKT polygon
    #[arg(default_value = DEFAULT_FOOTPRINT)]
    footprint: PathBuf,

    /// Added to every x coordinate
    #[arg(long, default_value_t = DEFAULT_X_OFFSET, allow_hyphen_values = true)]
    x_offset: f64,

    /// Added to every y coordinate
    #[arg(long, default_value_t = DEFAULT_Y_OFFSET, allow_hyphen_values = true)]
    y_offset: f64,

    /// Move the footprint's minimum corner to the origin instead of using --x-offset/--y-offset
    #[arg(long)]
    auto_offset: bool,

    /// Reconstruction configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configuration's complexity factor (0.7 when no configuration is given)
    #[arg(long)]
    complexity_factor: Option<f64>,

    /// Write the triangulated mesh as OBJ (local coordinates)
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Write the building as CityJSON (world coordinates)
    #[arg(long)]
    cityjson: Option<PathBuf>,

    /// CityJSON object id
    #[arg(long, default_value = "building")]
    id: String,

    /// Be more verbose (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Configuration file if given, else the demo defaults; `--complexity-factor` wins
fn load_config(cli: &Cli) -> Result<ReconstructionConfig> {
    let mut config = match &cli.config {
        Some(path) => ReconstructionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => ReconstructionConfig {
            complexity_factor: DEFAULT_COMPLEXITY_FACTOR,
            ..Default::default()
        },
    };
    if let Some(complexity_factor) = cli.complexity_factor {
        config.complexity_factor = complexity_factor;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_offset(cli: &Cli) -> Result<Offset> {
    if !cli.auto_offset {
        return Ok(Offset::new(cli.x_offset, cli.y_offset));
    }
    let wkt = read_wkt_from_file(&cli.footprint)
        .with_context(|| format!("Failed to read footprint {:?}", cli.footprint))?;
    let rings = wkt_polygon_to_rings(&wkt, Offset::default())?;
    let bbox =
        BoundingBox::from_points(rings.iter().flatten()).context("Footprint has no coordinates")?;
    Ok(Offset::to_local_origin(&bbox))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let config = load_config(&cli)?;
    debug!("{:?}", config);

    let offset = resolve_offset(&cli)?;
    info!("Using offset ({}, {})", offset.x, offset.y);

    let job = ReconstructionJob::new(&cli.point_cloud, &cli.footprint)
        .with_offset(offset)
        .with_config(config);
    let output = job
        .run(&Lod12Reconstructor)
        .with_context(|| format!("Failed to reconstruct {:?}", cli.point_cloud))?;

    let mesh = output
        .meshes
        .first()
        .context("Reconstruction returned no mesh")?;
    println!(
        "Reconstructed {}: floor {:.2} m, roof {:.2} m, {} triangles",
        cli.id,
        mesh.floor_elevation,
        mesh.roof_elevation,
        output.triangulated.face_count()
    );

    if let Some(path) = &cli.obj {
        write_obj(path, &output.triangulated)?;
    }
    if let Some(path) = &cli.cityjson {
        write_cityjson(path, &cli.id, &output.meshes, offset)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_demo_complexity() {
        let cli = Cli::parse_from(["rsroofer"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.complexity_factor, DEFAULT_COMPLEXITY_FACTOR);
        assert_eq!(config.roof_percentile, 0.7);

        let cli = Cli::parse_from(["rsroofer", "--complexity-factor", "0.25"]);
        assert_eq!(load_config(&cli).unwrap().complexity_factor, 0.25);
    }

    #[test]
    fn test_config_file_keeps_its_complexity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "roof_percentile": 0.9 }"#).unwrap();
        let cli = Cli::parse_from(["rsroofer", "-c", path.to_str().unwrap()]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.complexity_factor, ReconstructionConfig::default().complexity_factor);
        assert_eq!(config.roof_percentile, 0.9);
    }

    #[test]
    fn test_fixed_offset() {
        let cli = Cli::parse_from(["rsroofer", "--x-offset", "-10.5", "--y-offset", "-20"]);
        assert_eq!(resolve_offset(&cli).unwrap(), Offset::new(-10.5, -20.0));

        let cli = Cli::parse_from(["rsroofer"]);
        assert_eq!(
            resolve_offset(&cli).unwrap(),
            Offset::new(DEFAULT_X_OFFSET, DEFAULT_Y_OFFSET)
        );
    }

    #[test]
    fn test_auto_offset_moves_footprint_corner_to_origin() {
        let dir = tempfile::tempdir().unwrap();
        let footprint = dir.path().join("footprint.txt");
        std::fs::write(
            &footprint,
            "POLYGON ((85210 446850, 85220 446848, 85222 446860, 85212 446861, 85210 446850))",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "rsroofer",
            "points.las",
            footprint.to_str().unwrap(),
            "--auto-offset",
        ]);
        let offset = resolve_offset(&cli).unwrap();
        assert_eq!(offset, Offset::new(-85210.0, -446848.0));

        let wkt = read_wkt_from_file(&footprint).unwrap();
        let rings = wkt_polygon_to_rings(&wkt, offset).unwrap();
        let bbox = BoundingBox::from_points(rings.iter().flatten()).unwrap();
        assert_eq!((bbox.min_x, bbox.min_y), (0.0, 0.0));
        assert!(rings.iter().flatten().all(|p| p[0] >= 0.0 && p[1] >= 0.0));
    }

    #[test]
    fn test_auto_offset_missing_footprint() {
        let cli = Cli::parse_from([
            "rsroofer",
            "points.las",
            "/nonexistent/footprint.txt",
            "--auto-offset",
        ]);
        assert!(resolve_offset(&cli).is_err());
    }
}
