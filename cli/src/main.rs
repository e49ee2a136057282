mod cli;
mod error;
mod filters;
mod heightmap;
mod mesh_out;
mod raster;
mod writer;

use anyhow::Result;
use clap::Parser;
use reliefmesh_core::{triangulate, Bounds, Heightmap};

use cli::Cli;
use error::CliError;
use heightmap::ImageHeightmap;

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    anyhow::ensure!(
        args.outfile.is_some() || args.normal_map.is_some() || args.shade_path.is_some(),
        CliError::NothingToWrite
    );

    log::info!("loading {}", args.infile.display());
    let decoded = ImageHeightmap::load(&args.infile)?;
    let heightmap = heightmap::apply_filters(decoded, &args)?;

    if let Some(path) = &args.normal_map {
        log::info!("writing normal map to {}", path.display());
        raster::normal_map(&heightmap, args.zscale).save(path)?;
    }
    if let Some(path) = &args.shade_path {
        log::info!("writing hillshade to {}", path.display());
        raster::hillshade(&heightmap, args.zscale, args.shade_alt, args.shade_az).save(path)?;
    }

    let Some(outfile) = &args.outfile else {
        log::info!("no mesh output requested; done");
        return Ok(());
    };

    log::info!("triangulating ({}x{})", heightmap.width(), heightmap.height());
    let bounds = Bounds {
        max_error: args.error,
        max_triangles: args.triangles,
        max_points: args.points,
    };
    let (points, triangles, error) = triangulate(&heightmap, bounds)?;
    log::info!(
        "triangulation produced {} points, {} triangles, terminal error {:.6}",
        points.len(),
        triangles.len(),
        error
    );

    let xsize = args.xsize.unwrap_or(heightmap.width() as f64);
    let ysize = args.ysize.unwrap_or(heightmap.height() as f64);
    let mut mesh = mesh_out::rescale(
        &points,
        &triangles,
        heightmap.width(),
        heightmap.height(),
        xsize,
        ysize,
        args.zscale,
    );

    if args.base > 0.0 {
        log::info!("extruding a solid base {} units deep", args.base);
        mesh_out::add_solid_base(&mut mesh, args.base);
    }

    log::info!("writing mesh to {}", outfile.display());
    writer::write_mesh(&mesh, outfile)?;

    log::info!(
        "done: {} vertices, {} triangles, terminal error {:.6}",
        mesh.vertices.len(),
        mesh.triangles.len(),
        error
    );

    Ok(())
}
