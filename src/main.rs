//! Papermap renders a paper-style vector map of a bounding box from an
//! OpenStreetMap extract: water background, land from closed coastlines,
//! then parks, water features, buildings, and roads on top.

mod args;
mod coastline;
mod coordinate_system;
mod features;
mod osm_reader;
mod relation_rings;
mod renderer;

use std::error::Error;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use geo::Coord;

use args::Args;
use coordinate_system::geographic::LLBBox;
use coordinate_system::page::PageTransform;
use features::FeatureSet;
use renderer::style;
use renderer::svg::SvgCanvas;
use renderer::FeatureRenderer;

fn main() {
    let args: Args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if let Err(e) = args::validate_args(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();

    let bbox: LLBBox = args.bbox.parse()?;
    let page = PageTransform::new(&bbox);

    println!("{} {}", "[1/5]".bold(), "Scanning extract...");
    let (needed_nodes, counts) = osm_reader::scan_referenced_nodes(&args.file)?;

    println!("{} {}", "[2/5]".bold(), "Reading features...");
    let mut features = FeatureSet::default();
    let boundary = osm_reader::scan_features(
        &args.file,
        &needed_nodes,
        &counts,
        args.boundary_relation,
        &mut features,
    )?;
    if let Some(relation_id) = args.boundary_relation {
        if boundary.is_none() {
            return Err(format!("Boundary relation {relation_id} not found in the extract").into());
        }
    }
    log::info!("Found {} coastline segments", features.coastline.len());

    println!("{} {}", "[3/5]".bold(), "Building land polygons...");
    let has_coastlines = !features.coastline.is_empty();
    let land = coastline::build_land_polygons(features.coastline.take(), &bbox)?;

    println!("{} {}", "[4/5]".bold(), "Rendering...");
    let mut canvas = SvgCanvas::new(page.width_points(), page.height_points());
    canvas.fill_page(style::WATER_COLOR);
    if !has_coastlines {
        log::warn!("No coastlines found to visualize. Assuming entire boundary is land.");
        canvas.fill_page(style::LAND_COLOR);
    }

    let mut renderer = FeatureRenderer::new(&mut canvas, page, boundary.as_ref());
    if has_coastlines {
        renderer.render_land(&land);
    }

    renderer.render_polygons(&features.parks.polygons, style::PARK_COLOR, "Rendering parks");
    let park_interiors = features.parks.interior_features();
    if !park_interiors.is_empty() {
        renderer.render_polygons(
            &park_interiors,
            style::PARK_INTERIOR_COLOR,
            "Rendering park interiors",
        );
    }

    renderer.render_polygons(
        &features.water.polygons,
        style::WATER_COLOR,
        "Rendering water bodies",
    );
    let rivers: Vec<(&[Coord], style::LineStyle)> = features
        .water
        .lines
        .iter()
        .map(|coords| (coords.as_slice(), style::river_style()))
        .collect();
    renderer.render_lines(&rivers, "Rendering rivers");

    renderer.render_polygons(
        &features.buildings.polygons,
        style::BUILDING_COLOR,
        "Rendering buildings",
    );

    let roads: Vec<(&[Coord], style::LineStyle)> = features
        .roads
        .lines_bottom_up()
        .into_iter()
        .map(|line| (line.coords.as_slice(), style::road_style(line.hierarchy)))
        .collect();
    renderer.render_lines(&roads, "Rendering roads");
    renderer.render_polygons(
        &features.roads.pedestrian_areas,
        style::PEDESTRIAN_AREA_COLOR,
        "Rendering pedestrian areas",
    );

    println!("{} Writing {}", "[5/5]".bold(), args.output.display());
    canvas.write_to(&args.output)?;

    let elapsed = start_time.elapsed().as_secs_f64();
    let minutes = (elapsed / 60.0) as u64;
    let seconds = elapsed % 60.0;
    println!(
        "{} Map written to {} in {} minutes and {:.2} seconds",
        "Done!".green().bold(),
        args.output.display(),
        minutes,
        seconds
    );

    Ok(())
}
