use std::fs;
use std::path::PathBuf;

use clap::Parser;
use nalgebra::Point3;
use plotters::prelude::*;
use tracing_subscriber::EnvFilter;

use orrery::config::read_file;
use orrery::math::ellipse::DEFAULT_PATH_SEGMENTS;
use orrery::registry::BodyRegistry;

/// Draws the orbits of a data file seen from above, with every body at its
/// initial angle.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value = "data.json")]
    data: PathBuf,
    #[arg(long, default_value = "Sun")]
    star: String,
    #[arg(long, default_value = "plots/orbits.png")]
    output: PathBuf,
    #[arg(long, default_value_t = DEFAULT_PATH_SEGMENTS)]
    segments: usize,
}

fn to_rgb(color: Option<Point3<f32>>) -> RGBColor {
    match color {
        Some(c) => RGBColor(
            (c.x * 255.0).round() as u8,
            (c.y * 255.0).round() as u8,
            (c.z * 255.0).round() as u8,
        ),
        None => BLACK,
    }
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let registry =
        BodyRegistry::build_with_segments(read_file(&args.data)?, &args.star, args.segments)?;

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }
    draw_plot(&args.output, &registry)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn draw_plot(
    name: &std::path::Path,
    registry: &BodyRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let extent = registry
        .planets()
        .filter_map(|body| body.orbit())
        .map(|orbit| orbit.radius_x())
        .fold(1.0, f64::max) as f32
        * 1.1;

    let root = BitMapBackend::new(name, (640, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart.configure_mesh().draw()?;

    for body in registry.bodies() {
        let color = to_rgb(body.config().color());
        if let Some(path) = body.orbit_path() {
            chart.draw_series(LineSeries::new(path.iter().map(|p| (p.x, p.z)), &color))?;
        }

        let position = body.transform().position;
        chart.draw_series(std::iter::once(Circle::new(
            (position.x as f32, position.z as f32),
            3,
            color.filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}
