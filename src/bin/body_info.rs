use std::f64::consts::TAU;
use std::path::PathBuf;

use orrery::config::read_file;
use orrery::driver::DEFAULT_UNIT_STEP;
use orrery::registry::BodyRegistry;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
struct Args {
    name: String,
    #[arg(long, default_value = "data.json")]
    data: PathBuf,
    #[arg(long, default_value = "Sun")]
    star: String,
    #[arg(long, default_value_t = DEFAULT_UNIT_STEP)]
    unit_step: f64,
}

/// Number of ticks at 1x speed for a full turn, if the body turns at all.
fn ticks_per_turn(speed: f64, unit_step: f64) -> Option<f64> {
    let per_tick = speed.abs() * unit_step;
    if per_tick > 0.0 {
        Some(TAU / per_tick)
    } else {
        None
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let registry = BodyRegistry::build(read_file(&args.data)?, &args.star)?;
    let body = match registry
        .bodies()
        .find(|body| body.name().eq_ignore_ascii_case(&args.name))
    {
        Some(body) => body,
        None => {
            eprintln!("No body named {} in {}", args.name, args.data.display());
            std::process::exit(1);
        }
    };
    let config = body.config();

    println!("Characteristics for {}", body.name());
    match body.orbit() {
        Some(orbit) => {
            println!("- Orbits: {}", config.center);
            println!("- Semi-major axis: {}", orbit.radius_x());
            println!("- Semi-minor axis: {}", orbit.radius_y());
            println!("- Eccentricity: {}", orbit.eccentricity());
            println!(
                "- Ticks per revolution: {:?}",
                ticks_per_turn(config.revolution_speed, args.unit_step)
            );
        }
        None => println!("- Fixed at the center of the system"),
    }
    println!("- Sphere radius: {}", config.sphere_radius);
    println!("- Initial angle: {}", config.angle.to_degrees());
    println!(
        "- Ticks per rotation: {:?}",
        ticks_per_turn(config.rotation_speed, args.unit_step)
    );
    if let Some(description) = &config.description {
        println!("- {}", description);
    }

    Ok(())
}
