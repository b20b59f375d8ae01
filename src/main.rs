use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orrery::config::spawn_load;
use orrery::driver::{StepMode, DEFAULT_UNIT_STEP};
use orrery::gui::{SceneOptions, Simulation};
use orrery::math::ellipse::DEFAULT_PATH_SEGMENTS;

/// Interactive view of a star and the bodies orbiting it.
///
/// Drag to orbit the camera, right-drag to pan, scroll to zoom. Click the
/// star for details.
#[derive(Debug, Parser)]
struct Args {
    /// JSON file describing the bodies
    #[arg(long, default_value = "data.json")]
    data: PathBuf,
    /// Body at the center of the system
    #[arg(long, default_value = "Sun")]
    star: String,
    /// Initial speed multiplier, clamped to [0.1, 5]
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
    /// Angle advanced per frame at 1x speed
    #[arg(long, default_value_t = DEFAULT_UNIT_STEP)]
    unit_step: f64,
    /// Step by wall-clock time instead of by frame
    #[arg(long, conflicts_with = "unit_step")]
    realtime: bool,
    /// Segments per drawn orbit path
    #[arg(long, default_value_t = DEFAULT_PATH_SEGMENTS)]
    segments: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let step_mode = if args.realtime {
        StepMode::Elapsed
    } else {
        StepMode::Fixed(args.unit_step)
    };
    info!("starting with {:?} at {}x", step_mode, args.speed);

    let mut window = Window::new("Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    // The window opens right away; bodies appear once the file is read
    let pending = spawn_load(args.data);
    let options = SceneOptions {
        star_name: args.star,
        path_segments: args.segments,
        step_mode,
        initial_speed: args.speed,
    };

    let simulation = Simulation::new(pending, options, &mut window);
    window.render_loop(simulation);
}
