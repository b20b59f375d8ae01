use std::path::PathBuf;

use approx::assert_relative_eq;
use orrery::config::{read_file, spawn_load};
use orrery::driver::{AnimationDriver, StepMode};
use orrery::registry::{BodyId, BodyRegistry};

fn data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data.json")
}

fn load_registry() -> BodyRegistry {
    let configs = read_file(data_path()).unwrap();
    BodyRegistry::build(configs, "Sun").unwrap()
}

#[test]
fn test_sample_file_loads() {
    let configs = read_file(data_path()).unwrap();
    assert_eq!(configs.len(), 10);
    for config in configs.iter() {
        assert!(config.color().is_some(), "{} has no usable color", config.name);
    }
}

#[test]
fn test_background_load_matches_direct_read() {
    let direct = read_file(data_path()).unwrap();
    let background = spawn_load(data_path()).wait().unwrap();
    assert_eq!(direct, background);
}

/// The moon orbits the earth, not the star, so it is left out of the scene.
#[test]
fn test_registry_keeps_direct_orbiters() {
    let registry = load_registry();
    assert_eq!(registry.len(), 9);
    assert_eq!(registry.star().id, BodyId(0));
    assert!(registry.find("Moon").is_none());
    assert_eq!(
        registry.planets().map(|b| b.name()).collect::<Vec<_>>(),
        vec!["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
    );
}

/// A few thousand frames at varying speed: bodies stay on their ellipses,
/// the star stays put, and angles stay wrapped.
#[test]
fn test_long_run() {
    let mut registry = load_registry();
    let mut driver = AnimationDriver::new(StepMode::Fixed(0.01));

    for frame in 0..5000 {
        let speed = match frame % 3 {
            0 => 0.1,
            1 => 1.0,
            _ => 5.0,
        };
        driver.tick(&mut registry, speed);
    }
    assert_eq!(driver.ticks(), 5000);

    let star = registry.star();
    assert_eq!(star.transform().position, nalgebra::Point3::origin());

    for body in registry.planets() {
        let orbit = body.orbit().unwrap();
        let p = body.transform().position;
        let norm = (p.x / orbit.radius_x()).powi(2) + (p.z / orbit.radius_y()).powi(2);
        assert_relative_eq!(norm, 1.0, epsilon = 1e-9);
        assert!((0.0..std::f64::consts::TAU).contains(&body.angle()));
    }
}

#[test]
fn test_earth_after_one_frame() {
    let mut registry = load_registry();
    let initial = registry.find("Earth").unwrap().angle();

    AnimationDriver::default().tick(&mut registry, 1.0);

    let earth = registry.find("Earth").unwrap();
    assert_relative_eq!(earth.angle(), initial + 0.01, epsilon = 1e-12);
    assert_relative_eq!(earth.transform().rotation_y, 0.05, epsilon = 1e-12);
}
