//! Property-based tests for orbit geometry and frame stepping.

use proptest::prelude::*;
use std::f64::consts::TAU;

use crate::config::BodyConfig;
use crate::driver::{AnimationDriver, StepMode};
use crate::math::ellipse::Ellipse;
use crate::math::geometry::wrap_angle;
use crate::registry::test_helpers::{body, sun};
use crate::registry::BodyRegistry;

fn planet_registry(
    radius_x: f64,
    eccentricity: f64,
    angle: f64,
    rotation_speed: f64,
    revolution_speed: f64,
) -> BodyRegistry {
    let configs = vec![
        sun(),
        BodyConfig {
            angle,
            rotation_speed,
            revolution_speed,
            ..body("Planet", "Sun", radius_x, eccentricity)
        },
    ];
    BodyRegistry::build(configs, "Sun").unwrap()
}

/// Distance between two angles measured on the unit circle.
fn angle_gap(a: f64, b: f64) -> f64 {
    ((a.cos() - b.cos()).powi(2) + (a.sin() - b.sin()).powi(2)).sqrt()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The minor axis never exceeds the major axis, and only a circle has
    /// them equal.
    #[test]
    fn prop_minor_axis_bounded(
        radius_x in 0.1f64..1000.0,
        eccentricity in 0.001f64..0.999,
    ) {
        let ellipse = Ellipse::new(radius_x, eccentricity).unwrap();
        prop_assert!(ellipse.radius_y() < ellipse.radius_x());

        let circle = Ellipse::circle(radius_x).unwrap();
        prop_assert_eq!(circle.radius_y(), circle.radius_x());
    }

    /// Every position satisfies (x/a)^2 + (z/b)^2 = 1 on the y = 0 plane.
    #[test]
    fn prop_position_on_ellipse(
        radius_x in 0.1f64..1000.0,
        eccentricity in 0.0f64..0.99,
        theta in -100.0f64..100.0,
    ) {
        let ellipse = Ellipse::new(radius_x, eccentricity).unwrap();
        let p = ellipse.position_at(theta);
        let norm = (p.x / ellipse.radius_x()).powi(2) + (p.z / ellipse.radius_y()).powi(2);

        prop_assert_eq!(p.y, 0.0);
        prop_assert!((norm - 1.0).abs() < 1e-9, "norm = {}", norm);
    }

    #[test]
    fn prop_wrap_angle_in_range(theta in -1e6f64..1e6) {
        let wrapped = wrap_angle(theta);
        prop_assert!((0.0..TAU).contains(&wrapped));
        prop_assert!(angle_gap(wrapped, theta) < 1e-6);
    }

    /// Ticking at zero speed leaves every body exactly where it was.
    #[test]
    fn prop_zero_speed_changes_nothing(
        eccentricity in 0.0f64..0.99,
        angle in -10.0f64..10.0,
        rotation_speed in -10.0f64..10.0,
        revolution_speed in -10.0f64..10.0,
        ticks in 1usize..200,
    ) {
        let mut registry = planet_registry(20.0, eccentricity, angle, rotation_speed, revolution_speed);
        let before: Vec<_> = registry.bodies().map(|b| (b.angle(), *b.transform())).collect();

        let mut driver = AnimationDriver::default();
        for _ in 0..ticks {
            driver.tick(&mut registry, 0.0);
        }

        let after: Vec<_> = registry.bodies().map(|b| (b.angle(), *b.transform())).collect();
        prop_assert_eq!(before, after);
    }

    /// k ticks at speed s land where one tick at speed k * s does.
    #[test]
    fn prop_ticks_compose_linearly(
        eccentricity in 0.0f64..0.99,
        angle in 0.0f64..TAU,
        revolution_speed in -5.0f64..5.0,
        rotation_speed in -5.0f64..5.0,
        speed in 0.1f64..5.0,
        k in 1usize..50,
    ) {
        let mut stepped = planet_registry(20.0, eccentricity, angle, rotation_speed, revolution_speed);
        let mut jumped = stepped.clone();

        let mut driver = AnimationDriver::new(StepMode::Fixed(0.01));
        for _ in 0..k {
            driver.tick(&mut stepped, speed);
        }
        AnimationDriver::default().advance(&mut jumped, 0.01, k as f64 * speed);

        for (a, b) in stepped.bodies().zip(jumped.bodies()) {
            prop_assert!(angle_gap(a.angle(), b.angle()) < 1e-9);
            prop_assert!(angle_gap(a.transform().rotation_y, b.transform().rotation_y) < 1e-9);
            prop_assert!((a.transform().position - b.transform().position).norm() < 1e-7);
        }
    }
}
