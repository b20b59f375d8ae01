use std::f64::consts::TAU;

use nalgebra::Point3;
use thiserror::Error;

use super::geometry::path_iter_parametric;

/// Number of segments used for a drawn orbit path.
pub const DEFAULT_PATH_SEGMENTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrbitError {
    #[error("eccentricity {0} is outside [0, 1); only closed orbits are supported")]
    Eccentricity(f64),
    #[error("orbit radius {0} must be positive and finite")]
    OrbitRadius(f64),
    #[error("sphere radius {0} must be positive and finite")]
    SphereRadius(f64),
}

/// Semi-minor axis of an ellipse with the given semi-major axis and
/// eccentricity.
pub fn semi_minor_axis(semi_major: f64, eccentricity: f64) -> f64 {
    semi_major * (1.0 - eccentricity * eccentricity).sqrt()
}

/// An origin-centered ellipse in the horizontal (x-z) plane.
///
/// Bodies move along it parametrically: at phase `theta` the position is
/// `(a cos theta, 0, b sin theta)`. There is no inclination and the star
/// sits at the center, not at a focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    radius_x: f64,
    radius_y: f64,
    eccentricity: f64,
}

impl Ellipse {
    pub fn new(radius_x: f64, eccentricity: f64) -> Result<Self, OrbitError> {
        // Written so that NaN fails both checks
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(OrbitError::Eccentricity(eccentricity));
        }
        if !(radius_x > 0.0 && radius_x.is_finite()) {
            return Err(OrbitError::OrbitRadius(radius_x));
        }

        Ok(Ellipse {
            radius_x,
            radius_y: semi_minor_axis(radius_x, eccentricity),
            eccentricity,
        })
    }

    pub fn circle(radius: f64) -> Result<Self, OrbitError> {
        Self::new(radius, 0.0)
    }

    pub fn radius_x(&self) -> f64 {
        self.radius_x
    }

    pub fn radius_y(&self) -> f64 {
        self.radius_y
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn position_at(&self, theta: f64) -> Point3<f64> {
        Point3::new(
            self.radius_x * theta.cos(),
            0.0,
            self.radius_y * theta.sin(),
        )
    }

    /// Returns a closed loop of `num_segments + 1` points tracing the whole
    /// ellipse; the first and last points coincide.
    pub fn sample_path(&self, num_segments: usize) -> Vec<Point3<f32>> {
        let f = |theta: f64| -> Point3<f32> { nalgebra::convert(self.position_at(theta)) };
        path_iter_parametric(f, 0.0, TAU, num_segments).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    #[test]
    fn test_semi_minor_axis() {
        approx::assert_relative_eq!(semi_minor_axis(10.0, 0.0), 10.0);
        approx::assert_relative_eq!(semi_minor_axis(10.0, 0.6), 8.0, epsilon = 1e-12);
        approx::assert_relative_eq!(semi_minor_axis(5.0, 0.8), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circle_degenerates() {
        let circle = Ellipse::circle(4.0).unwrap();
        assert_eq!(circle.radius_x(), circle.radius_y());
        approx::assert_relative_eq!(
            circle.position_at(PI / 2.0),
            Point3::new(0.0, 0.0, 4.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_open_orbits() {
        assert_eq!(Ellipse::new(1.0, 1.0), Err(OrbitError::Eccentricity(1.0)));
        assert_eq!(Ellipse::new(1.0, 2.5), Err(OrbitError::Eccentricity(2.5)));
        assert_eq!(Ellipse::new(1.0, -0.1), Err(OrbitError::Eccentricity(-0.1)));
        assert!(matches!(
            Ellipse::new(1.0, f64::NAN),
            Err(OrbitError::Eccentricity(_))
        ));
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert_eq!(Ellipse::new(0.0, 0.5), Err(OrbitError::OrbitRadius(0.0)));
        assert_eq!(Ellipse::new(-3.0, 0.5), Err(OrbitError::OrbitRadius(-3.0)));
        assert!(Ellipse::new(f64::INFINITY, 0.5).is_err());
    }

    #[test]
    fn test_position_on_axes() {
        let ellipse = Ellipse::new(10.0, 0.6).unwrap();
        approx::assert_relative_eq!(ellipse.position_at(0.0), Point3::new(10.0, 0.0, 0.0));
        approx::assert_relative_eq!(
            ellipse.position_at(PI / 2.0),
            Point3::new(0.0, 0.0, 8.0),
            epsilon = 1e-12
        );
        approx::assert_relative_eq!(
            ellipse.position_at(PI),
            Point3::new(-10.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_reference_scenario() {
        let ellipse = Ellipse::circle(10.0).unwrap();
        let pos = ellipse.position_at(0.01);
        approx::assert_relative_eq!(pos.x, 9.9995, epsilon = 1e-4);
        approx::assert_relative_eq!(pos.y, 0.0);
        approx::assert_relative_eq!(pos.z, 0.09999, epsilon = 1e-5);
    }

    #[test]
    fn test_sample_path() {
        let ellipse = Ellipse::new(10.0, 0.6).unwrap();
        let path = ellipse.sample_path(DEFAULT_PATH_SEGMENTS);
        assert_eq!(path.len(), DEFAULT_PATH_SEGMENTS + 1);
        approx::assert_relative_eq!(path[0], path[DEFAULT_PATH_SEGMENTS], epsilon = 1e-4);

        for pt in path.iter() {
            assert_eq!(pt.y, 0.0);
            let (x, z) = (pt.x / 10.0, pt.z / 8.0);
            approx::assert_relative_eq!(x * x + z * z, 1.0, epsilon = 1e-5);
        }
    }
}
