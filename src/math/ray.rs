use nalgebra::{Point3, Unit, Vector3};

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Returns `None` if `direction` is too short to normalize.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        Unit::try_new(direction, f32::EPSILON).map(|direction| Ray { origin, direction })
    }

    pub fn through(from: Point3<f32>, to: Point3<f32>) -> Option<Self> {
        Self::new(from, to - from)
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }

    /// Distance along the ray to the point where it enters the sphere, or
    /// `None` if it misses or the entry point is behind the origin. A ray
    /// starting inside the sphere never enters it, so it misses.
    pub fn intersect_sphere(&self, center: &Point3<f32>, radius: f32) -> Option<f32> {
        // Solve |o + t d - c|^2 = r^2 with |d| = 1
        let oc = self.origin - center;
        let b = oc.dot(&self.direction.into_inner());
        let c = oc.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let near = -b - discriminant.sqrt();
        if near >= 0.0 {
            Some(near)
        } else {
            None
        }
    }
}
