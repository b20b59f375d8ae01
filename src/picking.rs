//! Turning a click on the screen into the body under the cursor.
//!
//! Only the star can be picked. Clicks are converted to normalized device
//! coordinates, unprojected through the camera into a ray, and the ray is
//! tested against the star's sphere at its current position.

use kiss3d::camera::Camera;
use nalgebra::{Point2, Point3, Vector2};
use tracing::trace;

use crate::math::ray::Ray;
use crate::registry::{BodyId, BodyRegistry};

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    pub name: String,
    /// Distance from the near plane along the ray.
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Maps a pixel position to `[-1, 1]` on both axes, with y pointing up.
/// Returns `None` for an empty viewport.
pub fn normalized_device_coords(screen: Point2<f32>, viewport: Vector2<f32>) -> Option<Point2<f32>> {
    if !(viewport.x > 0.0 && viewport.y > 0.0) {
        return None;
    }
    Some(Point2::new(
        screen.x / viewport.x * 2.0 - 1.0,
        -(screen.y / viewport.y) * 2.0 + 1.0,
    ))
}

/// The ray from the near plane to the far plane through `ndc`.
pub fn camera_ray(camera: &dyn Camera, ndc: Point2<f32>) -> Option<Ray> {
    let inverse = camera.inverse_transformation();
    let near = inverse.transform_point(&Point3::new(ndc.x, ndc.y, -1.0));
    let far = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 1.0));
    Ray::through(near, far)
}

/// Resolves a click at `screen` (pixels, origin top-left) to the star, if the
/// star is under it.
pub fn resolve_pick(
    screen: Point2<f32>,
    viewport: Vector2<f32>,
    camera: &dyn Camera,
    registry: &BodyRegistry,
) -> Option<PickHit> {
    let ndc = normalized_device_coords(screen, viewport)?;
    let ray = camera_ray(camera, ndc)?;

    let star = registry.star();
    let center: Point3<f32> = nalgebra::convert(star.transform().position);
    let radius = star.config().sphere_radius as f32;

    let distance = ray.intersect_sphere(&center, radius);
    trace!("pick at {:?} (ndc {:?}): {:?}", screen, ndc, distance);

    distance.map(|distance| PickHit {
        body: star.id,
        name: star.name().to_owned(),
        distance,
        point: ray.at(distance),
    })
}
