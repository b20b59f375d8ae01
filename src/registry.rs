use std::collections::HashSet;
use std::sync::Arc;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BodyConfig;
use crate::math::ellipse::{Ellipse, OrbitError, DEFAULT_PATH_SEGMENTS};
use crate::math::geometry::wrap_angle;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyId(pub usize);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("no body named {0:?} to anchor the system")]
    MissingStar(String),
    #[error("star {name:?} is malformed: {source}")]
    InvalidStar {
        name: String,
        #[source]
        source: OrbitError,
    },
}

/// Where a body is and how far it has spun about its own (vertical) axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3<f64>,
    pub rotation_y: f64,
}

impl Transform {
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.rotation_y)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Point3::origin(),
            rotation_y: 0.0,
        }
    }
}

/// Live state of one body. Only the animation driver mutates it.
#[derive(Debug, Clone)]
pub struct BodyState {
    pub id: BodyId,
    config: Arc<BodyConfig>,
    // None for the star, which stays at the origin
    orbit: Option<Ellipse>,
    angle: f64,
    transform: Transform,
    orbit_path: Option<Vec<Point3<f32>>>,
}

impl BodyState {
    fn new_star(id: BodyId, config: Arc<BodyConfig>) -> Self {
        BodyState {
            id,
            angle: wrap_angle(config.angle),
            config,
            orbit: None,
            transform: Transform::default(),
            orbit_path: None,
        }
    }

    fn new_orbiting(id: BodyId, config: Arc<BodyConfig>, orbit: Ellipse, segments: usize) -> Self {
        let angle = wrap_angle(config.angle);
        BodyState {
            id,
            config,
            orbit: Some(orbit),
            angle,
            transform: Transform {
                position: orbit.position_at(angle),
                rotation_y: 0.0,
            },
            orbit_path: Some(orbit.sample_path(segments)),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    pub fn orbit(&self) -> Option<&Ellipse> {
        self.orbit.as_ref()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn orbit_path(&self) -> Option<&[Point3<f32>]> {
        self.orbit_path.as_deref()
    }

    pub fn is_star(&self) -> bool {
        self.orbit.is_none()
    }

    /// Spins and moves the body by `step` (already scaled by the speed
    /// multiplier).
    pub(crate) fn advance(&mut self, step: f64) {
        self.transform.rotation_y =
            wrap_angle(self.transform.rotation_y + self.config.rotation_speed * step);
        self.angle = wrap_angle(self.angle + self.config.revolution_speed * step);
        if let Some(orbit) = &self.orbit {
            self.transform.position = orbit.position_at(self.angle);
        }
    }
}

/// Every body in the scene: the star plus whatever orbits it directly.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: Vec<BodyState>,
    star: BodyId,
}

impl BodyRegistry {
    pub fn build(configs: Vec<BodyConfig>, star_name: &str) -> Result<Self, RegistryError> {
        Self::build_with_segments(configs, star_name, DEFAULT_PATH_SEGMENTS)
    }

    /// Keeps the star and the bodies whose `center` is the star. Malformed
    /// planets are dropped with a warning; a malformed star is an error.
    /// Only the first entry with a given name is used.
    pub fn build_with_segments(
        configs: Vec<BodyConfig>,
        star_name: &str,
        segments: usize,
    ) -> Result<Self, RegistryError> {
        if !configs.iter().any(|c| c.name == star_name) {
            return Err(RegistryError::MissingStar(star_name.to_owned()));
        }

        let mut bodies = Vec::new();
        let mut star = None;
        let mut seen = HashSet::new();
        for config in configs {
            if !seen.insert(config.name.clone()) {
                warn!("ignoring repeated entry for {}", config.name);
                continue;
            }
            let id = BodyId(bodies.len());

            if config.name == star_name {
                check_sphere_radius(&config).map_err(|source| RegistryError::InvalidStar {
                    name: config.name.clone(),
                    source,
                })?;
                star = Some(id);
                bodies.push(BodyState::new_star(id, Arc::new(config)));
                continue;
            }

            if config.center != star_name {
                debug!(
                    "skipping {}: orbits {}, not {}",
                    config.name, config.center, star_name
                );
                continue;
            }

            let orbit = match check_sphere_radius(&config)
                .and_then(|_| Ellipse::new(config.orbit_radius_x, config.eccentricity))
            {
                Ok(orbit) => orbit,
                Err(err) => {
                    warn!("excluding {}: {}", config.name, err);
                    continue;
                }
            };
            bodies.push(BodyState::new_orbiting(
                id,
                Arc::new(config),
                orbit,
                segments,
            ));
        }

        let star = star.ok_or_else(|| RegistryError::MissingStar(star_name.to_owned()))?;
        debug!("registry holds {} bodies", bodies.len());
        Ok(BodyRegistry { bodies, star })
    }

    pub fn bodies(&self) -> impl Iterator<Item = &BodyState> + '_ {
        self.bodies.iter()
    }

    pub(crate) fn bodies_mut(&mut self) -> impl Iterator<Item = &mut BodyState> + '_ {
        self.bodies.iter_mut()
    }

    pub fn get(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&BodyState> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    /// The designated pick target.
    pub fn star(&self) -> &BodyState {
        &self.bodies[self.star.0]
    }

    /// Bodies orbiting the star.
    pub fn planets(&self) -> impl Iterator<Item = &BodyState> + '_ {
        self.bodies.iter().filter(|b| !b.is_star())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn check_sphere_radius(config: &BodyConfig) -> Result<(), OrbitError> {
    let r = config.sphere_radius;
    if r > 0.0 && r.is_finite() {
        Ok(())
    } else {
        Err(OrbitError::SphereRadius(r))
    }
}
