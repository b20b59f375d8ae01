//! Loading the body list that describes the system.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed body data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("loader thread exited without reporting a result")]
    LoaderDisconnected,
}

/// One entry of the data file. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyConfig {
    pub name: String,
    /// Name of the body this one orbits.
    #[serde(alias = "centerOf")]
    pub center: String,
    pub eccentricity: f64,
    /// Semi-major axis of the orbit.
    pub orbit_radius_x: f64,
    pub sphere_radius: f64,
    /// Surface texture.
    #[serde(alias = "texturePath")]
    pub path: String,
    /// Initial phase, in radians.
    pub angle: f64,
    pub rotation_speed: f64,
    pub revolution_speed: f64,
    /// `RRGGBB`, used for the orbit path and when the texture is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BodyConfig {
    pub fn color(&self) -> Option<Point3<f32>> {
        self.color.as_deref().and_then(parse_color)
    }
}

/// Parses the contents of a data file: a JSON array of bodies. Names are
/// unique in the result; the first entry with a given name wins.
pub fn parse(contents: &str) -> Result<Vec<BodyConfig>, ConfigError> {
    let configs: Vec<BodyConfig> = serde_json::from_str(contents)?;

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(configs.len());
    for config in configs {
        if seen.contains(&config.name) {
            warn!("dropping duplicate entry for {}", config.name);
            continue;
        }
        seen.insert(config.name.clone());
        unique.push(config);
    }

    Ok(unique)
}

pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<BodyConfig>, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    let configs = parse(&contents)?;
    info!("loaded {} bodies from {}", configs.len(), path.display());
    Ok(configs)
}

/// Starts reading `path` on a worker thread. The render loop keeps running
/// and picks up the result with [`PendingLoad::poll`].
pub fn spawn_load(path: PathBuf) -> PendingLoad {
    let (sender, receiver) = mpsc::channel();
    let worker_path = path.clone();
    thread::spawn(move || {
        // If the receiver is gone nobody is waiting on the result
        let _ = sender.send(read_file(&worker_path));
    });
    debug!("started loading {}", path.display());

    PendingLoad {
        receiver: Some(receiver),
        path,
    }
}

/// A configuration load in flight. Yields its result exactly once.
pub struct PendingLoad {
    receiver: Option<Receiver<Result<Vec<BodyConfig>, ConfigError>>>,
    path: PathBuf,
}

impl PendingLoad {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }

    /// Non-blocking. Returns `None` while the load is running and after the
    /// result has been taken.
    pub fn poll(&mut self) -> Option<Result<Vec<BodyConfig>, ConfigError>> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ConfigError::LoaderDisconnected),
        };
        self.receiver = None;
        Some(result)
    }

    /// Blocks until the load finishes.
    pub fn wait(mut self) -> Result<Vec<BodyConfig>, ConfigError> {
        match self.receiver.take() {
            Some(receiver) => receiver
                .recv()
                .unwrap_or(Err(ConfigError::LoaderDisconnected)),
            None => Err(ConfigError::LoaderDisconnected),
        }
    }
}

fn parse_color(s: &str) -> Option<Point3<f32>> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;

    Some(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARTH: &str = r#"{
        "name": "Earth",
        "center": "Sun",
        "eccentricity": 0.0167,
        "orbitRadiusX": 30,
        "sphereRadius": 1.2,
        "path": "textures/earth.jpg",
        "angle": 0.5,
        "rotationSpeed": 1.0,
        "revolutionSpeed": 0.2
    }"#;

    #[test]
    fn test_parse_single() {
        let configs = parse(&format!("[{}]", EARTH)).unwrap();
        assert_eq!(configs.len(), 1);

        let earth = &configs[0];
        assert_eq!(earth.name, "Earth");
        assert_eq!(earth.center, "Sun");
        assert_eq!(earth.orbit_radius_x, 30.0);
        assert_eq!(earth.path, "textures/earth.jpg");
        assert_eq!(earth.revolution_speed, 0.2);
        assert_eq!(earth.color, None);
        assert_eq!(earth.description, None);
    }

    #[test]
    fn test_parse_aliases() {
        let json = r#"[{
            "name": "Mars", "centerOf": "Sun", "eccentricity": 0.09,
            "orbitRadiusX": 45, "sphereRadius": 0.8, "texturePath": "mars.png",
            "angle": 0, "rotationSpeed": 0.9, "revolutionSpeed": 0.1,
            "color": "c1440e"
        }]"#;
        let configs = parse(json).unwrap();
        assert_eq!(configs[0].center, "Sun");
        assert_eq!(configs[0].path, "mars.png");
        approx::assert_relative_eq!(
            configs[0].color().unwrap(),
            Point3::new(193.0 / 255.0, 68.0 / 255.0, 14.0 / 255.0)
        );
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let second_earth = EARTH.replace("\"angle\": 0.5", "\"angle\": 2.0");
        let moon = r#"{
            "name": "Moon", "center": "Earth", "eccentricity": 0.05,
            "orbitRadiusX": 2, "sphereRadius": 0.3, "path": "moon.jpg",
            "angle": 0, "rotationSpeed": 0.5, "revolutionSpeed": 13
        }"#;
        let json = format!("[{}, {}, {}, {}]", EARTH, moon, second_earth, moon);

        let configs = parse(&json).unwrap();
        let names: Vec<_> = configs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Earth", "Moon"]);
        assert_eq!(configs[0].angle, 0.5);
    }

    #[test]
    fn test_missing_field() {
        let json = r#"[{ "name": "Nowhere", "center": "Sun" }]"#;
        assert!(matches!(parse(json), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("ffffff"), Some(Point3::new(1.0, 1.0, 1.0)));
        assert_eq!(parse_color("#000000"), Some(Point3::new(0.0, 0.0, 0.0)));
        assert_eq!(parse_color("fff"), None);
        assert_eq!(parse_color("zzzzzz"), None);
        assert_eq!(parse_color("+f+f+f"), None);
        assert_eq!(parse_color("-1-1-1"), None);
    }

    #[test]
    fn test_missing_file() {
        let err = read_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_spawn_load_reports_failure_once() {
        let mut pending = spawn_load(PathBuf::from("does/not/exist.json"));
        let result = loop {
            if let Some(result) = pending.poll() {
                break result;
            }
            thread::yield_now();
        };
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert!(pending.is_finished());
        assert!(pending.poll().is_none());
    }
}
