use std::collections::HashMap;
use std::path::Path;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, UnitQuaternion, Vector2};
use tracing::{debug, warn};

use super::camera::OrbitCamera;
use super::controller::Controller;
use super::popup::InfoPopup;
use super::renderers::OrbitRenderer;
use crate::picking::{resolve_pick, PickHit};
use crate::registry::{BodyId, BodyRegistry, BodyState};

fn white() -> Point3<f32> {
    Point3::new(1.0, 1.0, 1.0)
}

/// Everything on screen: scene nodes mirroring the registry, orbit paths,
/// the camera and the text overlay.
pub struct View {
    body_nodes: HashMap<BodyId, SceneNode>,
    camera: OrbitCamera,
    renderer: OrbitRenderer,
    popup: InfoPopup,
}

impl View {
    pub fn new(window: &Window) -> Self {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 10.0, 30.0));
        camera.set_viewport(window.width(), window.height());

        View {
            body_nodes: HashMap::new(),
            camera,
            renderer: OrbitRenderer::new(),
            popup: InfoPopup::new(),
        }
    }

    /// Creates a node and orbit path for every body. Called once, when the
    /// registry becomes available.
    pub fn populate(&mut self, window: &mut Window, registry: &BodyRegistry) {
        for body in registry.bodies() {
            let node = Self::create_body_object(window, body);
            self.body_nodes.insert(body.id, node);

            if let Some(path) = body.orbit_path() {
                let color = body.config().color().unwrap_or_else(white);
                self.renderer.add_path(body.id, path, color);
            }
        }
        debug!("created {} scene nodes", self.body_nodes.len());
        self.update_scene_objects(registry);
    }

    fn create_body_object(window: &mut Window, body: &BodyState) -> SceneNode {
        let config = body.config();
        let mut sphere = window.add_sphere(config.sphere_radius as f32);

        let texture = Path::new(&config.path);
        if texture.is_file() {
            sphere.set_texture_from_file(texture, &config.name);
        } else {
            warn!(
                "texture {} for {} not found, using a flat color",
                texture.display(),
                config.name
            );
            let color = config.color().unwrap_or_else(white);
            sphere.set_color(color.x, color.y, color.z);
        }
        sphere
    }

    /// Copies the registry's transforms onto the scene nodes.
    pub fn update_scene_objects(&mut self, registry: &BodyRegistry) {
        for (id, node) in self.body_nodes.iter_mut() {
            let body = match registry.get(*id) {
                Some(body) => body,
                None => continue,
            };
            let transform = body.transform();
            let position: Point3<f32> = nalgebra::convert(transform.position);
            let rotation: UnitQuaternion<f32> = nalgebra::convert(transform.rotation());
            node.set_local_translation(Translation3::from(position.coords));
            node.set_local_rotation(rotation);
        }
    }

    pub fn pick(
        &self,
        window: &Window,
        screen: Point2<f32>,
        registry: &BodyRegistry,
    ) -> Option<PickHit> {
        let viewport = Vector2::new(window.width() as f32, window.height() as f32);
        resolve_pick(screen, viewport, &self.camera, registry)
    }

    pub fn popup_mut(&mut self) -> &mut InfoPopup {
        &mut self.popup
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller, status: &str) {
        let default_font = kiss3d::text::Font::default();
        let text_color = white();
        window.draw_text(
            &self.status_text(controller, status),
            &Point2::origin(),
            50.0,
            &default_font,
            &text_color,
        );

        if let Some(text) = self.popup.text() {
            let origin = Point2::new(0.0, 300.0);
            window.draw_text(text, &origin, 60.0, &default_font, &text_color);
        }
    }

    fn status_text(&self, controller: &Controller, status: &str) -> String {
        format!(
            "Speed: {}{}\nFPS: {:.0}\n{}",
            controller.speed().label(),
            if controller.is_paused() { " (paused)" } else { "" },
            controller.fps(),
            status,
        )
    }

    /// Removes every node and orbit path from the scene.
    pub fn teardown(&mut self) {
        for (_, mut node) in self.body_nodes.drain() {
            node.unlink();
        }
        self.renderer.clear();
        self.popup.hide();
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}
