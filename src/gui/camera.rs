use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

// Orbit-style camera around a movable target, with y as up since the orbits
// lie in the x-z plane.
//
// Left-drag rotates, right-drag pans the target, scrolling zooms. Rotation is
// damped: input accumulates into a pending delta, and each frame applies a
// fraction of it and decays the rest.
pub struct OrbitCamera {
    // -- position --
    target: Point3<f32>,
    theta: f32,  // azimuth around y, measured from +z
    phi: f32,    // polar angle from +y
    radius: f32, // distance from target
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- damping --
    pending_theta: f32,
    pending_phi: f32,
    damping: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    theta_step: f32,
    phi_step: f32,
    pan_step: f32,
    scroll_ratio: f32,
    phi_limit: f32,
    radius_limits: (f32, f32),
}

impl OrbitCamera {
    /// Places the camera at `eye`, looking at the origin.
    pub fn new(eye: Point3<f32>) -> Self {
        let radius = eye.coords.norm().max(f32::EPSILON);
        OrbitCamera {
            target: Point3::origin(),
            theta: eye.x.atan2(eye.z),
            phi: (eye.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
            width: 800,
            height: 600,
            fovy: 75.0f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            damping: 0.05,
            last_cursor_pos: Vector2::zeros(),
            theta_step: 0.005,
            phi_step: 0.005,
            pan_step: 0.0015,
            scroll_ratio: 1.1,
            phi_limit: 0.001,
            radius_limits: (1.0, 500.0),
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, self.znear, self.zfar)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Queues a damped rotation; see [`OrbitCamera::update`].
    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.pending_theta += dtheta;
        self.pending_phi += dphi;
    }

    /// Moves the target along the screen's right and up directions.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let view_inv = self.view_transform().inverse();
        let right = view_inv.transform_vector(&Vector3::x());
        let up = view_inv.transform_vector(&Vector3::y());
        let scale = self.radius * self.pan_step;
        self.target += (-dx * right + dy * up) * scale;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = nalgebra::clamp(
            self.radius * factor,
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }

    fn apply_rotation(&mut self, dtheta: f32, dphi: f32) {
        self.theta = (self.theta + dtheta) % (2.0 * PI);
        self.phi = nalgebra::clamp(self.phi + dphi, self.phi_limit, PI - self.phi_limit);
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);
                let dpos = curr_pos - self.last_cursor_pos;

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Drag right == camera glides left
                    self.rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                } else if canvas.get_mouse_button(MouseButton::Button2) == Action::Press {
                    self.pan(dpos.x, dpos.y);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => self.set_viewport(w, h),
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.target
            + Vector3::new(
                self.radius * self.phi.sin() * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * self.phi.sin() * self.theta.cos(),
            )
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.target, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        // Only singular for a degenerate viewport
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {
        let (dtheta, dphi) = (
            self.pending_theta * self.damping,
            self.pending_phi * self.damping,
        );
        self.apply_rotation(dtheta, dphi);
        self.pending_theta -= dtheta;
        self.pending_phi -= dphi;
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_eye() {
        let camera = OrbitCamera::new(Point3::new(0.0, 10.0, 30.0));
        approx::assert_relative_eq!(
            camera.eye(),
            Point3::new(0.0, 10.0, 30.0),
            epsilon = 1e-4
        );
        approx::assert_relative_eq!(camera.distance(), 1000.0f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_rotation_is_damped() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 30.0));
        camera.rotate(1.0, 0.0);
        // Nothing moves until the frame update
        approx::assert_relative_eq!(camera.eye(), Point3::new(0.0, 0.0, 30.0), epsilon = 1e-4);

        camera.apply_rotation(camera.pending_theta * camera.damping, 0.0);
        approx::assert_relative_eq!(camera.theta, 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 30.0));
        camera.zoom(1e6);
        approx::assert_relative_eq!(camera.distance(), 500.0);
        camera.zoom(1e-6);
        approx::assert_relative_eq!(camera.distance(), 1.0);
    }

    #[test]
    fn test_pan_moves_target_and_eye() {
        let mut camera = OrbitCamera::new(Point3::new(0.0, 0.0, 30.0));
        let eye_before = camera.eye();
        camera.pan(-100.0, 0.0);
        let shift = camera.target() - Point3::origin();
        assert!(shift.x > 0.0);
        approx::assert_relative_eq!(shift.y, 0.0, epsilon = 1e-5);
        approx::assert_relative_eq!(camera.eye() - eye_before, shift, epsilon = 1e-5);
    }
}
