use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3};

use crate::registry::BodyId;

/// Draws the static orbit paths. Each path is uploaded once and redrawn every
/// frame until cleared.
pub struct OrbitRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    line_width: f32,
    // Orbit paths, stored as (pt, color, pt, color)
    orbits: HashMap<BodyId, GPUVec<Point3<f32>>>,
}

impl OrbitRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        OrbitRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            color: shader
                .get_attrib::<Point3<f32>>("color")
                .expect("Failed to get shader attribute."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            shader,
            line_width: 1.0,
            orbits: HashMap::new(),
        }
    }

    pub fn add_path(&mut self, id: BodyId, points: &[Point3<f32>], color: Point3<f32>) {
        let mut data = Vec::with_capacity(4 * points.len());
        for pts in points.windows(2) {
            data.push(pts[0]);
            data.push(color);
            data.push(pts[1]);
            data.push(color);
        }

        // Replaces any earlier path for the same body
        self.orbits.insert(
            id,
            GPUVec::new(data, BufferType::Array, AllocationType::StaticDraw),
        );
    }

    pub fn clear(&mut self) {
        self.orbits.clear();
    }
}

impl Renderer for OrbitRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.orbits.is_empty() {
            return;
        }

        self.shader.use_program();
        self.pos.enable();
        self.color.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        let ctxt = Context::get();
        ctxt.line_width(self.line_width);
        for orbit_lines in self.orbits.values_mut() {
            self.pos.bind_sub_buffer(orbit_lines, 1, 0);
            self.color.bind_sub_buffer(orbit_lines, 1, 1);

            ctxt.draw_arrays(Context::LINES, 0, (orbit_lines.len() / 2) as i32);
        }

        self.pos.disable();
        self.color.disable();
    }
}

/// Vertex shader used by the material to display line.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    varying   vec3 vColor;
    uniform   mat4 proj;
    uniform   mat4 view;
    void main() {
        gl_Position = proj * view * vec4(position, 1.0);
        vColor = color;
    }";

/// Fragment shader used by the material to display line.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 vColor;
    void main() {
        gl_FragColor = vec4(vColor, 1.0);
    }";
