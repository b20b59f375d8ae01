mod orbit_renderer;

pub use orbit_renderer::OrbitRenderer;
