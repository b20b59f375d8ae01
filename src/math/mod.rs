pub mod ellipse;
pub mod geometry;
pub mod ray;
