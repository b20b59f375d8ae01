pub mod config;
pub mod driver;
pub mod gui;
pub mod math;
pub mod picking;
pub mod registry;

#[cfg(test)]
mod proptest_motion;
