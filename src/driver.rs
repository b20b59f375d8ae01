use std::time::Instant;

use tracing::info;

use crate::registry::BodyRegistry;

/// Per-frame increment applied when stepping by frames rather than by time.
pub const DEFAULT_UNIT_STEP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMode {
    /// Advance by the same amount every frame, however long the frame took.
    /// Faster displays make the system spin faster.
    Fixed(f64),
    /// Advance by the wall-clock seconds since the previous frame. Speeds in
    /// the data file are then radians per second.
    Elapsed,
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::Fixed(DEFAULT_UNIT_STEP)
    }
}

/// Moves every body in the registry once per rendered frame.
pub struct AnimationDriver {
    mode: StepMode,
    last_frame: Option<Instant>,
    running: bool,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(mode: StepMode) -> Self {
        AnimationDriver {
            mode,
            last_frame: None,
            running: true,
            ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Called once per frame. `speed` is the current multiplier; it is used
    /// for this frame only and never stored.
    pub fn tick(&mut self, registry: &mut BodyRegistry, speed: f64) {
        self.tick_at(registry, speed, Instant::now())
    }

    pub fn tick_at(&mut self, registry: &mut BodyRegistry, speed: f64, now: Instant) {
        if !self.running {
            return;
        }

        let step = match self.mode {
            StepMode::Fixed(unit_step) => unit_step,
            // The first frame has nothing to measure against
            StepMode::Elapsed => self
                .last_frame
                .map(|prev| now.saturating_duration_since(prev).as_secs_f64())
                .unwrap_or(0.0),
        };
        self.last_frame = Some(now);

        self.advance(registry, step, speed);
    }

    /// Advances every body by `step * speed` without consulting the clock.
    pub fn advance(&mut self, registry: &mut BodyRegistry, step: f64, speed: f64) {
        if !self.running {
            return;
        }

        let scaled = step * speed;
        for body in registry.bodies_mut() {
            body.advance(scaled);
        }
        self.ticks += 1;
    }

    /// Later ticks do nothing. There is no restart.
    pub fn stop(&mut self) {
        if self.running {
            info!("animation stopped after {} ticks", self.ticks);
        }
        self.running = false;
        self.last_frame = None;
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(StepMode::default())
    }
}
