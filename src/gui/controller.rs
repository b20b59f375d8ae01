use std::time::Instant;

use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use nalgebra::Point2;
use tracing::info;

// Key config, all in one place
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_SPEED_RESET: Key = Key::Key0;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_CLOSE_POPUP: Key = Key::Escape;
const KEY_QUIT: Key = Key::Q;

/// Cursor travel, in pixels, beyond which a press-and-release is a drag.
const CLICK_SLOP: f32 = 4.0;

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 5.0;
const SPEED_STEP: f64 = 0.1;

/// The speed multiplier, read by the animation driver every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedControl {
    value: f64,
}

impl SpeedControl {
    pub fn new(value: f64) -> Self {
        SpeedControl {
            value: Self::clamp(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set(&mut self, value: f64) {
        self.value = Self::clamp(value);
    }

    pub fn nudge(&mut self, steps: i32) {
        // Round to the step grid so repeated nudges don't accumulate error
        let value = self.value + SPEED_STEP * steps as f64;
        self.set((value / SPEED_STEP).round() * SPEED_STEP);
    }

    pub fn label(&self) -> String {
        format!("{:.1}x", self.value)
    }

    fn clamp(value: f64) -> f64 {
        if value.is_nan() {
            1.0
        } else {
            value.clamp(MIN_SPEED, MAX_SPEED)
        }
    }
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Things the user asked for that someone other than the controller acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// A left click (not a drag), in window pixels.
    Click(Point2<f32>),
    ClosePopup,
    Quit,
}

pub struct Controller {
    speed: SpeedControl,
    paused: bool,
    cursor: Point2<f32>,
    press_origin: Option<Point2<f32>>,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

impl Controller {
    pub fn new(speed: SpeedControl) -> Self {
        Controller {
            speed,
            paused: false,
            cursor: Point2::origin(),
            press_origin: None,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: &WindowEvent) -> Option<Command> {
        match *event {
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.speed.nudge(1);
                info!("speed is {}", self.speed.label());
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.speed.nudge(-1);
                info!("speed is {}", self.speed.label());
            }
            WindowEvent::Key(KEY_SPEED_RESET, Action::Press, _) => {
                self.speed.set(1.0);
                info!("speed is {}", self.speed.label());
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_CLOSE_POPUP, Action::Press, _) => return Some(Command::ClosePopup),
            WindowEvent::Key(KEY_QUIT, Action::Press, _) => return Some(Command::Quit),
            WindowEvent::CursorPos(x, y, _) => {
                self.cursor = Point2::new(x as f32, y as f32);
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                self.press_origin = Some(self.cursor);
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                // Dragging orbits the camera; only a still click picks
                let origin = self.press_origin.take()?;
                if (self.cursor - origin).norm() <= CLICK_SLOP {
                    return Some(Command::Click(self.cursor));
                }
            }
            _ => {}
        }
        None
    }

    pub fn speed(&self) -> &SpeedControl {
        &self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
