use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use tracing::{error, info};

use self::controller::{Command, Controller, SpeedControl};
use self::view::View;
use crate::config::PendingLoad;
use crate::driver::{AnimationDriver, StepMode};
use crate::registry::BodyRegistry;

pub mod camera;
pub mod controller;
pub mod popup;
mod renderers;
mod view;

/// How the scene should be set up once the data file arrives.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    pub star_name: String,
    pub path_segments: usize,
    pub step_mode: StepMode,
    pub initial_speed: f64,
}

enum LoadState {
    Loading(PendingLoad),
    Ready(BodyRegistry),
    // The load or the registry build failed; stays empty for good
    Failed,
}

pub struct Simulation {
    view: View,
    controller: Controller,
    driver: AnimationDriver,
    load: LoadState,
    options: SceneOptions,
    torn_down: bool,
}

impl Simulation {
    pub fn new(pending: PendingLoad, options: SceneOptions, window: &mut Window) -> Self {
        Self {
            view: View::new(window),
            controller: Controller::new(SpeedControl::new(options.initial_speed)),
            driver: AnimationDriver::new(options.step_mode),
            load: LoadState::Loading(pending),
            options,
            torn_down: false,
        }
    }

    fn poll_load(&mut self, window: &mut Window) {
        let pending = match &mut self.load {
            LoadState::Loading(pending) => pending,
            _ => return,
        };
        let result = match pending.poll() {
            Some(result) => result,
            None => return,
        };

        let registry = result.map_err(|err| err.to_string()).and_then(|configs| {
            BodyRegistry::build_with_segments(
                configs,
                &self.options.star_name,
                self.options.path_segments,
            )
            .map_err(|err| err.to_string())
        });

        self.load = match registry {
            Ok(registry) => {
                info!("scene ready with {} bodies", registry.len());
                self.view.populate(window, &registry);
                LoadState::Ready(registry)
            }
            Err(err) => {
                error!("error loading data file: {}", err);
                LoadState::Failed
            }
        };
    }

    fn process_user_input(&mut self, window: &mut Window, mut events: EventManager) {
        for event in events.iter() {
            match self.controller.process_event(&event.value) {
                Some(Command::Click(screen)) => self.handle_click(window, screen),
                Some(Command::ClosePopup) => self.view.popup_mut().hide(),
                Some(Command::Quit) => self.teardown(window),
                None => {}
            }
        }
    }

    fn handle_click(&mut self, window: &Window, screen: nalgebra::Point2<f32>) {
        let registry = match &self.load {
            LoadState::Ready(registry) => registry,
            _ => return,
        };

        match self.view.pick(window, screen, registry) {
            Some(hit) => {
                info!("picked {} at distance {:.2}", hit.name, hit.distance);
                self.view.popup_mut().show(&hit, registry);
            }
            // Clicking away from the star dismisses the popup
            None => self.view.popup_mut().hide(),
        }
    }

    fn status(&self) -> String {
        match &self.load {
            LoadState::Loading(pending) => format!("Loading {}...", pending.path().display()),
            LoadState::Ready(_) => String::from("[,/.] speed  [space] pause  [Q] quit"),
            LoadState::Failed => String::from("No bodies loaded"),
        }
    }

    /// Stops the animation, clears the scene and closes the window.
    pub fn teardown(&mut self, window: &mut Window) {
        if self.torn_down {
            return;
        }
        self.driver.stop();
        self.view.teardown();
        self.torn_down = true;
        window.close();
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.poll_load(window);
        let events = window.events();
        self.process_user_input(window, events);
        if self.torn_down {
            return;
        }

        if let LoadState::Ready(registry) = &mut self.load {
            // Paused frames tick at zero speed to keep the elapsed-time clock current
            let speed = if self.controller.is_paused() {
                0.0
            } else {
                self.controller.speed().value()
            };
            self.driver.tick(registry, speed);
            self.view.update_scene_objects(registry);
        }

        let status = self.status();
        self.view.prerender_scene(window, &self.controller, &status);
        self.controller.increment_frame_counter();
    }
}
