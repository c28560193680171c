//! Application Shell
//!
//! The winit event loop, the frame driver that ties asset loading, input,
//! animation and rendering together, and the headless [`Stage`] holding the
//! world state.

pub mod input;
pub mod stage;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use crate::assets::{self, LoadEvent};
use crate::errors::Result;
use crate::render::Renderer;
use crate::scene::Transform;
use crate::settings::ViewerSettings;
use crate::utils::{OrbitControls, Timer};

pub use input::Input;
pub use stage::Stage;

/// The viewer application. Owns the window, the renderer and the stage, and
/// drives one frame per `RedrawRequested`.
pub struct App {
    stage: Stage,
    input: Input,
    timer: Timer,

    orbit: OrbitControls,
    camera_transform: Transform,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    loads: Option<flume::Receiver<LoadEvent>>,
}

impl App {
    #[must_use]
    pub fn new(settings: ViewerSettings) -> Self {
        let mut orbit = OrbitControls::new(settings.orbit_target, 1.0);
        orbit.min_distance = settings.orbit_min_distance;
        orbit.max_distance = settings.orbit_max_distance;

        // Express the initial camera position in orbit coordinates.
        let offset = settings.camera_position - settings.orbit_target;
        orbit.radius = offset.length().max(settings.orbit_min_distance);
        orbit.phi = (offset.y / orbit.radius).clamp(-1.0, 1.0).acos();
        orbit.theta = offset.x.atan2(offset.z);

        let mut input = Input::new();
        input.handle_resize(settings.width, settings.height);

        Self {
            stage: Stage::new(settings),
            input,
            timer: Timer::new(),
            orbit,
            camera_transform: Transform::new(),
            window: None,
            renderer: None,
            loads: None,
        }
    }

    /// Runs the event loop until the window closes. Blocks the calling
    /// thread.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn drain_loads(&mut self) {
        if let Some(rx) = &self.loads {
            let mut finished = Vec::new();
            while let Ok(event) = rx.try_recv() {
                finished.push(event);
            }
            for event in finished {
                self.stage.apply_load(event);
            }
        }
    }

    /// One frame: integrate finished loads, advance time, apply input to
    /// the camera, step the world, render.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.drain_loads();

        self.timer.tick();
        let dt = self.timer.dt_seconds();

        self.orbit.update(
            &mut self.camera_transform,
            &self.input,
            self.stage.camera.fov_degrees(),
            dt,
        );
        self.camera_transform.update_local_matrix();
        self.stage
            .camera
            .update_view_projection(self.camera_transform.local_matrix());

        self.stage.update(dt);
        self.input.end_frame();

        if let Some(renderer) = &mut self.renderer {
            match renderer.render(&self.stage.scene, &self.stage.camera) {
                Ok(()) => {}
                // The surface comes back after a reconfigure at the current size.
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (width, height) = self.stage.viewport;
                    renderer.resize(width, height);
                }
                Err(err) => {
                    log::error!("fatal surface error: {err}");
                    event_loop.exit();
                }
            }
        }
    }

    fn handle_key(&mut self, event: &winit::event::KeyEvent) {
        if !event.state.is_pressed() || event.repeat {
            return;
        }
        let Key::Character(text) = &event.logical_key else {
            return;
        };
        if let Some(clip) = self.stage.settings().clip_for_key(text.as_str()) {
            let clip = clip.to_string();
            self.stage.select_clip(&clip);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let settings = self.stage.settings();
        let attributes = Window::default_attributes()
            .with_title(&settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(settings.width),
                f64::from(settings.height),
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.stage.handle_resize(size.width.max(1), size.height.max(1));
        self.input.handle_resize(size.width, size.height);

        log::info!("initializing renderer");
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
        ));
        match renderer {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(err) => {
                log::error!("fatal renderer error: {err}");
                event_loop.exit();
                return;
            }
        }

        let settings = self.stage.settings();
        self.loads = Some(assets::spawn_loads(
            settings.environment_path.clone(),
            settings.character_path.clone(),
        ));

        self.window = Some(window);
        self.timer = Timer::new();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                let (width, height) = (size.width.max(1), size.height.max(1));
                self.stage.handle_resize(width, height);
                self.input.handle_resize(width, height);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(width, height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),

            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_move(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_input(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.handle_mouse_wheel(delta);
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
