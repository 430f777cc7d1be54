//! aoview - Ambient Occlusion Viewer
//!
//! Builds a scene mesh, samples per-vertex ambient occlusion progressively
//! while the window stays responsive, then shows the result under a
//! trackball camera.

use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use aoview::config::AppConfig;
use aoview::input::{InputAction, InputMapper};
use aoview::scene::build_scene_mesh;
use aoview::systems::{ComputePoll, ComputeSystem, RenderSystem, WindowSystem};
use aoview_core::Mesh;
use aoview_input::{wheel_delta, CameraController};
use aoview_render::RenderError;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window_system: Option<WindowSystem>,
    render_system: Option<RenderSystem>,
    /// Active until the occlusion values are in
    compute: Option<ComputeSystem>,
    /// Scene mesh, held until it is uploaded
    mesh: Option<Mesh>,
    controller: CameraController,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let camera = &config.camera;
        let controller = CameraController::new()
            .with_zoom_range(camera.min_zoom, camera.max_zoom)
            .with_zoom(camera.initial_zoom)
            .with_rotate_speed(camera.rotate_speed)
            .with_initial_spin(camera.initial_spin[0], camera.initial_spin[1]);

        Self {
            config,
            window_system: None,
            render_system: None,
            compute: None,
            mesh: None,
            controller,
        }
    }

    /// Create the window, GPU context, scene mesh, and compute system
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let window_system = WindowSystem::create(event_loop, &self.config.window)?;
        let mut render_system = RenderSystem::new(
            window_system.window().clone(),
            self.config.rendering.clone(),
            &self.config.camera,
            self.config.window.vsync,
        )?;
        self.controller.apply(render_system.camera_mut());

        let mesh = build_scene_mesh(&self.config.mesh)?;

        let status = window_system.title_sink();
        let progress = window_system.title_sink();
        let compute = ComputeSystem::for_mesh(
            &mesh,
            &self.config.sampler,
            Box::new(move |s: &str| status.set_status(s)),
            Box::new(move |p: f32| progress.set_progress(p)),
        )?;

        window_system.request_redraw();
        self.window_system = Some(window_system);
        self.render_system = Some(render_system);
        self.compute = Some(compute);
        self.mesh = Some(mesh);
        Ok(())
    }

    /// Advance sampling by one slice; upload the result when it completes
    fn advance_compute(&mut self, event_loop: &ActiveEventLoop) {
        let Some(compute) = &mut self.compute else {
            return;
        };

        match compute.poll() {
            Ok(ComputePoll::Pending) => {}
            Ok(ComputePoll::Ready(ao)) => {
                self.compute = None;
                let mesh = self.mesh.take();
                if let (Some(render_system), Some(mesh)) = (&mut self.render_system, mesh) {
                    if let Err(e) = render_system.upload(&mesh, &ao) {
                        log::error!("Failed to upload mesh: {}", e);
                        event_loop.exit();
                        return;
                    }
                }
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Err(e) => {
                log::error!("Ambient occlusion failed: {}", e);
                self.compute = None;
                event_loop.exit();
            }
        }
    }

    /// Push the controller state into the camera and schedule a render
    fn camera_changed(&mut self) {
        if let Some(render_system) = &mut self.render_system {
            self.controller.apply(render_system.camera_mut());
        }
        if let Some(window_system) = &self.window_system {
            window_system.request_redraw();
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window_system), Some(render_system)) =
            (&self.window_system, &mut self.render_system)
        else {
            return;
        };

        match render_system.render_frame(window_system.inner_size()) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => render_system.reconfigure(),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Frame skipped: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_system.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("Startup failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                if let Some(window_system) = &self.window_system {
                    window_system.request_redraw();
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(key), state, .. },
                ..
            } => match InputMapper::map_keyboard(key, state) {
                Some(InputAction::Exit) => event_loop.exit(),
                Some(InputAction::ResetCamera) => {
                    self.controller.reset();
                    self.camera_changed();
                }
                None => {}
            },

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                if self.controller.process_cursor_moved(position.x, position.y) {
                    self.camera_changed();
                }
            }

            WindowEvent::CursorLeft { .. } => self.controller.process_cursor_left(),

            WindowEvent::MouseWheel { delta, .. } => {
                if self.controller.process_scroll(wheel_delta(delta)) {
                    self.camera_changed();
                }
            }

            WindowEvent::RedrawRequested => {
                if self.compute.is_some() {
                    self.advance_compute(event_loop);
                }

                self.render(event_loop);

                // Keep stepping once per display refresh until sampling ends
                if self.compute.is_some() {
                    if let Some(window_system) = &self.window_system {
                        window_system.request_redraw();
                    }
                }
            }

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting aoview");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
