//! Application shell: window, paint loop, and the per-tick cycle.
//!
//! The winit event loop is the paint-loop primitive; every
//! `RedrawRequested` runs one tick of the cycle:
//! resolve pending assets, flush buffered camera input, advance the
//! animation driver with the elapsed time since the first tick, upload
//! uniforms, render, and schedule the next tick from `about_to_wait`.

use std::sync::Arc;
use std::time::Instant;

use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::animation::AnimationDriver;
use crate::assets::{AssetEvent, AssetGateway, LoadedModel};
use crate::gfx::{
    camera::{CameraController, Viewport},
    rendering::RenderEngine,
    resources::texture_store::TextureHandle,
    scene::{ObjectId, Scene},
};

// The paint cycle state machine: Uninitialized until the window and the
// render backend exist, Running for the rest of the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Uninitialized,
    Running,
}

pub struct WhirlApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    viewport: Viewport,
    controller: CameraController,
    gateway: AssetGateway,
    animation: AnimationDriver,
    started_at: Option<Instant>,
    loop_state: LoopState,
}

impl WhirlApp {
    /// Create a new Whirl application with default settings
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        let controller = CameraController::new(0.005, 0.1);

        Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                render_engine: None,
                scene: Scene::new(),
                viewport,
                controller,
                gateway: AssetGateway::new(),
                animation: AnimationDriver::new(),
                started_at: None,
                loop_state: LoopState::Uninitialized,
            },
        }
    }

    /// The scene under construction
    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    /// Mutable access to the scene for setup
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.state.scene
    }

    /// Mutable access to the orbit viewport
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.state.viewport
    }

    /// Mutable access to the animation driver
    pub fn animation_mut(&mut self) -> &mut AnimationDriver {
        &mut self.state.animation
    }

    /// Requests a texture load; see [`AssetGateway::load_texture`]
    pub fn load_texture(&mut self, path: impl Into<std::path::PathBuf>) -> TextureHandle {
        self.state
            .gateway
            .load_texture(path, &mut self.state.scene)
    }

    /// Requests a model load that attaches to the scene on completion
    pub fn load_model(
        &mut self,
        mtl_path: impl Into<std::path::PathBuf>,
        obj_path: impl Into<std::path::PathBuf>,
    ) {
        self.state
            .gateway
            .load_model(mtl_path, obj_path, |scene, model| scene.attach_model(model));
    }

    /// Requests a model load with a custom attachment step
    pub fn load_model_with<F>(
        &mut self,
        mtl_path: impl Into<std::path::PathBuf>,
        obj_path: impl Into<std::path::PathBuf>,
        on_attached: F,
    ) where
        F: FnOnce(&mut Scene, LoadedModel) -> ObjectId + 'static,
    {
        self.state.gateway.load_model(mtl_path, obj_path, on_attached);
    }

    /// Run the application (consumes self and starts the event loop)
    ///
    /// Returns when the window is closed or Escape is pressed; backend
    /// resources are released on drop.
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.state)
            .expect("Failed to run event loop");
    }
}

impl Default for WhirlApp {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    // One paint tick; see the module docs for the cycle order.
    fn frame(&mut self) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        // 1. Resolve pending assets and surface their outcomes to the log
        for event in self.gateway.poll(&mut self.scene) {
            match event {
                AssetEvent::TextureLoaded { path, .. } => {
                    log::info!("texture ready: {}", path.display());
                }
                AssetEvent::TextureFailed { path, error } => {
                    log::warn!("texture load failed ({}): {}", path.display(), error);
                }
                AssetEvent::ModelAttached { path, .. } => {
                    log::info!("model attached from {}", path.display());
                }
                AssetEvent::ModelFailed { path, error } => {
                    log::warn!("model load failed ({}): {}", path.display(), error);
                }
            }
        }

        // 2. Apply buffered camera input
        self.controller.flush(&mut self.viewport);

        // 3. Advance animation from time elapsed since the first tick
        let elapsed = match self.started_at {
            Some(started_at) => started_at.elapsed().as_secs_f32(),
            None => {
                self.started_at = Some(Instant::now());
                0.0
            }
        };
        self.animation.tick(&mut self.scene, elapsed);

        // 4. Upload per-frame uniforms and draw
        self.viewport.update_view_proj();
        render_engine.update(self.viewport.uniform, &self.scene.lights);
        render_engine.render_frame(&mut self.scene);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default().with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.viewport.resize(width, height);
            self.render_engine = Some(renderer);
            self.loop_state = LoopState::Running;
            log::info!("paint loop running");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.viewport.resize(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        // Input is buffered here and applied once per tick in frame()
        self.controller.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.loop_state != LoopState::Running {
            return;
        }
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
