//! Window driver.
//!
//! Hosts the winit application: creates the window, brings up the GPU, and
//! routes window events into the simulation. Key binds cover the UI action
//! hooks: `M` switches material, `A` adds an attractor at a random spot,
//! `R` toggles the secondary camera, `P` toggles the preview pane, and
//! `Space` pauses/resumes the frame chain. Right-click places an attractor
//! at the pointer.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::attractors::DEFAULT_MAX_ATTRACTORS;
use crate::gpu::GpuState;
use crate::input::{MouseButton, PointerTracker};
use crate::scene::Scene;

pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Scene,
    pointer: PointerTracker,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            scene: Scene::new(1280, 720),
            pointer: PointerTracker::new(1280, 720),
        }
    }

    fn toggle_pause(&mut self) {
        if self.scene.clock.is_running() {
            self.scene.clock.pause();
        } else {
            self.scene.clock.resume();
            // The redraw chain stops while paused; restart it.
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("wavetank")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

            let window = match event_loop.create_window(window_attrs) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    log::error!("window creation failed: {}", e);
                    event_loop.exit();
                    return;
                }
            };
            self.window = Some(window.clone());

            let size = window.inner_size();
            self.scene.resize(size.width, size.height);
            self.pointer.set_window_size(size.width, size.height);

            match pollster::block_on(GpuState::new(window, DEFAULT_MAX_ATTRACTORS)) {
                Ok(gpu) => self.gpu = Some(gpu),
                Err(e) => {
                    log::error!("GPU initialization failed: {}", e);
                    event_loop.exit();
                    return;
                }
            }

            self.scene.clock.start();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                self.scene.resize(physical_size.width, physical_size.height);
                self.pointer
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer
                    .cursor_moved(position.x as f32, position.y as f32);
                self.scene.pointer_moved(self.pointer.ndc());
            }

            WindowEvent::CursorLeft { .. } => {
                self.scene.pointer_out();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(button);
                let ndc = self.pointer.ndc();
                match state {
                    ElementState::Pressed => {
                        self.scene.pointer_down(button, ndc);
                    }
                    ElementState::Released => match button {
                        MouseButton::Right => self.scene.right_click(ndc),
                        _ => self.scene.pointer_up(button, ndc),
                    },
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        match code {
                            KeyCode::KeyM => self.scene.switch_material(),
                            KeyCode::KeyA => self.scene.add_attractor(None),
                            KeyCode::KeyR => self.scene.toggle_reflection(),
                            KeyCode::KeyP => self.scene.toggle_preview(),
                            KeyCode::Space => self.toggle_pause(),
                            _ => {}
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.scene.clock.is_running() {
                    return;
                }
                self.scene.step(Instant::now());

                if let Some(gpu) = &mut self.gpu {
                    match gpu.render(&self.scene) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            gpu.resize(winit::dpi::PhysicalSize {
                                width: gpu.config.width,
                                height: gpu.config.height,
                            });
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::warn!("render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
