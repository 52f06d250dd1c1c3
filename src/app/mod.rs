mod camera_controller;
mod frame_stats;
mod input_state;

use super::renderer::Renderer;
use color_eyre::Result;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;
use crate::app::camera_controller::CameraController;
use crate::app::frame_stats::FrameStats;
use crate::app::input_state::InputState;
use crate::renderer::config::RenderConfig;
use crate::renderer::core::glow_device::GlowDevice;
use crate::renderer::target::RenderTarget;

pub struct App {
    config: RenderConfig,
    // Fields drop in order: GL objects must be deleted while the context is alive
    renderer: Option<Renderer>,
    target: Option<RenderTarget>,
    camera_controller: CameraController,

    // State
    input_state: InputState,
    frame_stats: FrameStats,
    prev_frame_time: Instant,
    request_redraws: bool,
    close_requested: bool,
}

impl App {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(RenderConfig::default()))
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            renderer: None,
            target: None,
            camera_controller: CameraController::new(),

            input_state: InputState::default(),
            frame_stats: FrameStats::default(),
            prev_frame_time: Instant::now(),
            request_redraws: true,
            close_requested: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(self)?;
        Ok(())
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (target, gl) = RenderTarget::new(event_loop, &self.config)?;
        let size = target.window.inner_size();
        let renderer = Renderer::new(GlowDevice::new(gl), &self.config, (size.width, size.height))?;

        self.target = Some(target);
        self.renderer = Some(renderer);
        self.prev_frame_time = Instant::now();
        Ok(())
    }

    /// Delete every GL object while the context is still current, then
    /// release the window and context
    fn shutdown(&mut self) {
        self.renderer = None;
        self.target = None;
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(target), Some(renderer)) = (&self.target, &mut self.renderer) else {
            return Ok(());
        };

        let curr_frame_time = Instant::now();
        let delta_time = curr_frame_time.duration_since(self.prev_frame_time);
        self.prev_frame_time = curr_frame_time;

        self.camera_controller.process_input(
            &self.input_state,
            renderer.camera_mut(),
            delta_time.as_secs_f32(),
        );
        self.input_state.reset_frame();

        renderer.draw()?;
        target.present()?;

        self.frame_stats.record(delta_time.as_secs_f64());
        target.window.set_title(&self.frame_stats.title(&self.config.title));
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.target.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Failed to initialize renderer: {e:?}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent
    ) {
        if self.target.as_ref().is_none_or(|t| t.window.id() != window_id) {
            return;
        }

        self.input_state.process_window_events(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(target) = &self.target {
                    target.resize(new_size);
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::error!("Frame failed: {e:?}");
                    self.close_requested = true;
                }
            }
            WindowEvent::KeyboardInput {
                event:
                KeyEvent {
                    logical_key: key,
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => match key.as_ref() {
                Key::Character("r") => {
                    self.request_redraws = !self.request_redraws;
                    log::info!("request_redraws: {}", self.request_redraws);
                }
                Key::Named(NamedKey::Escape) => {
                    self.close_requested = true;
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.request_redraws {
            if let Some(target) = &self.target {
                target.window.request_redraw();
            }
        }

        if self.close_requested {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
