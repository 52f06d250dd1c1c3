pub mod camera;
pub mod config;
pub mod core;
pub mod resources;
pub mod scene;
pub mod target;
pub mod util;

mod shader_data;

use color_eyre::Result;
use glam::Vec3;
use crate::renderer::camera::Camera;
use crate::renderer::config::{RenderConfig, ResourcePaths};
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::RenderDevice;
use crate::renderer::core::error::GlError;
use crate::renderer::scene::BlockScene;

pub struct Renderer {
    ctx: RenderContext,
    scene: BlockScene,
    camera: Camera,
}

impl Renderer {
    const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 3.0);

    pub fn new(
        device: impl RenderDevice + 'static,
        config: &RenderConfig,
        size: (u32, u32),
    ) -> Result<Self> {
        let ctx = RenderContext::new(device);
        let paths = ResourcePaths::resolve(config);
        let scene = BlockScene::load(&ctx, config, &paths)?;
        Ok(Self::with_scene(ctx, scene, config, size))
    }

    pub fn with_scene(
        ctx: RenderContext,
        scene: BlockScene,
        config: &RenderConfig,
        (width, height): (u32, u32),
    ) -> Self {
        let device = ctx.device();
        device.clear_color(config.clear_color);
        device.enable_depth_test();

        let mut renderer = Self {
            camera: Camera::new(Self::CAMERA_START, 1.0),
            ctx,
            scene,
        };
        renderer.resize(width, height);
        renderer
    }

    /// Match the viewport and the camera's aspect ratio to the surface.
    /// Zero-sized surfaces (a minimized window) leave both unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.device().viewport(0, 0, width as i32, height as i32);
        self.camera.set_aspect_ratio(width as f32 / height as f32);
    }

    pub fn draw(&mut self) -> Result<(), GlError> {
        self.ctx.device().clear(true, true);

        self.scene
            .lights_mut()
            .attach_flashlight(self.camera.get_position(), self.camera.get_front());
        self.scene.render(&self.camera.get_uniforms())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn scene(&self) -> &BlockScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut BlockScene {
        &mut self.scene
    }
}
