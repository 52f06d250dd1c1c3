use std::num::NonZeroU32;
use std::sync::Arc;
use color_eyre::eyre::{eyre, OptionExt};
use color_eyre::Result;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;
use crate::renderer::config::RenderConfig;

/// Presentation target of the renderer, encapsulating the window, its GL
/// surface, and the context current on it
pub struct RenderTarget {
    pub window: Arc<Window>,

    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl RenderTarget {
    /// Open the window and make an OpenGL 3.3 core context current on it.
    ///
    /// Returns the target and a function loader bound to the new context.
    pub fn new(event_loop: &ActiveEventLoop, config: &RenderConfig) -> Result<(Self, glow::Context)> {
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, |configs| {
                // Prefer multisampled configs
                configs
                    .reduce(|best, candidate| {
                        if candidate.num_samples() > best.num_samples() { candidate } else { best }
                    })
                    .expect("the display always reports at least one matching config")
            })
            .map_err(|e| eyre!("Failed to create OpenGL display: {e}"))?;
        let window = Arc::new(window.ok_or_eyre("Display builder did not create a window")?);

        let raw_window_handle = window.window_handle()?.as_raw();
        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));
        let context = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };
        let context = context.make_current(&surface)?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("Failed to set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };
        log::info!(
            "Created {}x{} window with {} samples",
            window.inner_size().width,
            window.inner_size().height,
            gl_config.num_samples(),
        );

        Ok((Self { window, surface, context }, gl))
    }

    /// Zero-sized surfaces (a minimized window) are skipped
    pub fn resize(&self, size: PhysicalSize<u32>) {
        match (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            (Some(width), Some(height)) => self.surface.resize(&self.context, width, height),
            _ => log::warn!("Ignoring resize to {}x{}", size.width, size.height),
        }
    }

    pub fn present(&self) -> Result<()> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}
