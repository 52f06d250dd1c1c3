use std::path::Path;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crate::renderer::core::binding::{BindGuard, BindSlot, Bindable};
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{rgba8_len, ObjectKind, SamplerParams, TextureTarget, TextureUnit};
use crate::renderer::core::error::GlError;
use crate::renderer::core::object::GlObject;

/// 2D color texture.
///
/// Textures are not keyed on their kind: the same texture may sit on unit 0
/// one frame and unit 3 the next, next to other textures on other units. They
/// are bound through `bind_to`, which keys the slot on the target and unit.
pub struct ColorTexture {
    object: GlObject,
    width: u32,
    height: u32,
}

impl ColorTexture {
    /// Decode an image file and upload it as RGBA8
    pub fn from_file(ctx: &RenderContext, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .wrap_err_with(|| format!("Failed to load texture image {}", path.display()))?;
        let texture = Self::from_image(ctx, &image)?;
        log::debug!(
            "Loaded texture {} ({}x{}) from {}",
            texture.object.handle(),
            texture.width,
            texture.height,
            path.display(),
        );
        Ok(texture)
    }

    pub fn from_image(ctx: &RenderContext, image: &image::DynamicImage) -> Result<Self, GlError> {
        let data = image.to_rgba8();
        Self::from_rgba8(ctx, data.width(), data.height(), data.as_raw())
    }

    /// Upload tightly packed RGBA8 pixels as a single level, then generate
    /// mipmaps. Sampling is linear with repeat wrapping.
    pub fn from_rgba8(
        ctx: &RenderContext,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, GlError> {
        if rgba8_len(width, height) != Some(pixels.len()) {
            return Err(GlError::PixelData { width, height, len: pixels.len() });
        }

        let texture = Self {
            object: GlObject::new(ctx, ObjectKind::Texture)?,
            width,
            height,
        };

        {
            let target = TextureTarget::Texture2D;
            let _bound = texture.bind_to(target, TextureUnit(0))?;
            let device = ctx.device();
            device.tex_image_2d_rgba8(target, width, height, pixels);
            device.set_sampler_params(target, SamplerParams::default());
            device.generate_mipmap(target);
        }

        Ok(texture)
    }

    pub fn bind_to(&self, target: TextureTarget, unit: TextureUnit) -> Result<BindGuard<'_>, GlError> {
        BindGuard::acquire(self, BindSlot::TextureUnit { target, unit })
    }

    pub fn is_bound_to(&self, target: TextureTarget, unit: TextureUnit) -> bool {
        self.object
            .context()
            .bindings()
            .is_bound(&BindSlot::TextureUnit { target, unit }, &self.object)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

impl Bindable for ColorTexture {
    fn object(&self) -> &GlObject {
        &self.object
    }

    fn bind_primitive(&self, slot: &BindSlot) -> Result<(), GlError> {
        if let BindSlot::TextureUnit { target, unit } = *slot {
            let device = self.object.context().device();
            device.active_texture(unit);
            device.bind_texture(target, self.object.handle());
        }
        Ok(())
    }

    fn unbind_primitive(&self, slot: &BindSlot) {
        if let BindSlot::TextureUnit { target, unit } = *slot {
            let device = self.object.context().device();
            device.active_texture(unit);
            device.bind_texture(target, 0);
        }
    }
}
