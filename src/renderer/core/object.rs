use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{ObjectKind, RawHandle};
use crate::renderer::core::error::GlError;

/// Exclusive owner of one native driver object.
///
/// The object is created in `new` and deleted exactly once, either by an
/// explicit `dispose` or when the owner is dropped.
#[derive(Debug)]
pub struct GlObject {
    handle: RawHandle,
    kind: ObjectKind,
    disposed: bool,
    ctx: RenderContext,
}

impl GlObject {
    pub fn new(ctx: &RenderContext, kind: ObjectKind) -> Result<Self, GlError> {
        let device = ctx.device();
        let handle = match kind {
            ObjectKind::Buffer => device.create_buffer()?,
            ObjectKind::VertexArray => device.create_vertex_array()?,
            ObjectKind::Texture => device.create_texture()?,
            ObjectKind::Shader(stage) => device.create_shader(stage)?,
            ObjectKind::Program => device.create_program()?,
        };
        if handle == 0 {
            return Err(GlError::Allocation {
                kind,
                message: "driver returned the null handle".to_owned(),
            });
        }

        Ok(Self {
            handle,
            kind,
            disposed: false,
            ctx: ctx.clone(),
        })
    }

    /// Native handle, or `0` once disposed
    pub fn handle(&self) -> RawHandle {
        if self.disposed { 0 } else { self.handle }
    }

    pub fn has_valid_handle(&self) -> bool {
        self.handle() != 0
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Delete the native object. Calling this again is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let device = self.ctx.device();
        match self.kind {
            ObjectKind::Buffer => device.delete_buffer(self.handle),
            ObjectKind::VertexArray => device.delete_vertex_array(self.handle),
            ObjectKind::Texture => device.delete_texture(self.handle),
            ObjectKind::Shader(_) => device.delete_shader(self.handle),
            ObjectKind::Program => device.delete_program(self.handle),
        }
        log::trace!("Deleted {} {}", self.kind, self.handle);
    }
}

impl Drop for GlObject {
    fn drop(&mut self) {
        self.dispose();
    }
}
