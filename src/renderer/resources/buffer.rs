use bytemuck::Pod;
use crate::renderer::core::binding::{BindSlot, Bindable, SlotBindable};
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{BufferTarget, BufferUsage, ObjectKind};
use crate::renderer::core::error::GlError;
use crate::renderer::core::object::GlObject;

/// Slot shared by every array buffer, whatever its element type
pub const ARRAY_BUFFER_SLOT: BindSlot = BindSlot::Target("array_buffer");

/// Vertex attribute source buffer holding tightly packed `T`s.
///
/// `data` is the CPU-side snapshot of what the buffer should contain. It is
/// only sent to the driver by `commit`, so it may be assigned before or after
/// the buffer is wired into a vertex array.
pub struct ArrayBuffer<T: Pod> {
    object: GlObject,
    data: Option<Vec<T>>,
    usage: BufferUsage,
}

impl<T: Pod> ArrayBuffer<T> {
    pub fn new(ctx: &RenderContext) -> Result<Self, GlError> {
        Ok(Self {
            object: GlObject::new(ctx, ObjectKind::Buffer)?,
            data: None,
            usage: BufferUsage::default(),
        })
    }

    pub fn with_data(ctx: &RenderContext, data: Vec<T>) -> Result<Self, GlError> {
        let mut buffer = Self::new(ctx)?;
        buffer.set_data(data);
        Ok(buffer)
    }

    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// Replace the snapshot. Nothing reaches the driver until `commit`.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = Some(data);
    }

    /// Number of elements in the snapshot
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn set_usage(&mut self, usage: BufferUsage) {
        self.usage = usage;
    }

    /// Upload the whole snapshot, binding the buffer for the duration of the call.
    ///
    /// A missing or empty snapshot is not an error; the call does nothing.
    pub fn commit(&self) -> Result<(), GlError> {
        let Some(data) = self.data.as_deref().filter(|d| !d.is_empty()) else {
            return Ok(());
        };

        let _bound = self.bind()?;
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.object
            .context()
            .device()
            .buffer_data(BufferTarget::Array, bytes, self.usage);
        log::debug!(
            "Committed {} bytes ({} elements) to buffer {}",
            bytes.len(),
            data.len(),
            self.object.handle(),
        );

        Ok(())
    }

    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

impl<T: Pod> Bindable for ArrayBuffer<T> {
    fn object(&self) -> &GlObject {
        &self.object
    }

    fn bind_primitive(&self, _slot: &BindSlot) -> Result<(), GlError> {
        self.object
            .context()
            .device()
            .bind_buffer(BufferTarget::Array, self.object.handle());
        Ok(())
    }

    fn unbind_primitive(&self, _slot: &BindSlot) {
        self.object.context().device().bind_buffer(BufferTarget::Array, 0);
    }
}

impl<T: Pod> SlotBindable for ArrayBuffer<T> {
    const SLOT: BindSlot = ARRAY_BUFFER_SLOT;
}
