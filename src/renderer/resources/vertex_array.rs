use std::cell::RefCell;
use smallvec::SmallVec;
use crate::renderer::core::binding::{BindSlot, Bindable, SlotBindable};
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{AttribType, ObjectKind, RawHandle};
use crate::renderer::core::error::GlError;
use crate::renderer::core::object::GlObject;
use crate::renderer::resources::buffer::ARRAY_BUFFER_SLOT;
use crate::renderer::resources::program::ShaderProgram;

const VEC4_SIZE: i32 = 4 * size_of::<f32>() as i32;

/// How one shader input reads its values out of the bound array buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexPointer {
    pub components: i32,
    pub ty: AttribType,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
    /// `0` advances per vertex, `n` advances once every `n` instances
    pub divisor: u32,
}

impl VertexPointer {
    pub fn new(components: i32, ty: AttribType) -> Self {
        Self {
            components,
            ty,
            normalized: false,
            stride: 0,
            offset: 0,
            divisor: 0,
        }
    }

    pub fn floats(components: i32) -> Self {
        Self::new(components, AttribType::Float)
    }

    pub fn with_stride(mut self, stride: i32) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_divisor(mut self, divisor: u32) -> Self {
        self.divisor = divisor;
        self
    }
}

/// A pointer as it was issued, with the buffer it sources from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescribedPointer {
    pub location: u32,
    pub pointer: VertexPointer,
    pub source: RawHandle,
}

/// Vertex array object recording how buffer bytes feed shader inputs.
///
/// Pointers can only be described while the vertex array is bound, and each
/// one captures whichever array buffer is bound at that moment:
///
/// ```ignore
/// let _vao = vertex_array.bind()?;
/// {
///     let _vbo = vertices.bind()?;
///     vertex_array.describe_pointer(0, VertexPointer::floats(3).with_stride(32))?;
/// }
/// let _ibo = instances.bind()?;
/// vertex_array.describe_matrix_pointer(3, 64, 0, 1)?;
/// ```
pub struct VertexArray {
    object: GlObject,
    pointers: RefCell<SmallVec<[DescribedPointer; 8]>>,
}

impl VertexArray {
    pub fn new(ctx: &RenderContext) -> Result<Self, GlError> {
        Ok(Self {
            object: GlObject::new(ctx, ObjectKind::VertexArray)?,
            pointers: RefCell::new(SmallVec::new()),
        })
    }

    pub fn describe_pointer(&self, location: u32, pointer: VertexPointer) -> Result<(), GlError> {
        if !self.is_bound() {
            return Err(GlError::NotBound { kind: ObjectKind::VertexArray });
        }
        let source = self
            .object
            .context()
            .bindings()
            .occupant(&ARRAY_BUFFER_SLOT)
            .ok_or(GlError::NotBound { kind: ObjectKind::Buffer })?
            .handle;
        debug_assert!((1..=4).contains(&pointer.components), "a shader input holds at most 4 components");

        let device = self.object.context().device();
        device.enable_vertex_attrib_array(location);
        device.vertex_attrib_pointer(
            location,
            pointer.components,
            pointer.ty,
            pointer.normalized,
            pointer.stride,
            pointer.offset,
        );
        // Always written, so re-describing a location resets an earlier divisor
        device.vertex_attrib_divisor(location, pointer.divisor);

        self.pointers.borrow_mut().push(DescribedPointer { location, pointer, source });
        Ok(())
    }

    /// Same as `describe_pointer`, looking the input location up by name in a linked program
    pub fn describe_named_pointer(
        &self,
        program: &ShaderProgram,
        name: &str,
        pointer: VertexPointer,
    ) -> Result<(), GlError> {
        let location = program.require_attribute_location(name)?;
        self.describe_pointer(location, pointer)
    }

    /// Describe a 4x4 float matrix input.
    ///
    /// A single input location carries at most four components, so the matrix
    /// occupies four consecutive locations, one vec4 column each.
    pub fn describe_matrix_pointer(
        &self,
        location: u32,
        stride: i32,
        offset: i32,
        divisor: u32,
    ) -> Result<(), GlError> {
        for column in 0..4 {
            self.describe_pointer(
                location + column,
                VertexPointer::floats(4)
                    .with_stride(stride)
                    .with_offset(offset + column as i32 * VEC4_SIZE)
                    .with_divisor(divisor),
            )?;
        }
        Ok(())
    }

    pub fn describe_named_matrix_pointer(
        &self,
        program: &ShaderProgram,
        name: &str,
        stride: i32,
        offset: i32,
        divisor: u32,
    ) -> Result<(), GlError> {
        let location = program.require_attribute_location(name)?;
        self.describe_matrix_pointer(location, stride, offset, divisor)
    }

    /// Every pointer described so far, in issue order
    pub fn pointers(&self) -> Vec<DescribedPointer> {
        self.pointers.borrow().to_vec()
    }

    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

impl Bindable for VertexArray {
    fn object(&self) -> &GlObject {
        &self.object
    }

    fn bind_primitive(&self, _slot: &BindSlot) -> Result<(), GlError> {
        self.object.context().device().bind_vertex_array(self.object.handle());
        Ok(())
    }

    fn unbind_primitive(&self, _slot: &BindSlot) {
        self.object.context().device().bind_vertex_array(0);
    }
}

impl SlotBindable for VertexArray {
    const SLOT: BindSlot = BindSlot::Target("vertex_array");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::core::recording::{DeviceCall, RecordingDevice};
    use crate::renderer::resources::buffer::ArrayBuffer;
    use glam::Mat4;

    fn setup() -> (RecordingDevice, RenderContext) {
        let device = RecordingDevice::new();
        let ctx = RenderContext::new(device.clone());
        (device, ctx)
    }

    #[test]
    fn describe_requires_bound_vertex_array() {
        let (_device, ctx) = setup();
        let vertex_array = VertexArray::new(&ctx).unwrap();
        let buffer = ArrayBuffer::with_data(&ctx, vec![0.0_f32; 3]).unwrap();
        let _vbo = buffer.bind().unwrap();

        let err = vertex_array.describe_pointer(0, VertexPointer::floats(3)).unwrap_err();

        assert_eq!(err, GlError::NotBound { kind: ObjectKind::VertexArray });
        assert!(vertex_array.pointers().is_empty());
    }

    #[test]
    fn describe_requires_source_buffer() {
        let (_device, ctx) = setup();
        let vertex_array = VertexArray::new(&ctx).unwrap();
        let _vao = vertex_array.bind().unwrap();

        let err = vertex_array.describe_pointer(0, VertexPointer::floats(3)).unwrap_err();

        assert_eq!(err, GlError::NotBound { kind: ObjectKind::Buffer });
    }

    #[test]
    fn pointers_capture_the_buffer_bound_at_call_time() {
        let (device, ctx) = setup();
        let vertex_array = VertexArray::new(&ctx).unwrap();
        let vertices = ArrayBuffer::with_data(&ctx, vec![0.0_f32; 16]).unwrap();
        let colors = ArrayBuffer::with_data(&ctx, vec![0.0_f32; 16]).unwrap();

        {
            let _vao = vertex_array.bind().unwrap();
            {
                let _vbo = vertices.bind().unwrap();
                vertex_array
                    .describe_pointer(0, VertexPointer::floats(3).with_stride(20))
                    .unwrap();
                vertex_array
                    .describe_pointer(1, VertexPointer::floats(2).with_stride(20).with_offset(12))
                    .unwrap();
            }
            let _cbo = colors.bind().unwrap();
            vertex_array.describe_pointer(2, VertexPointer::floats(4)).unwrap();
        }

        let sources: Vec<_> = vertex_array.pointers().iter().map(|p| (p.location, p.source)).collect();
        assert_eq!(sources, vec![
            (0, vertices.object().handle()),
            (1, vertices.object().handle()),
            (2, colors.object().handle()),
        ]);
        assert_eq!(device.count(|c| matches!(c, DeviceCall::VertexAttribDivisor { divisor: 0, .. })), 3);
        assert_eq!(ctx.bindings().held_count(), 0);
    }

    #[test]
    fn instanced_matrix_expands_to_four_columns() {
        let (device, ctx) = setup();
        let vertex_array = VertexArray::new(&ctx).unwrap();
        let instances = ArrayBuffer::with_data(&ctx, vec![Mat4::IDENTITY; 4]).unwrap();
        let stride = size_of::<Mat4>() as i32;

        let _vao = vertex_array.bind().unwrap();
        let _ibo = instances.bind().unwrap();
        device.clear_calls();
        vertex_array.describe_matrix_pointer(3, stride, 0, 1).unwrap();

        let pointers: Vec<_> = device
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                DeviceCall::VertexAttribPointer { location, components, stride, offset, .. } => {
                    Some((location, components, stride, offset))
                }
                _ => None,
            })
            .collect();
        assert_eq!(pointers, vec![(3, 4, 64, 0), (4, 4, 64, 16), (5, 4, 64, 32), (6, 4, 64, 48)]);
        assert_eq!(device.count(|c| matches!(c, DeviceCall::VertexAttribDivisor { divisor: 1, .. })), 4);
        assert_eq!(device.count(|c| matches!(c, DeviceCall::EnableVertexAttribArray(_))), 4);
    }

    #[test]
    fn redescribing_a_location_resets_its_divisor() {
        let (device, ctx) = setup();
        let vertex_array = VertexArray::new(&ctx).unwrap();
        let buffer = ArrayBuffer::with_data(&ctx, vec![0.0_f32; 16]).unwrap();

        let _vao = vertex_array.bind().unwrap();
        let _vbo = buffer.bind().unwrap();
        vertex_array.describe_pointer(3, VertexPointer::floats(4).with_divisor(1)).unwrap();
        vertex_array.describe_pointer(3, VertexPointer::floats(4)).unwrap();

        let divisors: Vec<_> = device
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                DeviceCall::VertexAttribDivisor { location, divisor } => Some((location, divisor)),
                _ => None,
            })
            .collect();
        assert_eq!(divisors, vec![(3, 1), (3, 0)]);
        assert_eq!(vertex_array.pointers().last().map(|p| p.pointer.divisor), Some(0));
    }
}
