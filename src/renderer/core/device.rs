use std::fmt;
use crate::renderer::core::error::GlError;

/// Native object name handed out by the driver. `0` is never a live object.
pub type RawHandle = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// Kinds of native objects, used to dispatch the matching delete call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    VertexArray,
    Texture,
    Shader(ShaderStage),
    Program,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer => f.write_str("buffer"),
            Self::VertexArray => f.write_str("vertex array"),
            Self::Texture => f.write_str("texture"),
            Self::Shader(stage) => write!(f, "{stage} shader"),
            Self::Program => f.write_str("shader program"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    #[default]
    StaticDraw,
    /// Re-uploaded frequently
    DynamicDraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
}

impl fmt::Display for TextureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Texture2D => f.write_str("TEXTURE_2D"),
        }
    }
}

/// Texture image unit, `TextureUnit(0)` being `GL_TEXTURE0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureUnit(pub u32);

impl fmt::Display for TextureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TEXTURE{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerParams {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
        }
    }
}

/// Numeric type of a vertex attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribType {
    Float,
    Int,
    UnsignedInt,
    UnsignedByte,
}

impl AttribType {
    pub fn size_bytes(&self) -> i32 {
        match self {
            Self::Float | Self::Int | Self::UnsignedInt => 4,
            Self::UnsignedByte => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Triangles,
}

/// One entry of a linked program's active uniform table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    pub name: String,
    pub location: i32,
}

/// Byte length of a tightly packed RGBA8 image, or `None` when the size is
/// empty or too large for the driver
pub fn rgba8_len(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 || i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return None;
    }
    usize::try_from(width).ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(4)
}

/// The slice of a stateful graphics driver that the binding layer drives.
///
/// Every call is synchronous and must be made from the thread that owns the
/// current context. Methods taking a handle expect a live object created by
/// the same device.
pub trait RenderDevice {
    // Buffers
    fn create_buffer(&self) -> Result<RawHandle, GlError>;
    fn delete_buffer(&self, buffer: RawHandle);
    /// Binding `0` clears the target
    fn bind_buffer(&self, target: BufferTarget, buffer: RawHandle);
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    // Vertex arrays
    fn create_vertex_array(&self) -> Result<RawHandle, GlError>;
    fn delete_vertex_array(&self, vertex_array: RawHandle);
    fn bind_vertex_array(&self, vertex_array: RawHandle);
    fn enable_vertex_attrib_array(&self, location: u32);
    fn vertex_attrib_pointer(
        &self,
        location: u32,
        components: i32,
        ty: AttribType,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn vertex_attrib_divisor(&self, location: u32, divisor: u32);

    // Textures
    fn create_texture(&self) -> Result<RawHandle, GlError>;
    fn delete_texture(&self, texture: RawHandle);
    fn active_texture(&self, unit: TextureUnit);
    fn bind_texture(&self, target: TextureTarget, texture: RawHandle);
    fn tex_image_2d_rgba8(&self, target: TextureTarget, width: u32, height: u32, pixels: &[u8]);
    fn set_sampler_params(&self, target: TextureTarget, params: SamplerParams);
    fn generate_mipmap(&self, target: TextureTarget);

    // Shaders
    fn create_shader(&self, stage: ShaderStage) -> Result<RawHandle, GlError>;
    fn delete_shader(&self, shader: RawHandle);
    fn shader_source(&self, shader: RawHandle, source: &str);
    fn compile_shader(&self, shader: RawHandle);
    fn shader_compile_status(&self, shader: RawHandle) -> bool;
    fn shader_info_log(&self, shader: RawHandle) -> String;

    // Programs
    fn create_program(&self) -> Result<RawHandle, GlError>;
    fn delete_program(&self, program: RawHandle);
    fn attach_shader(&self, program: RawHandle, shader: RawHandle);
    fn detach_shader(&self, program: RawHandle, shader: RawHandle);
    fn link_program(&self, program: RawHandle);
    fn program_link_status(&self, program: RawHandle) -> bool;
    fn program_info_log(&self, program: RawHandle) -> String;
    fn active_uniforms(&self, program: RawHandle) -> Vec<ActiveUniform>;
    fn attrib_location(&self, program: RawHandle, name: &str) -> Option<u32>;
    fn use_program(&self, program: RawHandle);

    // Uniforms of the program in use
    fn uniform_1_i32(&self, location: i32, value: i32);
    fn uniform_1_f32(&self, location: i32, value: f32);
    fn uniform_3_f32(&self, location: i32, value: [f32; 3]);
    fn uniform_matrix_4_f32(&self, location: i32, transpose: bool, value: &[f32; 16]);

    // Frame state and drawing
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, color: [f32; 4]);
    fn clear(&self, color: bool, depth: bool);
    fn enable_depth_test(&self);
    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);
    fn draw_arrays_instanced(&self, mode: PrimitiveMode, first: i32, count: i32, instances: i32);
}
