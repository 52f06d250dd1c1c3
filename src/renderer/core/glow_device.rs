use std::num::NonZeroU32;
use glow::HasContext;
use crate::renderer::core::device::*;
use crate::renderer::core::error::GlError;

/// [`RenderDevice`] backed by an OpenGL 3.3 core context through `glow`.
///
/// The wrapped context must be current on the calling thread for every call.
pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        log::info!(
            "OpenGL {}.{} {}",
            version.major,
            version.minor,
            version.vendor_info,
        );
        Self { gl }
    }
}

fn name(handle: RawHandle) -> Option<NonZeroU32> {
    NonZeroU32::new(handle)
}

fn uniform_location(location: i32) -> Option<glow::NativeUniformLocation> {
    u32::try_from(location).ok().map(glow::NativeUniformLocation)
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
    }
}

fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
    }
}

fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
    }
}

fn texture_filter(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST as i32,
        TextureFilter::Linear => glow::LINEAR as i32,
    }
}

fn texture_wrap(wrap: TextureWrap) -> i32 {
    match wrap {
        TextureWrap::Repeat => glow::REPEAT as i32,
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        TextureWrap::MirroredRepeat => glow::MIRRORED_REPEAT as i32,
    }
}

fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn attrib_type(ty: AttribType) -> u32 {
    match ty {
        AttribType::Float => glow::FLOAT,
        AttribType::Int => glow::INT,
        AttribType::UnsignedInt => glow::UNSIGNED_INT,
        AttribType::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

fn primitive_mode(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Triangles => glow::TRIANGLES,
    }
}

fn allocation_error(kind: ObjectKind) -> impl FnOnce(String) -> GlError {
    move |message| GlError::Allocation { kind, message }
}

impl RenderDevice for GlowDevice {
    fn create_buffer(&self) -> Result<RawHandle, GlError> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(allocation_error(ObjectKind::Buffer))?;
        Ok(buffer.0.get())
    }

    fn delete_buffer(&self, buffer: RawHandle) {
        if let Some(buffer) = name(buffer) {
            unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer)) };
        }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: RawHandle) {
        unsafe {
            self.gl.bind_buffer(buffer_target(target), name(buffer).map(glow::NativeBuffer));
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl.buffer_data_u8_slice(buffer_target(target), data, buffer_usage(usage));
        }
    }

    fn create_vertex_array(&self) -> Result<RawHandle, GlError> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(allocation_error(ObjectKind::VertexArray))?;
        Ok(vertex_array.0.get())
    }

    fn delete_vertex_array(&self, vertex_array: RawHandle) {
        if let Some(vertex_array) = name(vertex_array) {
            unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vertex_array)) };
        }
    }

    fn bind_vertex_array(&self, vertex_array: RawHandle) {
        unsafe {
            self.gl.bind_vertex_array(name(vertex_array).map(glow::NativeVertexArray));
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) };
    }

    fn vertex_attrib_pointer(
        &self,
        location: u32,
        components: i32,
        ty: AttribType,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            match ty {
                AttribType::Float | AttribType::UnsignedByte => self.gl.vertex_attrib_pointer_f32(
                    location,
                    components,
                    attrib_type(ty),
                    normalized,
                    stride,
                    offset,
                ),
                AttribType::Int | AttribType::UnsignedInt => self.gl.vertex_attrib_pointer_i32(
                    location,
                    components,
                    attrib_type(ty),
                    stride,
                    offset,
                ),
            }
        }
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(location, divisor) };
    }

    fn create_texture(&self) -> Result<RawHandle, GlError> {
        let texture = unsafe { self.gl.create_texture() }
            .map_err(allocation_error(ObjectKind::Texture))?;
        Ok(texture.0.get())
    }

    fn delete_texture(&self, texture: RawHandle) {
        if let Some(texture) = name(texture) {
            unsafe { self.gl.delete_texture(glow::NativeTexture(texture)) };
        }
    }

    fn active_texture(&self, unit: TextureUnit) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit.0) };
    }

    fn bind_texture(&self, target: TextureTarget, texture: RawHandle) {
        unsafe {
            self.gl.bind_texture(texture_target(target), name(texture).map(glow::NativeTexture));
        }
    }

    fn tex_image_2d_rgba8(&self, target: TextureTarget, width: u32, height: u32, pixels: &[u8]) {
        // The driver reads width * height * 4 bytes from `pixels`
        let (Ok(gl_width), Ok(gl_height)) = (i32::try_from(width), i32::try_from(height)) else {
            log::error!("Skipping upload of oversized {width}x{height} texture");
            return;
        };
        if rgba8_len(width, height) != Some(pixels.len()) {
            log::error!("Skipping upload of {width}x{height} texture from {} bytes", pixels.len());
            return;
        }
        unsafe {
            self.gl.tex_image_2d(
                texture_target(target),
                0,
                glow::RGBA as i32,
                gl_width,
                gl_height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn set_sampler_params(&self, target: TextureTarget, params: SamplerParams) {
        let target = texture_target(target);
        unsafe {
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, texture_filter(params.min_filter));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, texture_filter(params.mag_filter));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, texture_wrap(params.wrap_s));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, texture_wrap(params.wrap_t));
        }
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        unsafe { self.gl.generate_mipmap(texture_target(target)) };
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<RawHandle, GlError> {
        let shader = unsafe { self.gl.create_shader(shader_type(stage)) }
            .map_err(allocation_error(ObjectKind::Shader(stage)))?;
        Ok(shader.0.get())
    }

    fn delete_shader(&self, shader: RawHandle) {
        if let Some(shader) = name(shader) {
            unsafe { self.gl.delete_shader(glow::NativeShader(shader)) };
        }
    }

    fn shader_source(&self, shader: RawHandle, source: &str) {
        if let Some(shader) = name(shader) {
            unsafe { self.gl.shader_source(glow::NativeShader(shader), source) };
        }
    }

    fn compile_shader(&self, shader: RawHandle) {
        if let Some(shader) = name(shader) {
            unsafe { self.gl.compile_shader(glow::NativeShader(shader)) };
        }
    }

    fn shader_compile_status(&self, shader: RawHandle) -> bool {
        name(shader)
            .is_some_and(|s| unsafe { self.gl.get_shader_compile_status(glow::NativeShader(s)) })
    }

    fn shader_info_log(&self, shader: RawHandle) -> String {
        name(shader)
            .map(|s| unsafe { self.gl.get_shader_info_log(glow::NativeShader(s)) })
            .unwrap_or_default()
    }

    fn create_program(&self) -> Result<RawHandle, GlError> {
        let program = unsafe { self.gl.create_program() }
            .map_err(allocation_error(ObjectKind::Program))?;
        Ok(program.0.get())
    }

    fn delete_program(&self, program: RawHandle) {
        if let Some(program) = name(program) {
            unsafe { self.gl.delete_program(glow::NativeProgram(program)) };
        }
    }

    fn attach_shader(&self, program: RawHandle, shader: RawHandle) {
        if let (Some(program), Some(shader)) = (name(program), name(shader)) {
            unsafe {
                self.gl.attach_shader(glow::NativeProgram(program), glow::NativeShader(shader));
            }
        }
    }

    fn detach_shader(&self, program: RawHandle, shader: RawHandle) {
        if let (Some(program), Some(shader)) = (name(program), name(shader)) {
            unsafe {
                self.gl.detach_shader(glow::NativeProgram(program), glow::NativeShader(shader));
            }
        }
    }

    fn link_program(&self, program: RawHandle) {
        if let Some(program) = name(program) {
            unsafe { self.gl.link_program(glow::NativeProgram(program)) };
        }
    }

    fn program_link_status(&self, program: RawHandle) -> bool {
        name(program)
            .is_some_and(|p| unsafe { self.gl.get_program_link_status(glow::NativeProgram(p)) })
    }

    fn program_info_log(&self, program: RawHandle) -> String {
        name(program)
            .map(|p| unsafe { self.gl.get_program_info_log(glow::NativeProgram(p)) })
            .unwrap_or_default()
    }

    fn active_uniforms(&self, program: RawHandle) -> Vec<ActiveUniform> {
        let Some(program) = name(program).map(glow::NativeProgram) else {
            return Vec::new();
        };

        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .filter_map(|uniform| {
                    let location = self.gl.get_uniform_location(program, &uniform.name)?;
                    Some(ActiveUniform {
                        name: uniform.name,
                        location: location.0 as i32,
                    })
                })
                .collect()
        }
    }

    fn attrib_location(&self, program: RawHandle, attribute: &str) -> Option<u32> {
        let program = name(program)?;
        unsafe { self.gl.get_attrib_location(glow::NativeProgram(program), attribute) }
    }

    fn use_program(&self, program: RawHandle) {
        unsafe { self.gl.use_program(name(program).map(glow::NativeProgram)) };
    }

    fn uniform_1_i32(&self, location: i32, value: i32) {
        unsafe { self.gl.uniform_1_i32(uniform_location(location).as_ref(), value) };
    }

    fn uniform_1_f32(&self, location: i32, value: f32) {
        unsafe { self.gl.uniform_1_f32(uniform_location(location).as_ref(), value) };
    }

    fn uniform_3_f32(&self, location: i32, value: [f32; 3]) {
        let [x, y, z] = value;
        unsafe { self.gl.uniform_3_f32(uniform_location(location).as_ref(), x, y, z) };
    }

    fn uniform_matrix_4_f32(&self, location: i32, transpose: bool, value: &[f32; 16]) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                uniform_location(location).as_ref(),
                transpose,
                value,
            );
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn clear_color(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    fn clear(&self, color: bool, depth: bool) {
        let mut mask = 0;
        if color {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { self.gl.clear(mask) };
    }

    fn enable_depth_test(&self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) };
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive_mode(mode), first, count) };
    }

    fn draw_arrays_instanced(&self, mode: PrimitiveMode, first: i32, count: i32, instances: i32) {
        unsafe {
            self.gl.draw_arrays_instanced(primitive_mode(mode), first, count, instances);
        }
    }
}
