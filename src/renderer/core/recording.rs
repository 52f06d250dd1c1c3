//! In-memory stand-in for a graphics driver, used by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::renderer::core::device::*;
use crate::renderer::core::error::GlError;

#[derive(Debug, Clone, PartialEq)]
pub enum UniformData {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Mat4 { transpose: bool, value: [f32; 16] },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateBuffer(RawHandle),
    DeleteBuffer(RawHandle),
    BindBuffer(BufferTarget, RawHandle),
    BufferData { target: BufferTarget, len: usize, usage: BufferUsage },

    CreateVertexArray(RawHandle),
    DeleteVertexArray(RawHandle),
    BindVertexArray(RawHandle),
    EnableVertexAttribArray(u32),
    VertexAttribPointer { location: u32, components: i32, ty: AttribType, stride: i32, offset: i32 },
    VertexAttribDivisor { location: u32, divisor: u32 },

    CreateTexture(RawHandle),
    DeleteTexture(RawHandle),
    ActiveTexture(TextureUnit),
    BindTexture(TextureTarget, RawHandle),
    TexImage2D { target: TextureTarget, width: u32, height: u32, len: usize },
    SamplerParams(TextureTarget, SamplerParams),
    GenerateMipmap(TextureTarget),

    CreateShader(ShaderStage, RawHandle),
    DeleteShader(RawHandle),
    ShaderSource(RawHandle),
    CompileShader(RawHandle),

    CreateProgram(RawHandle),
    DeleteProgram(RawHandle),
    AttachShader { program: RawHandle, shader: RawHandle },
    DetachShader { program: RawHandle, shader: RawHandle },
    LinkProgram(RawHandle),
    UseProgram(RawHandle),
    Uniform { name: String, value: UniformData },

    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear { color: bool, depth: bool },
    EnableDepthTest,
    DrawArrays { mode: PrimitiveMode, first: i32, count: i32 },
    DrawArraysInstanced { mode: PrimitiveMode, first: i32, count: i32, instances: i32 },
}

struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramState {
    attached: Vec<RawHandle>,
    linked: bool,
    log: String,
}

#[derive(Default)]
struct RecordingState {
    next_handle: RawHandle,
    calls: Vec<DeviceCall>,
    shaders: HashMap<RawHandle, ShaderState>,
    programs: HashMap<RawHandle, ProgramState>,
    uniforms: Vec<String>,
    attributes: Vec<String>,
    sources: Vec<String>,
    bound_array_buffer: RawHandle,
    buffer_contents: HashMap<RawHandle, Vec<u8>>,
}

/// Records every call and simulates just enough driver state for the binding
/// layer: handle allocation, compile/link status, a configured uniform table
/// and buffer contents.
///
/// A shader fails to compile when its source contains `#error`. A program
/// links when it has a compiled vertex and a compiled fragment unit attached.
/// Clones share state, so a test can keep one clone and hand another to a
/// [`RenderContext`](crate::renderer::core::context::RenderContext).
#[derive(Clone, Default)]
pub struct RecordingDevice {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active uniform table reported by every linked program, locations in order
    pub fn with_uniforms(self, names: &[&str]) -> Self {
        self.state.borrow_mut().uniforms = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Active attributes, locations in order
    pub fn with_attributes(self, names: &[&str]) -> Self {
        self.state.borrow_mut().attributes = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Uniform writes in issue order
    pub fn uniform_writes(&self) -> Vec<(String, UniformData)> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Uniform { name, value } => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Every source string handed to `shader_source`, in issue order
    pub fn shader_sources(&self) -> Vec<String> {
        self.state.borrow().sources.clone()
    }

    pub fn buffer_contents(&self, buffer: RawHandle) -> Option<Vec<u8>> {
        self.state.borrow().buffer_contents.get(&buffer).cloned()
    }

    fn record(&self, call: DeviceCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn allocate(&self) -> RawHandle {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        state.next_handle
    }

    fn uniform(&self, location: i32, value: UniformData) {
        let name = usize::try_from(location)
            .ok()
            .and_then(|i| self.state.borrow().uniforms.get(i).cloned())
            .unwrap_or_else(|| format!("<location {location}>"));
        self.record(DeviceCall::Uniform { name, value });
    }
}

impl RenderDevice for RecordingDevice {
    fn create_buffer(&self) -> Result<RawHandle, GlError> {
        let handle = self.allocate();
        self.record(DeviceCall::CreateBuffer(handle));
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: RawHandle) {
        self.state.borrow_mut().buffer_contents.remove(&buffer);
        self.record(DeviceCall::DeleteBuffer(buffer));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: RawHandle) {
        self.state.borrow_mut().bound_array_buffer = buffer;
        self.record(DeviceCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        {
            let mut state = self.state.borrow_mut();
            let bound = state.bound_array_buffer;
            state.buffer_contents.insert(bound, data.to_vec());
        }
        self.record(DeviceCall::BufferData { target, len: data.len(), usage });
    }

    fn create_vertex_array(&self) -> Result<RawHandle, GlError> {
        let handle = self.allocate();
        self.record(DeviceCall::CreateVertexArray(handle));
        Ok(handle)
    }

    fn delete_vertex_array(&self, vertex_array: RawHandle) {
        self.record(DeviceCall::DeleteVertexArray(vertex_array));
    }

    fn bind_vertex_array(&self, vertex_array: RawHandle) {
        self.record(DeviceCall::BindVertexArray(vertex_array));
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(DeviceCall::EnableVertexAttribArray(location));
    }

    fn vertex_attrib_pointer(
        &self,
        location: u32,
        components: i32,
        ty: AttribType,
        _normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(DeviceCall::VertexAttribPointer { location, components, ty, stride, offset });
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        self.record(DeviceCall::VertexAttribDivisor { location, divisor });
    }

    fn create_texture(&self) -> Result<RawHandle, GlError> {
        let handle = self.allocate();
        self.record(DeviceCall::CreateTexture(handle));
        Ok(handle)
    }

    fn delete_texture(&self, texture: RawHandle) {
        self.record(DeviceCall::DeleteTexture(texture));
    }

    fn active_texture(&self, unit: TextureUnit) {
        self.record(DeviceCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: RawHandle) {
        self.record(DeviceCall::BindTexture(target, texture));
    }

    fn tex_image_2d_rgba8(&self, target: TextureTarget, width: u32, height: u32, pixels: &[u8]) {
        self.record(DeviceCall::TexImage2D { target, width, height, len: pixels.len() });
    }

    fn set_sampler_params(&self, target: TextureTarget, params: SamplerParams) {
        self.record(DeviceCall::SamplerParams(target, params));
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        self.record(DeviceCall::GenerateMipmap(target));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<RawHandle, GlError> {
        let handle = self.allocate();
        self.state.borrow_mut().shaders.insert(handle, ShaderState {
            stage,
            source: String::new(),
            compiled: false,
        });
        self.record(DeviceCall::CreateShader(stage, handle));
        Ok(handle)
    }

    fn delete_shader(&self, shader: RawHandle) {
        self.state.borrow_mut().shaders.remove(&shader);
        self.record(DeviceCall::DeleteShader(shader));
    }

    fn shader_source(&self, shader: RawHandle, source: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.sources.push(source.to_owned());
            if let Some(shader) = state.shaders.get_mut(&shader) {
                shader.source = source.to_owned();
            }
        }
        self.record(DeviceCall::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: RawHandle) {
        if let Some(state) = self.state.borrow_mut().shaders.get_mut(&shader) {
            state.compiled = !state.source.contains("#error");
        }
        self.record(DeviceCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: RawHandle) -> bool {
        self.state.borrow().shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: RawHandle) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(s) if !s.compiled => "0:1(1): error: #error directive".to_owned(),
            _ => String::new(),
        }
    }

    fn create_program(&self) -> Result<RawHandle, GlError> {
        let handle = self.allocate();
        self.state.borrow_mut().programs.insert(handle, ProgramState::default());
        self.record(DeviceCall::CreateProgram(handle));
        Ok(handle)
    }

    fn delete_program(&self, program: RawHandle) {
        self.state.borrow_mut().programs.remove(&program);
        self.record(DeviceCall::DeleteProgram(program));
    }

    fn attach_shader(&self, program: RawHandle, shader: RawHandle) {
        if let Some(state) = self.state.borrow_mut().programs.get_mut(&program) {
            state.attached.push(shader);
        }
        self.record(DeviceCall::AttachShader { program, shader });
    }

    fn detach_shader(&self, program: RawHandle, shader: RawHandle) {
        if let Some(state) = self.state.borrow_mut().programs.get_mut(&program) {
            state.attached.retain(|s| *s != shader);
        }
        self.record(DeviceCall::DetachShader { program, shader });
    }

    fn link_program(&self, program: RawHandle) {
        {
            let mut state = self.state.borrow_mut();
            let RecordingState { shaders, programs, .. } = &mut *state;
            if let Some(program_state) = programs.get_mut(&program) {
                let has_stage = |stage: ShaderStage| {
                    program_state.attached.iter().any(|s| {
                        shaders.get(s).is_some_and(|s| s.stage == stage && s.compiled)
                    })
                };
                let linked = has_stage(ShaderStage::Vertex) && has_stage(ShaderStage::Fragment);
                program_state.linked = linked;
                program_state.log = if linked {
                    String::new()
                } else {
                    "error: program lacks a compiled vertex and fragment stage".to_owned()
                };
            }
        }
        self.record(DeviceCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: RawHandle) -> bool {
        self.state.borrow().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: RawHandle) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn active_uniforms(&self, program: RawHandle) -> Vec<ActiveUniform> {
        let state = self.state.borrow();
        if !state.programs.get(&program).is_some_and(|p| p.linked) {
            return Vec::new();
        }
        state
            .uniforms
            .iter()
            .enumerate()
            .map(|(i, name)| ActiveUniform { name: name.clone(), location: i as i32 })
            .collect()
    }

    fn attrib_location(&self, _program: RawHandle, name: &str) -> Option<u32> {
        self.state
            .borrow()
            .attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn use_program(&self, program: RawHandle) {
        self.record(DeviceCall::UseProgram(program));
    }

    fn uniform_1_i32(&self, location: i32, value: i32) {
        self.uniform(location, UniformData::Int(value));
    }

    fn uniform_1_f32(&self, location: i32, value: f32) {
        self.uniform(location, UniformData::Float(value));
    }

    fn uniform_3_f32(&self, location: i32, value: [f32; 3]) {
        self.uniform(location, UniformData::Vec3(value));
    }

    fn uniform_matrix_4_f32(&self, location: i32, transpose: bool, value: &[f32; 16]) {
        self.uniform(location, UniformData::Mat4 { transpose, value: *value });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(DeviceCall::Viewport(x, y, width, height));
    }

    fn clear_color(&self, color: [f32; 4]) {
        self.record(DeviceCall::ClearColor(color));
    }

    fn clear(&self, color: bool, depth: bool) {
        self.record(DeviceCall::Clear { color, depth });
    }

    fn enable_depth_test(&self) {
        self.record(DeviceCall::EnableDepthTest);
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.record(DeviceCall::DrawArrays { mode, first, count });
    }

    fn draw_arrays_instanced(&self, mode: PrimitiveMode, first: i32, count: i32, instances: i32) {
        self.record(DeviceCall::DrawArraysInstanced { mode, first, count, instances });
    }
}
