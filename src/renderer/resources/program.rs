use std::collections::HashMap;
use glam::{Mat4, Vec3};
use smallvec::SmallVec;
use crate::renderer::core::binding::{BindGuard, BindSlot, Bindable, SlotBindable};
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{ObjectKind, RawHandle, RenderDevice};
use crate::renderer::core::error::GlError;
use crate::renderer::core::object::GlObject;
use crate::renderer::resources::shader::Shader;

/// A value that can be written to a uniform location of the program in use
pub trait UniformValue {
    fn upload(&self, device: &dyn RenderDevice, location: i32);
}

impl UniformValue for i32 {
    fn upload(&self, device: &dyn RenderDevice, location: i32) {
        device.uniform_1_i32(location, *self);
    }
}

/// Sent as `0` or `1`, for `int` flags in the shader
impl UniformValue for bool {
    fn upload(&self, device: &dyn RenderDevice, location: i32) {
        device.uniform_1_i32(location, i32::from(*self));
    }
}

impl UniformValue for f32 {
    fn upload(&self, device: &dyn RenderDevice, location: i32) {
        device.uniform_1_f32(location, *self);
    }
}

impl UniformValue for Vec3 {
    fn upload(&self, device: &dyn RenderDevice, location: i32) {
        device.uniform_3_f32(location, self.to_array());
    }
}

/// glam stores matrices column by column, which is already the layout the
/// driver expects, so the columns go out as-is with transposition off.
impl UniformValue for Mat4 {
    fn upload(&self, device: &dyn RenderDevice, location: i32) {
        device.uniform_matrix_4_f32(location, false, &self.to_cols_array());
    }
}

/// Linked shader program with a cached uniform table.
///
/// Lifecycle is `uncompiled -> compiled`, never back. Shader units can only be
/// added before `compile`; they are compiled, linked, then detached and
/// deleted, and the active uniform table is reflected once. Uniforms can be
/// written only after that, and only while the program is bound.
pub struct ShaderProgram {
    object: GlObject,
    units: SmallVec<[Shader; 2]>,
    uniform_locations: HashMap<String, i32>,
    compiled: bool,
}

impl ShaderProgram {
    pub fn new(ctx: &RenderContext) -> Result<Self, GlError> {
        Ok(Self {
            object: GlObject::new(ctx, ObjectKind::Program)?,
            units: SmallVec::new(),
            uniform_locations: HashMap::new(),
            compiled: false,
        })
    }

    pub fn add_unit(&mut self, unit: Shader) -> Result<(), GlError> {
        if self.compiled {
            return Err(GlError::AlreadyCompiled { program: self.object.handle() });
        }
        self.units.push(unit);
        Ok(())
    }

    /// Units waiting to be linked. Empty once compiled.
    pub fn units(&self) -> &[Shader] {
        &self.units
    }

    pub fn compile(&mut self) -> Result<(), GlError> {
        if self.compiled {
            return Ok(());
        }

        for unit in self.units.iter_mut() {
            unit.compile()?;
        }

        let device = self.object.context().device();
        let program = self.object.handle();
        for unit in &self.units {
            device.attach_shader(program, unit.handle());
        }

        device.link_program(program);
        if !device.program_link_status(program) {
            return Err(GlError::ShaderLink {
                program,
                log: device.program_info_log(program),
            });
        }

        // The compiled stages are baked into the program now
        for unit in &self.units {
            device.detach_shader(program, unit.handle());
        }
        for mut unit in self.units.drain(..) {
            unit.dispose();
        }

        self.uniform_locations = device
            .active_uniforms(program)
            .into_iter()
            .map(|uniform| (uniform.name, uniform.location))
            .collect();
        self.compiled = true;

        log::info!(
            "Linked shader program {} with {} active uniforms",
            program,
            self.uniform_locations.len(),
        );
        Ok(())
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn handle(&self) -> RawHandle {
        self.object.handle()
    }

    pub fn uniform_location(&self, name: &str) -> Option<i32> {
        self.uniform_locations.get(name).copied()
    }

    /// Reflected uniform names, sorted
    pub fn uniform_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.uniform_locations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Location of a vertex input, once linked
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        if !self.compiled {
            return None;
        }
        self.object.context().device().attrib_location(self.object.handle(), name)
    }

    pub fn require_attribute_location(&self, name: &str) -> Result<u32, GlError> {
        if !self.compiled {
            return Err(GlError::NotCompiled { program: self.object.handle() });
        }
        self.attribute_location(name).ok_or_else(|| GlError::UnknownAttribute {
            name: name.to_owned(),
            program: self.object.handle(),
        })
    }

    /// Write any number of uniforms under one bind scope.
    ///
    /// `guard` must be this program's own bind guard; the writer borrows it,
    /// so the scope cannot end while the writer is alive.
    pub fn uniforms<'g>(&'g self, guard: &'g BindGuard<'g>) -> Result<UniformWriter<'g>, GlError> {
        if !self.compiled {
            return Err(GlError::NotCompiled { program: self.object.handle() });
        }
        if !guard.holds(&Self::SLOT, &self.object) {
            return Err(GlError::NotBound { kind: ObjectKind::Program });
        }
        Ok(UniformWriter { program: self, _scope: guard })
    }

    /// Write one uniform, checking on this call that the program is bound
    pub fn set(&self, name: &str, value: impl UniformValue) -> Result<(), GlError> {
        if !self.compiled {
            return Err(GlError::NotCompiled { program: self.object.handle() });
        }
        if !self.is_bound() {
            return Err(GlError::NotBound { kind: ObjectKind::Program });
        }
        self.write(name, value)
    }

    fn write(&self, name: &str, value: impl UniformValue) -> Result<(), GlError> {
        let location = self.uniform_location(name).ok_or_else(|| GlError::UnknownUniform {
            name: name.to_owned(),
            program: self.object.handle(),
        })?;
        value.upload(self.object.context().device(), location);
        Ok(())
    }

    pub fn dispose(&mut self) {
        for mut unit in self.units.drain(..) {
            unit.dispose();
        }
        self.object.dispose();
    }
}

impl Bindable for ShaderProgram {
    fn object(&self) -> &GlObject {
        &self.object
    }

    fn bind_primitive(&self, _slot: &BindSlot) -> Result<(), GlError> {
        if !self.compiled {
            return Err(GlError::NotCompiled { program: self.object.handle() });
        }
        self.object.context().device().use_program(self.object.handle());
        Ok(())
    }

    fn unbind_primitive(&self, _slot: &BindSlot) {
        self.object.context().device().use_program(0);
    }
}

impl SlotBindable for ShaderProgram {
    const SLOT: BindSlot = BindSlot::Target("program");
}

/// Batch of uniform writes to a program, valid for as long as the bind guard
/// it was created from
pub struct UniformWriter<'a> {
    program: &'a ShaderProgram,
    _scope: &'a BindGuard<'a>,
}

impl UniformWriter<'_> {
    pub fn set(&self, name: &str, value: impl UniformValue) -> Result<(), GlError> {
        self.program.write(name, value)
    }
}
