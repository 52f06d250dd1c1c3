use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{ObjectKind, RawHandle, ShaderStage};
use crate::renderer::core::error::GlError;
use crate::renderer::core::object::GlObject;

/// A single shader stage, owned by the program it is added to.
pub struct Shader {
    object: GlObject,
    name: String,
    stage: ShaderStage,
    compiled: bool,
}

impl Shader {
    pub fn new(
        ctx: &RenderContext,
        name: impl Into<String>,
        source: &str,
        stage: ShaderStage,
    ) -> Result<Self, GlError> {
        let object = GlObject::new(ctx, ObjectKind::Shader(stage))?;
        ctx.device().shader_source(object.handle(), source);

        Ok(Self {
            object,
            name: name.into(),
            stage,
            compiled: false,
        })
    }

    pub fn compile(&mut self) -> Result<(), GlError> {
        if self.compiled {
            return Ok(());
        }

        let device = self.object.context().device();
        let handle = self.object.handle();
        device.compile_shader(handle);
        if !device.shader_compile_status(handle) {
            return Err(GlError::ShaderCompile {
                stage: self.stage,
                name: self.name.clone(),
                shader: handle,
                log: device.shader_info_log(handle),
            });
        }

        log::debug!("Compiled {} shader `{}` ({})", self.stage, self.name, handle);
        self.compiled = true;
        Ok(())
    }

    pub fn handle(&self) -> RawHandle {
        self.object.handle()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

/// Rewrite every `#define NAME <value>` line of a GLSL source to the given value.
///
/// Lets one source file serve programs built with different array sizes.
/// Other lines, including other defines, are left untouched.
pub fn substitute_define(source: &str, name: &str, value: impl std::fmt::Display) -> String {
    let mut output = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("#define") && tokens.next() == Some(name) {
            let indent = &line[..line.len() - line.trim_start().len()];
            let ending = if line.ends_with("\r\n") {
                "\r\n"
            } else if line.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            output.push_str(&format!("{indent}#define {name} {value}{ending}"));
        } else {
            output.push_str(line);
        }
    }
    output
}
