use color_eyre::eyre::{ensure, WrapErr};
use crate::renderer::config::{DrawMode, ResourcePaths};
use crate::renderer::core::binding::SlotBindable;
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{ShaderStage, TextureUnit};
use crate::renderer::core::error::GlError;
use crate::renderer::resources::program::ShaderProgram;
use crate::renderer::resources::shader::{substitute_define, Shader};

/// Sizes of the light arrays compiled into the fragment shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightLimits {
    pub point_lights: usize,
    pub spot_lights: usize,
}

impl LightLimits {
    /// GLSL has no zero-length arrays, so each list needs room for one light
    pub fn new(point_lights: usize, spot_lights: usize) -> color_eyre::Result<Self> {
        ensure!(
            point_lights > 0 && spot_lights > 0,
            "Light capacities must be at least 1, got {point_lights} point and {spot_lights} spot lights"
        );
        Ok(Self { point_lights, spot_lights })
    }
}

/// Shader program lighting the textured blocks
pub struct BlockProgram {
    program: ShaderProgram,
    draw_mode: DrawMode,
}

impl BlockProgram {
    pub const DIFFUSE_UNIT: TextureUnit = TextureUnit(0);
    pub const SPECULAR_UNIT: TextureUnit = TextureUnit(1);

    /// Vertex and fragment file names for a draw mode
    pub fn source_files(draw_mode: DrawMode) -> (&'static str, &'static str) {
        match draw_mode {
            DrawMode::Instanced => ("instanced.vert", "instanced.frag"),
            DrawMode::PerBlock => ("default.vert", "default.frag"),
        }
    }

    pub fn load(
        ctx: &RenderContext,
        paths: &ResourcePaths,
        draw_mode: DrawMode,
        limits: LightLimits,
    ) -> color_eyre::Result<Self> {
        let (vertex_file, fragment_file) = Self::source_files(draw_mode);
        let read = |file_name: &str| {
            let path = paths.shader(file_name);
            std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read shader source {}", path.display()))
        };
        let vertex_source = read(vertex_file)?;
        let fragment_source = read(fragment_file)?;

        Ok(Self::from_sources(ctx, draw_mode, &vertex_source, &fragment_source, limits)?)
    }

    /// Size the light arrays, compile, and point the material samplers at
    /// their texture units
    pub fn from_sources(
        ctx: &RenderContext,
        draw_mode: DrawMode,
        vertex_source: &str,
        fragment_source: &str,
        limits: LightLimits,
    ) -> Result<Self, GlError> {
        let (vertex_file, fragment_file) = Self::source_files(draw_mode);
        let fragment_source = substitute_define(fragment_source, "NR_POINT_LIGHTS", limits.point_lights);
        let fragment_source = substitute_define(&fragment_source, "NR_SPOT_LIGHTS", limits.spot_lights);

        let mut program = ShaderProgram::new(ctx)?;
        program.add_unit(Shader::new(ctx, vertex_file, vertex_source, ShaderStage::Vertex)?)?;
        program.add_unit(Shader::new(ctx, fragment_file, &fragment_source, ShaderStage::Fragment)?)?;
        program.compile()?;

        {
            let bound = program.bind()?;
            let uniforms = program.uniforms(&bound)?;
            uniforms.set("material.diffuseMap", Self::DIFFUSE_UNIT.0 as i32)?;
            uniforms.set("material.specularMap", Self::SPECULAR_UNIT.0 as i32)?;
        }

        Ok(Self { program, draw_mode })
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn is_instanced(&self) -> bool {
        self.draw_mode == DrawMode::Instanced
    }
}
