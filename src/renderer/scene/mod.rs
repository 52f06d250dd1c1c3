/// "Scene" holds the lit block field drawn each frame: its program, meshes,
/// textures, lights and material, and the uniform plumbing between them.

pub mod block_program;
pub mod block_set;
pub mod light;
pub mod material;
pub mod uniforms;

use crate::renderer::camera::CameraUniforms;
use crate::renderer::config::{RenderConfig, ResourcePaths};
use crate::renderer::core::binding::{Bindable, SlotBindable};
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::{PrimitiveMode, TextureTarget};
use crate::renderer::core::error::GlError;
use crate::renderer::scene::block_program::{BlockProgram, LightLimits};
use crate::renderer::scene::block_set::BlockSet;
use crate::renderer::scene::light::LightRig;
use crate::renderer::scene::material::Material;
use crate::renderer::scene::uniforms::SceneUniformApplier;

pub struct BlockScene {
    program: BlockProgram,
    block_set: BlockSet,
    lights: LightRig,
    material: Material,
}

impl BlockScene {
    pub fn load(
        ctx: &RenderContext,
        config: &RenderConfig,
        paths: &ResourcePaths,
    ) -> color_eyre::Result<Self> {
        let limits = LightLimits::new(config.max_point_lights, config.max_spot_lights)?;
        let program = BlockProgram::load(ctx, paths, config.draw_mode, limits)?;
        let block_set = BlockSet::load(ctx, paths, &program, config.block_count)?;
        let lights = LightRig::with_default_lights(limits.point_lights, limits.spot_lights);

        Ok(Self::new(program, block_set, lights, Material::default()))
    }

    pub fn new(program: BlockProgram, block_set: BlockSet, lights: LightRig, material: Material) -> Self {
        Self {
            program,
            block_set,
            lights,
            material,
        }
    }

    /// Bind the mesh, both texture maps and the program in nested scopes,
    /// write the per-frame uniforms, then draw every block.
    pub fn render(&self, camera: &CameraUniforms) -> Result<(), GlError> {
        let block_set = &self.block_set;
        let program = self.program.program();

        let _vao = block_set.vertex_array().bind()?;
        let _diffuse = block_set
            .diffuse_map()
            .bind_to(TextureTarget::Texture2D, BlockProgram::DIFFUSE_UNIT)?;
        let _specular = block_set
            .specular_map()
            .bind_to(TextureTarget::Texture2D, BlockProgram::SPECULAR_UNIT)?;
        let bound = program.bind()?;

        let applier = SceneUniformApplier::new(program, &bound)?;
        applier.apply_camera(camera)?;
        applier.apply_material(&self.material)?;
        applier.apply_lights(&self.lights)?;

        let device = program.object().context().device();
        let vertex_count = block_set.vertex_count();
        if self.program.is_instanced() {
            device.draw_arrays_instanced(
                PrimitiveMode::Triangles,
                0,
                vertex_count,
                block_set.blocks().len() as i32,
            );
        } else {
            for block in block_set.blocks() {
                applier.apply_model(block.compute_matrix())?;
                device.draw_arrays(PrimitiveMode::Triangles, 0, vertex_count);
            }
        }

        Ok(())
    }

    pub fn program(&self) -> &BlockProgram {
        &self.program
    }

    pub fn block_set(&self) -> &BlockSet {
        &self.block_set
    }

    pub fn block_set_mut(&mut self) -> &mut BlockSet {
        &mut self.block_set
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightRig {
        &mut self.lights
    }
}
