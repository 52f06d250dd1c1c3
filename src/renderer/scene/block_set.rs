use glam::{Mat4, Vec3};
use rand::Rng;
use crate::renderer::config::ResourcePaths;
use crate::renderer::core::binding::SlotBindable;
use crate::renderer::core::context::RenderContext;
use crate::renderer::core::device::BufferUsage;
use crate::renderer::core::error::GlError;
use crate::renderer::resources::buffer::ArrayBuffer;
use crate::renderer::resources::mesh::Mesh;
use crate::renderer::resources::texture::ColorTexture;
use crate::renderer::resources::vertex_array::{VertexArray, VertexPointer};
use crate::renderer::scene::block_program::BlockProgram;
use crate::renderer::shader_data::{PerInstanceData, PerVertexData};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Block {
    /// Scale about the block's own center, then move it into place
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }
}

/// Many textured cubes sharing one mesh, one vertex array and one texture pair
pub struct BlockSet {
    blocks: Vec<Block>,
    vertex_count: i32,
    vertices: ArrayBuffer<PerVertexData>,
    instances: Option<ArrayBuffer<PerInstanceData>>,
    vertex_array: VertexArray,
    diffuse_map: ColorTexture,
    specular_map: ColorTexture,
}

impl BlockSet {
    pub const DIFFUSE_MAP_FILE: &'static str = "container2.png";
    pub const SPECULAR_MAP_FILE: &'static str = "container2_specular.png";

    // Placement is drawn on a 0.1 unit grid
    const POSITION_RANGE_TENTHS: i32 = 250;
    const SCALE_RANGE_HUNDREDTHS: (i32, i32) = (80, 150);

    /// Blocks scattered through a 50 unit cube around the origin, each axis
    /// scaled independently between 0.8 and 1.5
    pub fn random_blocks(count: usize, rng: &mut impl Rng) -> Vec<Block> {
        let range = Self::POSITION_RANGE_TENTHS;
        let (scale_min, scale_max) = Self::SCALE_RANGE_HUNDREDTHS;
        let mut sample_vec3 = |min: i32, max: i32, divisor: f32| {
            let mut sample = || rng.gen_range(min..max) as f32 / divisor;
            Vec3::new(sample(), sample(), sample())
        };

        (0..count)
            .map(|_| Block {
                position: sample_vec3(-range, range, 10.0),
                scale: sample_vec3(scale_min, scale_max, 100.0),
            })
            .collect()
    }

    pub fn load(
        ctx: &RenderContext,
        paths: &ResourcePaths,
        program: &BlockProgram,
        count: usize,
    ) -> color_eyre::Result<Self> {
        let diffuse_map = ColorTexture::from_file(ctx, paths.texture(Self::DIFFUSE_MAP_FILE))?;
        let specular_map = ColorTexture::from_file(ctx, paths.texture(Self::SPECULAR_MAP_FILE))?;
        let blocks = Self::random_blocks(count, &mut rand::thread_rng());

        Ok(Self::new(ctx, program, blocks, diffuse_map, specular_map)?)
    }

    /// Upload the cube mesh and, for instanced programs, the instance
    /// matrices, then wire both into a vertex array by attribute name.
    pub fn new(
        ctx: &RenderContext,
        program: &BlockProgram,
        blocks: Vec<Block>,
        diffuse_map: ColorTexture,
        specular_map: ColorTexture,
    ) -> Result<Self, GlError> {
        let mesh = Mesh::new_cube();
        let vertex_count = mesh.vertex_count();
        let vertices = ArrayBuffer::with_data(ctx, mesh.into_shader_data())?;
        vertices.commit()?;

        let instances = if program.is_instanced() {
            let mut instances = ArrayBuffer::new(ctx)?;
            instances.set_usage(BufferUsage::DynamicDraw);
            Some(instances)
        } else {
            None
        };

        let mut block_set = Self {
            blocks,
            vertex_count,
            vertices,
            instances,
            vertex_array: VertexArray::new(ctx)?,
            diffuse_map,
            specular_map,
        };
        block_set.update_instance_buffer()?;
        block_set.describe_inputs(program)?;

        log::info!(
            "Created block set with {} blocks ({})",
            block_set.blocks.len(),
            if program.is_instanced() { "instanced" } else { "per block" },
        );
        Ok(block_set)
    }

    fn describe_inputs(&self, program: &BlockProgram) -> Result<(), GlError> {
        let shader = program.program();
        let _vao = self.vertex_array.bind()?;

        {
            let _vbo = self.vertices.bind()?;
            let stride = PerVertexData::STRIDE;
            self.vertex_array.describe_named_pointer(
                shader,
                "aPos",
                VertexPointer::floats(3).with_stride(stride).with_offset(PerVertexData::POSITION_OFFSET),
            )?;
            self.vertex_array.describe_named_pointer(
                shader,
                "aNormal",
                VertexPointer::floats(3).with_stride(stride).with_offset(PerVertexData::NORMAL_OFFSET),
            )?;
            self.vertex_array.describe_named_pointer(
                shader,
                "aTexCoords",
                VertexPointer::floats(2).with_stride(stride).with_offset(PerVertexData::TEXCOORD_OFFSET),
            )?;
        }

        if let Some(instances) = &self.instances {
            let _ibo = instances.bind()?;
            self.vertex_array
                .describe_named_matrix_pointer(shader, "aInstanceMatrix", PerInstanceData::STRIDE, 0, 1)?;
        }

        Ok(())
    }

    /// Recompute every block's model matrix and upload them. Does nothing
    /// when drawing per block.
    pub fn update_instance_buffer(&mut self) -> Result<(), GlError> {
        let Some(instances) = &mut self.instances else {
            return Ok(());
        };
        let data = self
            .blocks
            .iter()
            .map(|block| PerInstanceData { model: block.compute_matrix() })
            .collect();
        instances.set_data(data);
        instances.commit()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Moved blocks reach the instance buffer on the next `update_instance_buffer`
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn instances(&self) -> Option<&ArrayBuffer<PerInstanceData>> {
        self.instances.as_ref()
    }

    pub fn diffuse_map(&self) -> &ColorTexture {
        &self.diffuse_map
    }

    pub fn specular_map(&self) -> &ColorTexture {
        &self.specular_map
    }
}
