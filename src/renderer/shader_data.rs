use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Data unique to each vertex passed as elements into a vertex buffer
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PerVertexData {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

impl PerVertexData {
    pub const STRIDE: i32 = size_of::<Self>() as i32;
    pub const POSITION_OFFSET: i32 = 0;
    pub const NORMAL_OFFSET: i32 = size_of::<Vec3>() as i32;
    pub const TEXCOORD_OFFSET: i32 = 2 * size_of::<Vec3>() as i32;
}

/// Data unique to each drawn instance passed as elements into a vertex buffer
/// advanced once per instance
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PerInstanceData {
    pub model: Mat4,
}

impl PerInstanceData {
    pub const STRIDE: i32 = size_of::<Self>() as i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_eight_tightly_packed_floats() {
        assert_eq!(PerVertexData::STRIDE, 8 * 4);
        assert_eq!(PerVertexData::NORMAL_OFFSET, 3 * 4);
        assert_eq!(PerVertexData::TEXCOORD_OFFSET, 6 * 4);
        assert_eq!(PerInstanceData::STRIDE, 64);
    }
}
