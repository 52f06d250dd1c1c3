/// "Resources" refers to middle-level objects built on top of "Core" handles.
/// Each one owns a driver object and binds through a scoped guard.

pub mod buffer;
pub mod mesh;
pub mod program;
pub mod shader;
pub mod texture;
pub mod vertex_array;
