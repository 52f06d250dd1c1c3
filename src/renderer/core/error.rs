use crate::renderer::core::binding::{BindSlot, SlotOccupant};
use crate::renderer::core::device::{ObjectKind, RawHandle, ShaderStage};

/// Contract violations and driver failures raised by the binding layer.
///
/// None of these are transient. They point at a wrong bind order, a typo in a
/// uniform name or a malformed shader, so callers propagate them and abandon
/// the frame instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlError {
    #[error("{kind} handle is zero or has been disposed")]
    HandleInvalid { kind: ObjectKind },

    #[error("bind slot {slot} is already held by {occupant}, release the existing bind guard first")]
    SlotOccupied { slot: BindSlot, occupant: SlotOccupant },

    #[error("{kind} must be bound before this operation")]
    NotBound { kind: ObjectKind },

    #[error("shader program {program} must be compiled first")]
    NotCompiled { program: RawHandle },

    #[error("shader program {program} is already compiled")]
    AlreadyCompiled { program: RawHandle },

    #[error("`{name}` is not an active uniform of shader program {program}")]
    UnknownUniform { name: String, program: RawHandle },

    #[error("`{name}` is not an active attribute of shader program {program}")]
    UnknownAttribute { name: String, program: RawHandle },

    #[error("failed to compile {stage} shader `{name}` ({shader}):\n{log}")]
    ShaderCompile {
        stage: ShaderStage,
        name: String,
        shader: RawHandle,
        log: String,
    },

    #[error("failed to link shader program {program}:\n{log}")]
    ShaderLink { program: RawHandle, log: String },

    #[error("{len} bytes do not hold a {width}x{height} RGBA8 image")]
    PixelData { width: u32, height: u32, len: usize },

    #[error("driver could not create {kind}: {message}")]
    Allocation { kind: ObjectKind, message: String },
}
