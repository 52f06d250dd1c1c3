/// "Core" refers to the thin layer over the stateful graphics driver: native object
/// lifetimes, the bind slot registry and the driver abstraction itself.
/// Everything in "Resources" is built on top of it.

pub mod binding;
pub mod context;
pub mod device;
pub mod error;
pub mod glow_device;
pub mod object;

#[cfg(test)]
pub mod recording;
