//! Ishtar engine crate.
//!
//! Frame orchestration over wgpu: device negotiation, surface management,
//! mesh and uniform buffers, a scene pass and an optional post-process
//! composite shown in a second window.

pub mod core;
pub mod device;
pub mod logging;
pub mod math;
pub mod render;
pub mod scene;
pub mod window;
