//! GPU device + surface management.
//!
//! This module is responsible for:
//! - negotiating the wgpu Adapter/Device/Queue
//! - creating & configuring presentation surfaces (or off-screen textures)
//! - acquiring frames and mapping surface errors

mod context;
mod error;
mod frame;
mod init;
mod offscreen;
mod surface;

pub use context::{acquire_context, DeviceContext};
pub use error::{RenderError, SurfaceErrorAction};
pub use frame::SurfaceFrame;
pub use init::{RendererConfig, BACKGROUND};
pub use offscreen::OffscreenTarget;
pub use surface::{DrawableTarget, RenderSurface};
