//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the two windows, and wires them to the
//! renderer.

mod resize;
mod runtime;
mod target;

pub use resize::{ResizeNotifier, ResizeSubscription};
pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use target::WindowTarget;
