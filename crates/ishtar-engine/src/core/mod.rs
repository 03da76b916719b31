//! Core engine-facing contracts.
//!
//! The interface between the windowed runtime and applications driving the
//! renderer: event and frame callbacks plus a per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, FrameTime};
