use crate::render::{FrameOutcome, Renderer};
use crate::scene::{Actor, Camera};
use crate::window::{RuntimeCtx, WindowTarget};

use super::app::AppControl;

/// Timing of the current frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped against stalls.
    pub dt: f32,
    pub frame_index: u64,
}

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub renderer: &'a mut Renderer<WindowTarget>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_> {
    /// Renders `actors` from `camera`, then composites when post-processing
    /// is enabled.
    ///
    /// Errors are logged and turn into [`AppControl::Exit`].
    pub fn draw(&mut self, actors: &[&dyn Actor], camera: &dyn Camera) -> AppControl {
        let result = self
            .renderer
            .render(actors, camera)
            .and_then(|scene| Ok((scene, self.renderer.composite()?)));

        match result {
            Ok((scene, composite)) => {
                if let FrameOutcome::Rendered { draws } = scene {
                    log::trace!(
                        "frame {}: {draws} draws, composite {:?}",
                        self.time.frame_index,
                        composite
                    );
                }
                AppControl::Continue
            }
            Err(err) => {
                log::error!("frame {} failed: {err}", self.time.frame_index);
                AppControl::Exit
            }
        }
    }
}
