use winit::event::WindowEvent;

use crate::render::Renderer;
use crate::window::WindowTarget;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by programs driving the renderer.
pub trait App {
    /// Called for events of either window, before the runtime handles them.
    ///
    /// The renderer is handed over so input can flip post-processing.
    fn on_window_event(
        &mut self,
        event: &WindowEvent,
        renderer: &mut Renderer<WindowTarget>,
    ) -> AppControl {
        let _ = (event, renderer);
        AppControl::Continue
    }

    /// Called once per redraw of the visible window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
