use std::cell::Cell;
use std::sync::Arc;

use winit::window::Window;

use crate::device::{DrawableTarget, RenderError};

/// A `winit` window used as a presentation target.
///
/// Visibility is tracked locally: `Window::is_visible` is not supported on
/// every platform and may lag behind a request.
pub struct WindowTarget {
    window: Arc<Window>,
    visible: Cell<bool>,
}

impl WindowTarget {
    pub fn new(window: Arc<Window>) -> Self {
        let visible = window.is_visible().unwrap_or(true);
        Self {
            window,
            visible: Cell::new(visible),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl DrawableTarget for WindowTarget {
    fn pixel_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_visible(&self, visible: bool) {
        self.window.set_visible(visible);
        self.visible.set(visible);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn surface_target(&self) -> Result<wgpu::SurfaceTarget<'static>, RenderError> {
        Ok(wgpu::SurfaceTarget::from(self.window.clone()))
    }

    fn pre_present(&self) {
        self.window.pre_present_notify();
    }
}
