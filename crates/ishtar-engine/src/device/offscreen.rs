use std::cell::Cell;

use super::{DrawableTarget, RenderError};

/// A drawable with no host window.
///
/// Frames land in a texture owned by the [`super::RenderSurface`], which
/// makes the whole renderer usable without a windowing system. Size and
/// visibility are plain state that the owner drives.
#[derive(Debug)]
pub struct OffscreenTarget {
    size: Cell<(u32, u32)>,
    visible: Cell<bool>,
}

impl OffscreenTarget {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size: Cell::new(size),
            visible: Cell::new(false),
        }
    }

    /// Changes the reported pixel size. Takes effect at the next resize.
    pub fn set_size(&self, size: (u32, u32)) {
        self.size.set(size);
    }
}

impl DrawableTarget for OffscreenTarget {
    fn pixel_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn surface_target(&self) -> Result<wgpu::SurfaceTarget<'static>, RenderError> {
        Err(RenderError::ContextFailure(
            "off-screen target has no presentation surface".to_string(),
        ))
    }

    fn is_offscreen(&self) -> bool {
        true
    }
}
