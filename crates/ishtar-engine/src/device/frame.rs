/// Represents a single acquired surface frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct SurfaceFrame {
    /// Swapchain texture; `None` for off-screen targets.
    pub surface_texture: Option<wgpu::SurfaceTexture>,
    pub view: wgpu::TextureView,
}

impl SurfaceFrame {
    /// Presents the frame. Must be called after the frame's commands were submitted.
    ///
    /// Off-screen frames have nothing to present; the texture keeps the content.
    pub fn present(self) {
        drop(self.view);
        if let Some(texture) = self.surface_texture {
            texture.present();
        }
    }
}
