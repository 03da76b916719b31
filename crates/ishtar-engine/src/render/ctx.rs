/// Device and format source handed to materials when they build pipelines.
///
/// This is intentionally small and stable: materials never see the renderer
/// itself, only what they need to compile a pipeline against its targets.
#[derive(Clone, Copy)]
pub struct PipelineCtx<'a> {
    pub device: &'a wgpu::Device,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

impl<'a> PipelineCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            color_format,
            depth_format,
        }
    }
}
