/// Clear color used by both the scene pass and the composite pass.
pub const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.09,
    g: 0.09,
    b: 0.09,
    a: 1.0,
};

/// Configuration for device negotiation, surface presentation and framing.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Backends the instance may use.
    pub backends: wgpu::Backends,

    /// Adapter preference. The renderer asks for the high-performance GPU by default.
    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and never tears.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for both surfaces.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surfaces.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Clear color of every pass.
    pub clear_color: wgpu::Color,

    /// Whether the post-process surface is the visible one at startup.
    pub post_processing: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            clear_color: BACKGROUND,
            post_processing: false,
        }
    }
}

impl RendererConfig {
    /// Builder-style toggle for the startup post-processing flag.
    pub fn with_post_processing(mut self, enabled: bool) -> Self {
        self.post_processing = enabled;
        self
    }

    pub(crate) fn instance_descriptor(&self) -> wgpu::InstanceDescriptor {
        wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        }
    }
}
