use thiserror::Error;

/// Errors raised by the GPU layer and the frame orchestrator.
///
/// None of these are retried internally. Recovery (restarting negotiation,
/// recreating a window) is left to the caller.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The host exposes no usable GPU backend.
    #[error("no GPU capability on this host: {0}")]
    NoGpuCapability(String),

    /// No adapter matched the requested power preference.
    #[error("failed to find a suitable GPU adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a logical device.
    #[error("failed to create wgpu device/queue: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// A drawable target could not yield a presentation surface.
    #[error("failed to create presentation surface: {0}")]
    ContextFailure(String),

    /// The surface reports no formats for the negotiated adapter.
    #[error("no supported surface formats")]
    NoSurfaceFormat,

    /// Surface acquisition failed in a way that cannot be recovered.
    #[error("surface lost: {0}")]
    SurfaceLost(wgpu::SurfaceError),

    /// A device accessor was used before the renderer reached the ready state.
    #[error("device not available")]
    DeviceNotAvailable,

    /// A lifecycle call was made in the wrong state.
    #[error("invalid renderer state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    /// The actor's material cannot produce a pipeline.
    #[error("material has no render pipeline")]
    NoMaterial,

    /// A bind-group resource list does not fit the pipeline layout.
    #[error("bind group shape mismatch: {0}")]
    BindingShape(String),

    /// Interleaved vertex data is not a whole number of vertices.
    #[error("vertex data has {floats} floats, not a multiple of {stride}")]
    InvalidVertexData { floats: usize, stride: usize },
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM).
    Fatal,
}
