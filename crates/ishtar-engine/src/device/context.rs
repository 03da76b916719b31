use super::{RenderError, RendererConfig};

/// Adapter, logical device and queue produced by negotiation.
///
/// Created once and owned by the renderer. wgpu handles are reference
/// counted, so clones share the same underlying objects.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// Requests an adapter and then a device.
///
/// This is the only suspension point of the renderer's lifetime. Failure is
/// terminal; nothing here retries.
pub async fn acquire_context(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
    config: &RendererConfig,
) -> Result<DeviceContext, RenderError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: config.power_preference,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await?;

    let info = adapter.get_info();
    log::info!(
        "adapter selected: {} ({:?}, {:?})",
        info.name,
        info.backend,
        info.device_type
    );

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("ishtar device"),
            required_features: config.required_features,
            required_limits: config.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await?;

    Ok(DeviceContext {
        adapter,
        device,
        queue,
    })
}
