//! GPU buffer construction for raw numeric payloads.

use glam::Mat4;

use crate::device::DeviceContext;

/// Allocates a buffer sized to `contents` and uploads it through the queue.
///
/// `COPY_DST` is always added to `usage` so the upload can go through
/// `Queue::write_buffer`.
pub fn upload_buffer(
    ctx: &DeviceContext,
    label: &str,
    usage: wgpu::BufferUsages,
    contents: &[u8],
) -> wgpu::Buffer {
    let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: contents.len() as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    if !contents.is_empty() {
        ctx.queue.write_buffer(&buffer, 0, contents);
    }

    buffer
}

/// Uniform buffer holding `payload`, read-only from shaders.
pub fn uniform_buffer(ctx: &DeviceContext, label: &str, payload: &[f32]) -> wgpu::Buffer {
    upload_buffer(
        ctx,
        label,
        wgpu::BufferUsages::UNIFORM,
        bytemuck::cast_slice(payload),
    )
}

/// 64-byte uniform buffer holding a column-major 4x4 matrix.
pub fn matrix_uniform(ctx: &DeviceContext, label: &str, matrix: &Mat4) -> wgpu::Buffer {
    uniform_buffer(ctx, label, &matrix.to_cols_array())
}

/// Vertex buffer holding interleaved vertex floats.
pub fn vertex_buffer(ctx: &DeviceContext, label: &str, floats: &[f32]) -> wgpu::Buffer {
    upload_buffer(
        ctx,
        label,
        wgpu::BufferUsages::VERTEX,
        bytemuck::cast_slice(floats),
    )
}
