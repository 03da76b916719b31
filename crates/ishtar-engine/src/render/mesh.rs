use std::cell::OnceCell;

use crate::device::{DeviceContext, RenderError};

use super::buffer;

/// Floats per interleaved vertex: position (3), uv (2), normal (3).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Byte stride of one interleaved vertex.
pub const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

/// Interleaved vertex list with a lazily uploaded GPU vertex buffer.
///
/// The buffer is built on first use and reused until the content changes.
/// Every mutation drops the cached buffer; nothing is rebuilt eagerly.
#[derive(Debug, Default)]
pub struct Mesh {
    vertices: Vec<f32>,
    buffer: OnceCell<wgpu::Buffer>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from interleaved floats.
    ///
    /// Fails if `vertices.len()` is not a multiple of [`FLOATS_PER_VERTEX`].
    pub fn from_vertices(vertices: Vec<f32>) -> Result<Self, RenderError> {
        check_stride(vertices.len())?;
        Ok(Self {
            vertices,
            buffer: OnceCell::new(),
        })
    }

    /// Raw interleaved floats.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Replaces the content and invalidates the cached buffer.
    pub fn set_vertices(&mut self, vertices: Vec<f32>) -> Result<(), RenderError> {
        check_stride(vertices.len())?;
        self.vertices = vertices;
        self.invalidate();
        Ok(())
    }

    /// Appends one vertex and invalidates the cached buffer.
    pub fn add_vertex(&mut self, position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) {
        self.vertices.extend_from_slice(&position);
        self.vertices.extend_from_slice(&uv);
        self.vertices.extend_from_slice(&normal);
        self.invalidate();
    }

    pub fn float_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of vertices a draw of this mesh covers.
    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / FLOATS_PER_VERTEX) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Size in bytes of the GPU buffer for the current content.
    pub fn byte_len(&self) -> u64 {
        (self.vertices.len() * std::mem::size_of::<f32>()) as u64
    }

    /// Whether a GPU buffer for the current content exists.
    pub fn is_uploaded(&self) -> bool {
        self.buffer.get().is_some()
    }

    /// Returns the GPU vertex buffer, uploading the content on first use.
    pub fn vertex_buffer(&self, ctx: &DeviceContext) -> &wgpu::Buffer {
        self.buffer.get_or_init(|| {
            log::trace!("uploading mesh: {} vertices", self.vertex_count());
            buffer::vertex_buffer(ctx, "ishtar mesh vbo", &self.vertices)
        })
    }

    fn invalidate(&mut self) {
        self.buffer.take();
    }
}

fn check_stride(floats: usize) -> Result<(), RenderError> {
    if floats % FLOATS_PER_VERTEX != 0 {
        return Err(RenderError::InvalidVertexData {
            floats,
            stride: FLOATS_PER_VERTEX,
        });
    }
    Ok(())
}
