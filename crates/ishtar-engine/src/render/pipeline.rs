//! Fixed pipeline state shared by the post-process pass and actor materials.

use super::mesh::VERTEX_STRIDE;

/// Depth format of every pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

const MESH_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3, // position @ 0
    1 => Float32x2, // uv @ 12
    2 => Float32x3  // normal @ 20
];

/// Interleaved position/uv/normal layout, 32-byte stride, per-vertex stepping.
pub fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRS,
    }
}

/// Depth test with writes enabled and `Less` comparison.
pub fn scene_depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Triangle list, no culling.
pub fn scene_primitive() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// Builds a render pipeline of the mesh shape contract from one WGSL module
/// exposing `vs_main` and `fs_main`.
///
/// The layout is derived from the shader, so bind groups must be built from
/// the returned pipeline.
pub fn build_mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_src: &str,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: None,

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[mesh_vertex_layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: scene_primitive(),
        depth_stencil: Some(scene_depth_stencil()),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

/// Pipeline of the composite pass: samples the scene texture through the
/// full-screen quad and applies a square-root tone curve.
///
/// Group 0 expects `[texture, sampler]` at slots 0 and 1.
pub fn build_post_process_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    build_mesh_pipeline(
        device,
        "ishtar post-process pipeline",
        include_str!("shaders/post_process.wgsl"),
        color_format,
    )
}
