//! GPU rendering subsystem.
//!
//! Two stages per frame: the scene pass draws every actor into either the
//! primary surface or an off-screen texture, and the composite pass samples
//! that texture through a full-screen quad onto the post-process surface.
//!
//! Convention:
//! - vertices are interleaved position (3), uv (2), normal (3) floats
//! - matrices are column-major `glam::Mat4`, clip depth in `[0, 1]`

pub mod buffer;

mod bind;
mod ctx;
mod mesh;
mod pass;
mod pipeline;
mod present;
mod quad;
mod renderer;
mod targets;

pub use bind::{build_bind_group, BindResource, BindResourceKind};
pub use ctx::PipelineCtx;
pub use mesh::{Mesh, FLOATS_PER_VERTEX, VERTEX_STRIDE};
pub use pass::{
    drawable_actors, encode_composite_pass, encode_scene_pass, CompositeResources,
    SceneAttachments,
};
pub use pipeline::{
    build_mesh_pipeline, build_post_process_pipeline, mesh_vertex_layout, scene_depth_stencil,
    scene_primitive, DEPTH_FORMAT,
};
pub use quad::{quad_mesh, QUAD_VERTICES};
pub use renderer::{FrameOutcome, FrameStats, Renderer, RendererStatus};
pub use targets::{linear_sampler, DepthTarget, SceneTarget};
