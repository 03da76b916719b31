//! Pass encoding for the scene and composite stages.
//!
//! Both functions record into a caller-owned encoder; opening, submitting
//! and presenting are left to the renderer.

use crate::device::{DeviceContext, RenderError};
use crate::scene::{is_same_object, Actor, Camera};

use super::bind::{build_bind_group, BindResource};
use super::buffer::matrix_uniform;
use super::ctx::PipelineCtx;
use super::mesh::Mesh;

/// Clears color to `clear` and depth to 1.0, storing both.
fn begin_cleared_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    color_view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// Actors of `actors` that get drawn: everything except `camera`, in input order.
pub fn drawable_actors<'a>(
    actors: &'a [&'a dyn Actor],
    camera: &'a dyn Camera,
) -> impl Iterator<Item = &'a dyn Actor> + 'a {
    actors
        .iter()
        .copied()
        .filter(move |actor| !is_same_object(*actor, camera))
}

/// Target views and per-frame parameters of one scene pass.
pub struct SceneAttachments<'a> {
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
    pub clear: wgpu::Color,
    /// Width / height of the color target.
    pub aspect: f32,
}

/// Records the scene pass and returns the number of draw calls issued.
///
/// Every drawable actor gets four fresh uniform buffers (world, view,
/// projection, rotation) bound at group 0. Actors with an empty mesh are
/// skipped since there is nothing to draw.
pub fn encode_scene_pass(
    ctx: &DeviceContext,
    pipelines: &PipelineCtx<'_>,
    encoder: &mut wgpu::CommandEncoder,
    attachments: &SceneAttachments<'_>,
    actors: &[&dyn Actor],
    camera: &dyn Camera,
) -> Result<u32, RenderError> {
    let mut rpass = begin_cleared_pass(
        encoder,
        "ishtar scene pass",
        attachments.color_view,
        attachments.depth_view,
        attachments.clear,
    );

    let view = camera.transform().view_transformation_matrix();
    let mut draws = 0u32;

    for actor in drawable_actors(actors, camera) {
        let mesh = actor.mesh();
        if mesh.is_empty() {
            log::trace!("skipping actor with empty mesh");
            continue;
        }

        let pipeline = actor.material().render_pipeline(pipelines)?;
        let vertex_buffer = mesh.vertex_buffer(ctx);

        let transform = actor.transform();
        let world = transform.transformation_matrix();
        let world_ubo = matrix_uniform(ctx, "ishtar world ubo", &world);
        let view_ubo = matrix_uniform(ctx, "ishtar view ubo", &view);
        let projection_ubo = camera.projection_buffer(ctx, attachments.aspect);
        let rotation = transform.rotation_matrix();
        let rotation_ubo = matrix_uniform(ctx, "ishtar rotation ubo", &rotation);

        let bind_group = build_bind_group(
            &ctx.device,
            &pipeline,
            0,
            &[
                BindResource::Buffer(&world_ubo),
                BindResource::Buffer(&view_ubo),
                BindResource::Buffer(&projection_ubo),
                BindResource::Buffer(&rotation_ubo),
            ],
        )?;

        rpass.set_pipeline(&pipeline);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..mesh.vertex_count(), 0..1);
        draws += 1;
    }

    Ok(draws)
}

/// Fixed inputs of the composite pass.
pub struct CompositeResources<'a> {
    pub pipeline: &'a wgpu::RenderPipeline,
    pub scene_texture: &'a wgpu::Texture,
    pub sampler: &'a wgpu::Sampler,
    pub quad: &'a Mesh,
}

/// Records the composite pass: the full-screen quad drawn with the
/// post-process pipeline, sampling the scene texture. Returns the number of
/// resources bound.
pub fn encode_composite_pass(
    ctx: &DeviceContext,
    encoder: &mut wgpu::CommandEncoder,
    color_view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
    clear: wgpu::Color,
    resources: &CompositeResources<'_>,
) -> Result<usize, RenderError> {
    let bindings = [
        BindResource::Texture(resources.scene_texture),
        BindResource::Sampler(resources.sampler),
    ];
    let bind_group = build_bind_group(&ctx.device, resources.pipeline, 0, &bindings)?;
    let quad_buffer = resources.quad.vertex_buffer(ctx);

    let mut rpass =
        begin_cleared_pass(encoder, "ishtar composite pass", color_view, depth_view, clear);
    rpass.set_pipeline(resources.pipeline);
    rpass.set_vertex_buffer(0, quad_buffer.slice(..));
    rpass.set_bind_group(0, &bind_group, &[]);
    rpass.draw(0..resources.quad.vertex_count(), 0..1);

    Ok(bindings.len())
}
