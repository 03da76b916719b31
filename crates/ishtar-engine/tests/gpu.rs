//! Checks that need a real adapter. Each test returns early when the host
//! has none, so they pass on GPU-less CI.

use std::rc::Rc;

use glam::Vec3;
use ishtar_engine::device::{
    acquire_context, DeviceContext, DrawableTarget, OffscreenTarget, RenderError, RendererConfig,
};
use ishtar_engine::render::{
    build_bind_group, build_mesh_pipeline, build_post_process_pipeline, buffer,
    encode_composite_pass, encode_scene_pass, linear_sampler, quad_mesh, BindResource,
    BindResourceKind, CompositeResources, DepthTarget, Mesh, PipelineCtx, SceneAttachments,
    FrameOutcome, FrameStats, Renderer, RendererStatus, SceneTarget, DEPTH_FORMAT,
};
use ishtar_engine::scene::{
    shapes, Actor, BasicMaterial, Material, MeshActor, PerspectiveCamera, Transform,
};
use ishtar_engine::window::ResizeNotifier;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const SIZE: (u32, u32) = (64, 48);

const TEXTURED_SHADER: &str = r#"
struct Matrix { m: mat4x4<f32> };

@group(0) @binding(0) var<uniform> u: Matrix;
@group(0) @binding(1) var t: texture_2d<f32>;
@group(0) @binding(2) var s: sampler;

struct VOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) p: vec3<f32>, @location(1) uv: vec2<f32>) -> VOut {
    var o: VOut;
    o.pos = u.m * vec4<f32>(p, 1.0);
    o.uv = uv;
    return o;
}

@fragment
fn fs_main(i: VOut) -> @location(0) vec4<f32> {
    return textureSample(t, s, i.uv);
}
"#;

fn headless() -> Option<DeviceContext> {
    let config = RendererConfig::default();
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: config.backends,
        ..Default::default()
    });
    match pollster::block_on(acquire_context(&instance, None, &config)) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

fn offscreen_renderer(post_processing: bool) -> (Renderer<OffscreenTarget>, ResizeNotifier) {
    let notifier = ResizeNotifier::new();
    let config = RendererConfig::default().with_post_processing(post_processing);
    let renderer = Renderer::new(
        config,
        OffscreenTarget::new(SIZE),
        OffscreenTarget::new(SIZE),
        notifier.clone(),
    )
    .expect("off-screen targets need no window");
    (renderer, notifier)
}

fn ready_renderer(post_processing: bool) -> Option<(Renderer<OffscreenTarget>, ResizeNotifier)> {
    let (mut renderer, notifier) = offscreen_renderer(post_processing);
    match pollster::block_on(renderer.initialize()) {
        Ok(()) => Some((renderer, notifier)),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

fn cube_in_view() -> MeshActor {
    MeshActor::new(
        shapes::cube(1.0),
        Rc::new(BasicMaterial::new()),
        Transform::from_translation(Vec3::new(0.0, 0.0, -4.0)),
    )
}

fn encoder(ctx: &DeviceContext) -> wgpu::CommandEncoder {
    ctx.device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("test") })
}

#[test]
fn mesh_buffer_is_cached_until_vertices_change() {
    let Some(ctx) = headless() else { return };

    let mut mesh = shapes::cube(1.0);
    assert!(!mesh.is_uploaded());

    let first = mesh.vertex_buffer(&ctx).clone();
    assert!(mesh.vertex_buffer(&ctx) == &first);
    assert!(mesh.is_uploaded());
    assert_eq!(mesh.vertex_buffer(&ctx).size(), mesh.vertices().len() as u64 * 4);

    mesh.add_vertex([0.0; 3], [0.0; 2], [0.0, 0.0, 1.0]);
    mesh.add_vertex([1.0, 0.0, 0.0], [1.0, 0.0], [0.0, 0.0, 1.0]);
    mesh.add_vertex([0.0, 1.0, 0.0], [0.0, 1.0], [0.0, 0.0, 1.0]);
    assert!(!mesh.is_uploaded());
    assert_eq!(mesh.vertex_buffer(&ctx).size(), 39 * 32);
}

#[test]
fn bind_group_accepts_buffer_texture_and_sampler() {
    let Some(ctx) = headless() else { return };

    let pipeline = build_mesh_pipeline(&ctx.device, "textured", TEXTURED_SHADER, COLOR_FORMAT);
    let uniform = buffer::matrix_uniform(&ctx, "test ubo", &glam::Mat4::IDENTITY);
    let texture = SceneTarget::new(&ctx.device, SIZE, COLOR_FORMAT);
    let sampler = linear_sampler(&ctx.device);

    let group = build_bind_group(
        &ctx.device,
        &pipeline,
        0,
        &[
            BindResource::Buffer(&uniform),
            BindResource::from(&texture.texture),
            BindResource::Sampler(&sampler),
        ],
    );
    assert!(group.is_ok());
}

#[test]
fn bind_group_over_device_limit_is_rejected() {
    let Some(ctx) = headless() else { return };

    let pipeline = build_mesh_pipeline(&ctx.device, "textured", TEXTURED_SHADER, COLOR_FORMAT);
    let uniform = buffer::matrix_uniform(&ctx, "test ubo", &glam::Mat4::IDENTITY);
    let limit = ctx.device.limits().max_bindings_per_bind_group as usize;
    let resources = vec![BindResource::Buffer(&uniform); limit + 1];

    let err = build_bind_group(&ctx.device, &pipeline, 0, &resources).err();
    assert!(matches!(err, Some(RenderError::BindingShape(_))));
}

#[test]
fn empty_bind_group_is_rejected() {
    let Some(ctx) = headless() else { return };

    let pipeline = build_mesh_pipeline(&ctx.device, "textured", TEXTURED_SHADER, COLOR_FORMAT);
    let err = build_bind_group(&ctx.device, &pipeline, 0, &[]).err();
    assert!(matches!(err, Some(RenderError::BindingShape(_))));
}

#[test]
fn resource_kinds_follow_the_variant() {
    let Some(ctx) = headless() else { return };

    let uniform = buffer::matrix_uniform(&ctx, "test ubo", &glam::Mat4::IDENTITY);
    let texture = SceneTarget::new(&ctx.device, SIZE, COLOR_FORMAT);
    let sampler = linear_sampler(&ctx.device);

    assert_eq!(BindResource::from(&uniform).kind(), BindResourceKind::Buffer);
    assert_eq!(BindResource::from(&texture.texture).kind(), BindResourceKind::Texture);
    assert_eq!(BindResource::from(&sampler).kind(), BindResourceKind::Sampler);
}

#[test]
fn scene_pass_skips_camera_and_empty_meshes() {
    let Some(ctx) = headless() else { return };

    let depth = DepthTarget::new(&ctx.device, SIZE);
    let target = SceneTarget::new(&ctx.device, SIZE, COLOR_FORMAT);
    let pipelines = PipelineCtx::new(&ctx.device, COLOR_FORMAT, DEPTH_FORMAT);
    let attachments = SceneAttachments {
        color_view: &target.view,
        depth_view: &depth.view,
        clear: wgpu::Color::BLACK,
        aspect: SIZE.0 as f32 / SIZE.1 as f32,
    };

    let material: Rc<dyn Material> = Rc::new(BasicMaterial::new());
    let cube = MeshActor::new(
        shapes::cube(1.0),
        material.clone(),
        Transform::from_translation(Vec3::new(0.0, 0.0, -4.0)),
    );
    let pyramid = MeshActor::new(
        shapes::pyramid(1.0),
        material.clone(),
        Transform::from_translation(Vec3::new(1.0, 0.0, -5.0)),
    );
    let empty = MeshActor::new(Mesh::new(), material, Transform::default());
    let camera = PerspectiveCamera::default();

    let actors: [&dyn Actor; 4] = [&cube, &camera, &empty, &pyramid];
    let mut enc = encoder(&ctx);
    let draws = encode_scene_pass(&ctx, &pipelines, &mut enc, &attachments, &actors, &camera);
    assert_eq!(draws.ok(), Some(2));
    ctx.queue.submit(std::iter::once(enc.finish()));

    let mut enc = encoder(&ctx);
    let draws = encode_scene_pass(&ctx, &pipelines, &mut enc, &attachments, &[], &camera);
    assert_eq!(draws.ok(), Some(0));
    ctx.queue.submit(std::iter::once(enc.finish()));
}

#[test]
fn composite_pass_binds_texture_and_sampler() {
    let Some(ctx) = headless() else { return };

    let depth = DepthTarget::new(&ctx.device, SIZE);
    let scene = SceneTarget::new(&ctx.device, SIZE, COLOR_FORMAT);
    let output = SceneTarget::new(&ctx.device, SIZE, COLOR_FORMAT);
    let pipeline = build_post_process_pipeline(&ctx.device, COLOR_FORMAT);
    let sampler = linear_sampler(&ctx.device);
    let quad = quad_mesh();

    let resources = CompositeResources {
        pipeline: &pipeline,
        scene_texture: &scene.texture,
        sampler: &sampler,
        quad: &quad,
    };

    let mut enc = encoder(&ctx);
    let bound = encode_composite_pass(
        &ctx,
        &mut enc,
        &output.view,
        &depth.view,
        wgpu::Color::BLACK,
        &resources,
    );
    assert_eq!(bound.ok(), Some(2));
    ctx.queue.submit(std::iter::once(enc.finish()));
    assert!(quad.is_uploaded());
}

#[test]
fn set_vertices_rebuilds_an_uploaded_buffer() {
    let Some(ctx) = headless() else { return };

    let mut mesh = Mesh::from_vertices(vec![0.5; 24]).expect("three vertices");
    let first = mesh.vertex_buffer(&ctx).clone();
    assert_eq!(first.size(), 96);

    mesh.set_vertices(vec![0.25; 48]).expect("six vertices");
    assert!(!mesh.is_uploaded());

    let rebuilt = mesh.vertex_buffer(&ctx);
    assert!(rebuilt != &first);
    assert_eq!(rebuilt.size(), 48 * 4);
    assert_eq!(mesh.vertex_count(), 6);
}

#[test]
fn renderer_does_nothing_before_initialize() {
    let (mut renderer, _notifier) = offscreen_renderer(false);
    let camera = PerspectiveCamera::default();
    let cube = cube_in_view();
    let actors: [&dyn Actor; 2] = [&cube, &camera];

    assert_eq!(renderer.status(), RendererStatus::Uninitialized);
    assert!(!renderer.is_ready());
    assert!(matches!(renderer.render(&actors, &camera), Ok(FrameOutcome::Skipped)));
    assert!(matches!(renderer.composite(), Ok(FrameOutcome::Skipped)));
    assert!(matches!(renderer.device(), Err(RenderError::DeviceNotAvailable)));
    assert_eq!(renderer.depth_size(), None);
    assert_eq!(renderer.stats(), FrameStats::default());
}

#[test]
fn post_processing_toggle_keeps_exactly_one_target_visible() {
    let (mut renderer, _notifier) = offscreen_renderer(false);
    let visible = |r: &Renderer<OffscreenTarget>| {
        (
            r.primary_surface().target().is_visible(),
            r.post_process_surface().target().is_visible(),
        )
    };

    assert_eq!(visible(&renderer), (true, false));
    for enabled in [true, true, false, true, false, false] {
        renderer.set_use_post_processing(enabled);
        assert_eq!(renderer.uses_post_processing(), enabled);
        assert_eq!(visible(&renderer), (!enabled, enabled));
    }
}

#[test]
fn ready_renderer_submits_once_per_render() {
    let Some((mut renderer, _notifier)) = ready_renderer(false) else { return };

    assert!(renderer.is_ready());
    assert!(renderer.primary_surface().is_configured());
    assert_eq!(
        renderer.primary_surface().format(),
        Some(wgpu::TextureFormat::Rgba8UnormSrgb)
    );

    let camera = PerspectiveCamera::default();
    let cube = cube_in_view();
    let actors: [&dyn Actor; 2] = [&cube, &camera];

    for frame in 1..=3u64 {
        let outcome = renderer.render(&actors, &camera);
        assert!(matches!(outcome, Ok(FrameOutcome::Rendered { draws: 1 })));
        assert_eq!(renderer.stats().scene_submissions, frame);
        assert_eq!(renderer.stats().draws, frame);
    }
    assert_eq!(renderer.stats().composite_submissions, 0);
}

#[test]
fn empty_actor_list_still_submits_a_cleared_pass() {
    let Some((mut renderer, _notifier)) = ready_renderer(false) else { return };
    let camera = PerspectiveCamera::default();

    let outcome = renderer.render(&[], &camera);
    assert!(matches!(outcome, Ok(FrameOutcome::Rendered { draws: 0 })));
    assert_eq!(renderer.stats().scene_submissions, 1);
    assert_eq!(renderer.stats().draws, 0);
}

#[test]
fn resize_notification_rebuilds_depth_before_next_frame() {
    let Some((mut renderer, notifier)) = ready_renderer(false) else { return };
    let camera = PerspectiveCamera::default();
    assert_eq!(renderer.depth_size(), Some(SIZE));

    let resized = (128, 96);
    renderer.primary_surface().target().set_size(resized);
    renderer.post_process_surface().target().set_size(resized);
    assert_eq!(notifier.notify(), 1);

    // Applied lazily by the next frame.
    assert_eq!(renderer.depth_size(), Some(SIZE));

    assert!(matches!(renderer.render(&[], &camera), Ok(FrameOutcome::Rendered { .. })));
    assert_eq!(renderer.depth_size(), Some(resized));
    assert_eq!(renderer.primary_surface().size(), resized);
    assert_eq!(renderer.post_process_surface().size(), resized);
    assert_eq!(renderer.stats().resizes, 1);

    let texture = renderer.primary_surface().offscreen_texture().expect("configured");
    assert_eq!((texture.width(), texture.height()), resized);
}

#[test]
fn composite_runs_only_with_post_processing() {
    let Some((mut renderer, _notifier)) = ready_renderer(false) else { return };
    let camera = PerspectiveCamera::default();
    let cube = cube_in_view();
    let actors: [&dyn Actor; 1] = [&cube];

    renderer.render(&actors, &camera).expect("scene frame");
    assert!(matches!(renderer.composite(), Ok(FrameOutcome::Skipped)));
    assert_eq!(renderer.stats().composite_submissions, 0);

    renderer.set_use_post_processing(true);
    assert!(matches!(
        renderer.render(&actors, &camera),
        Ok(FrameOutcome::Rendered { draws: 1 })
    ));
    assert!(matches!(renderer.composite(), Ok(FrameOutcome::Rendered { .. })));

    let stats = renderer.stats();
    assert_eq!(stats.scene_submissions, 2);
    assert_eq!(stats.composite_submissions, 1);
}

#[test]
fn composite_skipped_while_surface_sizes_disagree() {
    let Some((mut renderer, notifier)) = ready_renderer(true) else { return };
    let camera = PerspectiveCamera::default();

    renderer.post_process_surface().target().set_size((32, 32));
    notifier.notify();
    renderer.render(&[], &camera).expect("scene frame");

    assert_eq!(renderer.depth_size(), Some(SIZE));
    assert!(matches!(renderer.composite(), Ok(FrameOutcome::Skipped)));
    assert_eq!(renderer.stats().composite_submissions, 0);
}

#[test]
fn initialize_twice_is_rejected() {
    let Some((mut renderer, _notifier)) = ready_renderer(false) else { return };

    let second = pollster::block_on(renderer.initialize());
    assert!(matches!(
        second,
        Err(RenderError::InvalidState { expected: "uninitialized", found: "ready" })
    ));
    assert_eq!(renderer.status(), RendererStatus::Ready);
}
