use crate::device::{
    acquire_context, DeviceContext, DrawableTarget, RenderError, RenderSurface, RendererConfig,
};
use crate::scene::{Actor, Camera};
use crate::window::{ResizeNotifier, ResizeSubscription};

use super::ctx::PipelineCtx;
use super::mesh::Mesh;
use super::pass::{
    encode_composite_pass, encode_scene_pass, CompositeResources, SceneAttachments,
};
use super::pipeline::{build_post_process_pipeline, DEPTH_FORMAT};
use super::present::apply_visibility;
use super::quad::quad_mesh;
use super::targets::{linear_sampler, DepthTarget, SceneTarget};

/// Lifecycle position of a [`Renderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererStatus {
    /// Surfaces exist, no device yet.
    Uninitialized,
    /// Adapter/device request in flight.
    Negotiating,
    /// Fully usable.
    Ready,
    /// Negotiation or finalization failed; terminal.
    Failed,
}

impl RendererStatus {
    pub fn name(self) -> &'static str {
        match self {
            RendererStatus::Uninitialized => "uninitialized",
            RendererStatus::Negotiating => "negotiating",
            RendererStatus::Ready => "ready",
            RendererStatus::Failed => "failed",
        }
    }
}

/// Result of a frame entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was recorded or submitted.
    Skipped,
    /// One command buffer was submitted with `draws` draw calls.
    Rendered { draws: u32 },
}

/// Running counters, mostly for diagnostics and tests.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct FrameStats {
    /// Scene command buffers submitted.
    pub scene_submissions: u64,
    /// Composite command buffers submitted.
    pub composite_submissions: u64,
    /// Scene draw calls issued in total.
    pub draws: u64,
    /// Depth/scene target rebuilds caused by resizes.
    pub resizes: u64,
}

/// Everything that only exists once a device is bound.
struct Ready {
    ctx: DeviceContext,
    scene_format: wgpu::TextureFormat,
    depth: DepthTarget,
    scene_target: SceneTarget,
    post_pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    quad: Mesh,
    resize: ResizeSubscription,
}

enum RendererState {
    Uninitialized,
    Negotiating,
    Ready(Box<Ready>),
    Failed,
}

impl RendererState {
    fn status(&self) -> RendererStatus {
        match self {
            RendererState::Uninitialized => RendererStatus::Uninitialized,
            RendererState::Negotiating => RendererStatus::Negotiating,
            RendererState::Ready(_) => RendererStatus::Ready,
            RendererState::Failed => RendererStatus::Failed,
        }
    }
}

/// Frame orchestrator.
///
/// Owns the device, both presentation surfaces and every size-dependent
/// attachment. Per frame the caller invokes [`Renderer::render`] and then
/// [`Renderer::composite`]; the latter only does work while post-processing
/// is enabled.
///
/// Lifecycle: [`Renderer::new`] → [`Renderer::initialize`] (async) → ready.
/// There is no way back: a failed negotiation leaves the renderer inert.
pub struct Renderer<T: DrawableTarget> {
    config: RendererConfig,
    instance: wgpu::Instance,
    primary: RenderSurface<T>,
    post: RenderSurface<T>,
    resize_notifier: ResizeNotifier,
    state: RendererState,
    post_processing: bool,
    stats: FrameStats,
}

impl<T: DrawableTarget> Renderer<T> {
    /// Creates the GPU instance and both presentation surfaces.
    ///
    /// Visibility is applied immediately from `config.post_processing`.
    pub fn new(
        config: RendererConfig,
        primary: T,
        post: T,
        resize_notifier: ResizeNotifier,
    ) -> Result<Self, RenderError> {
        if config.backends.is_empty() {
            return Err(RenderError::NoGpuCapability(
                "no wgpu backend enabled".to_string(),
            ));
        }

        let instance = wgpu::Instance::new(&config.instance_descriptor());
        let primary = RenderSurface::new(&instance, primary)?;
        let post = RenderSurface::new(&instance, post)?;

        let post_processing = config.post_processing;
        apply_visibility(primary.target(), post.target(), post_processing);

        Ok(Self {
            config,
            instance,
            primary,
            post,
            resize_notifier,
            state: RendererState::Uninitialized,
            post_processing,
            stats: FrameStats::default(),
        })
    }

    /// Negotiates adapter and device, then builds every device resource.
    ///
    /// The renderer becomes ready only after all of it succeeded.
    pub async fn initialize(&mut self) -> Result<(), RenderError> {
        if !matches!(self.state, RendererState::Uninitialized) {
            return Err(RenderError::InvalidState {
                expected: RendererStatus::Uninitialized.name(),
                found: self.status().name(),
            });
        }

        self.state = RendererState::Negotiating;
        log::info!("negotiating GPU device");

        let negotiated =
            acquire_context(&self.instance, self.primary.raw(), &self.config).await;
        let result = negotiated.and_then(|ctx| self.finalize(ctx));

        match result {
            Ok(ready) => {
                self.state = RendererState::Ready(Box::new(ready));
                log::info!("renderer ready");
                Ok(())
            }
            Err(e) => {
                log::error!("renderer initialization failed: {e}");
                self.state = RendererState::Failed;
                Err(e)
            }
        }
    }

    fn finalize(&mut self, ctx: DeviceContext) -> Result<Ready, RenderError> {
        let scene_format = self.primary.configure(&ctx, &self.config)?;
        let post_format = self.post.configure(&ctx, &self.config)?;
        log::debug!("surface formats: scene {scene_format:?}, post-process {post_format:?}");

        let size = self.primary.size();
        let depth = DepthTarget::new(&ctx.device, size);
        let scene_target = SceneTarget::new(&ctx.device, size, scene_format);
        let post_pipeline = build_post_process_pipeline(&ctx.device, post_format);
        let sampler = linear_sampler(&ctx.device);

        let quad = quad_mesh();
        quad.vertex_buffer(&ctx);

        let resize = self.resize_notifier.subscribe();

        Ok(Ready {
            ctx,
            scene_format,
            depth,
            scene_target,
            post_pipeline,
            sampler,
            quad,
            resize,
        })
    }

    pub fn status(&self) -> RendererStatus {
        self.state.status()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, RendererState::Ready(_))
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Device context; fails before the renderer is ready.
    pub fn context(&self) -> Result<&DeviceContext, RenderError> {
        match &self.state {
            RendererState::Ready(ready) => Ok(&ready.ctx),
            _ => Err(RenderError::DeviceNotAvailable),
        }
    }

    /// Logical device; fails before the renderer is ready.
    pub fn device(&self) -> Result<&wgpu::Device, RenderError> {
        self.context().map(|ctx| &ctx.device)
    }

    /// Device and formats materials compile their pipelines against.
    pub fn pipeline_ctx(&self) -> Result<PipelineCtx<'_>, RenderError> {
        match &self.state {
            RendererState::Ready(ready) => Ok(PipelineCtx::new(
                &ready.ctx.device,
                ready.scene_format,
                DEPTH_FORMAT,
            )),
            _ => Err(RenderError::DeviceNotAvailable),
        }
    }

    pub fn primary_surface(&self) -> &RenderSurface<T> {
        &self.primary
    }

    pub fn post_process_surface(&self) -> &RenderSurface<T> {
        &self.post
    }

    /// Size of the current depth attachment, once ready.
    pub fn depth_size(&self) -> Option<(u32, u32)> {
        match &self.state {
            RendererState::Ready(ready) => Some(ready.depth.size()),
            _ => None,
        }
    }

    pub fn uses_post_processing(&self) -> bool {
        self.post_processing
    }

    /// Switches which surface is displayed. No GPU resource is touched.
    pub fn set_use_post_processing(&mut self, enabled: bool) {
        if self.post_processing != enabled {
            log::info!("post-processing {}", if enabled { "enabled" } else { "disabled" });
        }
        self.post_processing = enabled;
        apply_visibility(self.primary.target(), self.post.target(), enabled);
    }

    /// Renders one frame of `actors` seen from `camera`.
    ///
    /// The camera is never drawn, even when it appears in `actors`. Outside
    /// the ready state this does nothing.
    pub fn render(
        &mut self,
        actors: &[&dyn Actor],
        camera: &dyn Camera,
    ) -> Result<FrameOutcome, RenderError> {
        let RendererState::Ready(ready) = &mut self.state else {
            log::trace!("render skipped: renderer not ready");
            return Ok(FrameOutcome::Skipped);
        };

        if ready.resize.take_pending() {
            apply_resize(ready, &mut self.primary, &mut self.post);
            self.stats.resizes += 1;
        }

        let frame = if self.post_processing {
            None
        } else {
            match self.primary.acquire(&ready.ctx)? {
                Some(frame) => Some(frame),
                None => return Ok(FrameOutcome::Skipped),
            }
        };
        let color_view = match &frame {
            Some(frame) => &frame.view,
            None => &ready.scene_target.view,
        };

        let mut encoder = ready
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ishtar scene encoder"),
            });

        let pipelines = PipelineCtx::new(&ready.ctx.device, ready.scene_format, DEPTH_FORMAT);
        let (width, height) = ready.depth.size();
        let attachments = SceneAttachments {
            color_view,
            depth_view: &ready.depth.view,
            clear: self.config.clear_color,
            aspect: width as f32 / height as f32,
        };

        let draws = encode_scene_pass(
            &ready.ctx,
            &pipelines,
            &mut encoder,
            &attachments,
            actors,
            camera,
        )?;

        ready.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.stats.scene_submissions += 1;
        self.stats.draws += u64::from(draws);

        if let Some(frame) = frame {
            self.primary.target().pre_present();
            frame.present();
        }

        Ok(FrameOutcome::Rendered { draws })
    }

    /// Composites the last scene render onto the post-process surface.
    ///
    /// Does nothing unless the renderer is ready and post-processing is
    /// enabled. A frame whose post-process surface disagrees in size with the
    /// depth attachment (resize still in flight) is skipped.
    pub fn composite(&mut self) -> Result<FrameOutcome, RenderError> {
        if !self.post_processing {
            return Ok(FrameOutcome::Skipped);
        }
        let RendererState::Ready(ready) = &mut self.state else {
            return Ok(FrameOutcome::Skipped);
        };

        let depth_size = ready.depth.size();
        if self.post.size() != depth_size {
            log::debug!(
                "composite skipped: post-process surface {:?} vs depth {:?}",
                self.post.size(),
                depth_size
            );
            return Ok(FrameOutcome::Skipped);
        }

        let Some(frame) = self.post.acquire(&ready.ctx)? else {
            return Ok(FrameOutcome::Skipped);
        };

        let mut encoder = ready
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ishtar composite encoder"),
            });

        let resources = CompositeResources {
            pipeline: &ready.post_pipeline,
            scene_texture: &ready.scene_target.texture,
            sampler: &ready.sampler,
            quad: &ready.quad,
        };
        encode_composite_pass(
            &ready.ctx,
            &mut encoder,
            &frame.view,
            &ready.depth.view,
            self.config.clear_color,
            &resources,
        )?;

        ready.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.stats.composite_submissions += 1;

        self.post.target().pre_present();
        frame.present();

        Ok(FrameOutcome::Rendered { draws: 1 })
    }
}

/// Re-derives both surfaces and rebuilds the attachments sized to the primary.
fn apply_resize<T: DrawableTarget>(
    ready: &mut Ready,
    primary: &mut RenderSurface<T>,
    post: &mut RenderSurface<T>,
) {
    primary.resize(&ready.ctx);
    post.resize(&ready.ctx);

    let size = primary.size();
    if size.0 == 0 || size.1 == 0 {
        log::debug!("resize to {size:?} deferred");
        return;
    }

    ready.depth = DepthTarget::new(&ready.ctx.device, size);
    ready.scene_target = SceneTarget::new(&ready.ctx.device, size, ready.scene_format);
    log::debug!("attachments rebuilt at {}x{}", size.0, size.1);
}
