use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, FrameTime};
use crate::device::RendererConfig;
use crate::render::Renderer;

use super::{ResizeNotifier, WindowTarget};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Title of the window showing the scene directly.
    pub title: String,
    /// Title of the window showing the post-processed scene.
    pub post_process_title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ishtar".to_string(),
            post_process_title: "ishtar (post-processed)".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    exit_requested: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, renderer_config: RendererConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, renderer_config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// Delta-time source; clamped so a stall does not produce a huge step.
struct FrameClock {
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    const DT_MAX: Duration = Duration::from_millis(250);

    fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
        }
    }

    fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).min(Self::DT_MAX);
        self.last = now;

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }
}

/// Windows and renderer, created once the event loop is running.
struct Host {
    renderer: Renderer<WindowTarget>,
    primary_id: WindowId,
    post_id: WindowId,
    clock: FrameClock,
}

impl Host {
    fn primary(&self) -> &WindowTarget {
        self.renderer.primary_surface().target()
    }

    fn post(&self) -> &WindowTarget {
        self.renderer.post_process_surface().target()
    }

    fn visible(&self) -> &WindowTarget {
        if self.renderer.uses_post_processing() {
            self.post()
        } else {
            self.primary()
        }
    }

    /// The composite pass reuses the scene's depth attachment, so both
    /// windows are kept at the same size.
    fn mirror_size(&self, from: WindowId, size: PhysicalSize<u32>) {
        let other = if from == self.primary_id {
            self.post()
        } else {
            self.primary()
        };
        if other.window().inner_size() != size {
            let _ = other.window().request_inner_size(size);
        }
    }
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    renderer_config: RendererConfig,
    app: A,

    resize_notifier: ResizeNotifier,
    host: Option<Host>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, renderer_config: RendererConfig, app: A) -> Self {
        Self {
            config,
            renderer_config,
            app,
            resize_notifier: ResizeNotifier::new(),
            host: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window(
        event_loop: &ActiveEventLoop,
        title: &str,
        size: LogicalSize<f64>,
    ) -> Result<Arc<Window>> {
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size)
            .with_visible(false);

        let window = event_loop
            .create_window(attrs)
            .with_context(|| format!("failed to create window `{title}`"))?;

        Ok(Arc::new(window))
    }

    fn create_host(&mut self, event_loop: &ActiveEventLoop) -> Result<Host> {
        let size = self.config.initial_size;
        let primary = Self::create_window(event_loop, &self.config.title, size)?;
        let post = Self::create_window(event_loop, &self.config.post_process_title, size)?;

        let primary_id = primary.id();
        let post_id = post.id();

        let mut renderer = Renderer::new(
            self.renderer_config.clone(),
            WindowTarget::new(primary),
            WindowTarget::new(post),
            self.resize_notifier.clone(),
        )
        .context("failed to create renderer")?;

        pollster::block_on(renderer.initialize()).context("GPU initialization failed")?;

        Ok(Host {
            renderer,
            primary_id,
            post_id,
            clock: FrameClock::new(),
        })
    }

    fn draw_frame(&mut self) {
        let Some(host) = self.host.as_mut() else { return };

        let mut runtime_ctx = RuntimeCtx::default();
        let time = host.clock.tick();

        let control = {
            let mut ctx = FrameCtx {
                renderer: &mut host.renderer,
                time,
                runtime: &mut runtime_ctx,
            };
            self.app.on_frame(&mut ctx)
        };

        if control == AppControl::Exit || runtime_ctx.exit_requested {
            self.request_exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        match self.create_host(event_loop) {
            Ok(host) => {
                host.visible().window().request_redraw();
                self.host = Some(host);
            }
            Err(e) => {
                log::error!("failed to start: {e:#}");
                self.request_exit();
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw of whichever window is shown.
        if let Some(host) = self.host.as_ref() {
            host.visible().window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(host) = self.host.as_mut() else { return };
        if window_id != host.primary_id && window_id != host.post_id {
            return;
        }

        if self.app.on_window_event(&event, &mut host.renderer) == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.request_exit();
            }

            WindowEvent::Resized(new_size) => {
                host.mirror_size(window_id, *new_size);
                self.resize_notifier.notify();
                host.visible().window().request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_notifier.notify();
                host.visible().window().request_redraw();
            }

            WindowEvent::RedrawRequested => self.draw_frame(),

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
