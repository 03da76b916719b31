use std::rc::Rc;

use glam::Vec3;
use ishtar_engine::core::{App, AppControl, FrameCtx};
use ishtar_engine::device::RendererConfig;
use ishtar_engine::logging::{init_logging, LoggingConfig};
use ishtar_engine::render::Renderer;
use ishtar_engine::scene::{
    shapes, Actor, BasicMaterial, Material, MeshActor, PerspectiveCamera, Transform,
};
use ishtar_engine::window::{Runtime, RuntimeConfig, WindowTarget};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Spinning shapes in front of a fixed camera.
struct Viewer {
    camera: PerspectiveCamera,
    shapes: Vec<MeshActor>,
    /// Radians per second about (x, y, z), one entry per shape.
    spin: Vec<Vec3>,
}

impl Viewer {
    fn new() -> Self {
        let material: Rc<dyn Material> = Rc::new(BasicMaterial::new());

        let shapes = vec![
            MeshActor::new(
                shapes::cube(1.0),
                material.clone(),
                Transform::from_translation(Vec3::new(-1.6, 0.0, 0.0)),
            ),
            MeshActor::new(
                shapes::pyramid(1.2),
                material.clone(),
                Transform::from_translation(Vec3::new(1.6, 0.0, 0.0)),
            ),
            MeshActor::new(
                shapes::cube(0.5),
                material,
                Transform::from_translation(Vec3::new(0.0, 1.2, -1.0)),
            ),
        ];
        let spin = vec![
            Vec3::new(0.4, 0.9, 0.0),
            Vec3::new(0.0, -0.7, 0.2),
            Vec3::new(1.1, 0.0, 0.6),
        ];

        let camera = PerspectiveCamera::new(
            Transform::from_translation(Vec3::new(0.0, 0.5, 5.0)),
            55f32.to_radians(),
            0.1,
            100.0,
        );

        Self {
            camera,
            shapes,
            spin,
        }
    }
}

impl App for Viewer {
    fn on_window_event(
        &mut self,
        event: &WindowEvent,
        renderer: &mut Renderer<WindowTarget>,
    ) -> AppControl {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key,
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        else {
            return AppControl::Continue;
        };

        match logical_key {
            Key::Named(NamedKey::Escape) => AppControl::Exit,
            Key::Character(c) if c.eq_ignore_ascii_case("p") => {
                renderer.set_use_post_processing(!renderer.uses_post_processing());
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let dt = ctx.time.dt;
        for (shape, spin) in self.shapes.iter_mut().zip(&self.spin) {
            shape.transform.rotation += *spin * dt;
        }

        // The camera rides along in the list; the renderer skips it.
        let mut actors: Vec<&dyn Actor> = self.shapes.iter().map(|s| s as &dyn Actor).collect();
        actors.push(&self.camera);

        ctx.draw(&actors, &self.camera)
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let post_processing = std::env::args().any(|arg| arg == "--post");
    let renderer_config = RendererConfig::default().with_post_processing(post_processing);

    log::info!("press P to toggle post-processing, Escape to quit");

    Runtime::run(RuntimeConfig::default(), renderer_config, Viewer::new())
}
