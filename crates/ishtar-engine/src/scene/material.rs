use std::cell::RefCell;

use crate::device::RenderError;
use crate::render::{build_mesh_pipeline, PipelineCtx};

/// Source of an actor's render pipeline.
///
/// Pipelines must follow the mesh shape contract (see
/// [`crate::render::mesh_vertex_layout`]) and declare four 4x4 uniforms at
/// group 0: world, view, projection, rotation. Implementations may build
/// lazily and cache however they like.
pub trait Material {
    fn render_pipeline(&self, ctx: &PipelineCtx<'_>) -> Result<wgpu::RenderPipeline, RenderError>;
}

/// Lambert-lit material coloured by texture coordinates.
///
/// The pipeline is compiled on first use and rebuilt only if the target
/// color format changes.
#[derive(Default)]
pub struct BasicMaterial {
    cache: RefCell<Option<(wgpu::TextureFormat, wgpu::RenderPipeline)>>,
}

impl BasicMaterial {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Material for BasicMaterial {
    fn render_pipeline(&self, ctx: &PipelineCtx<'_>) -> Result<wgpu::RenderPipeline, RenderError> {
        let mut cache = self.cache.borrow_mut();
        if let Some((format, pipeline)) = cache.as_ref() {
            if *format == ctx.color_format {
                return Ok(pipeline.clone());
            }
        }

        log::debug!("compiling basic material pipeline for {:?}", ctx.color_format);
        let pipeline = build_mesh_pipeline(
            ctx.device,
            "ishtar basic material pipeline",
            include_str!("shaders/basic.wgsl"),
            ctx.color_format,
        );
        *cache = Some((ctx.color_format, pipeline.clone()));
        Ok(pipeline)
    }
}

/// Material of objects that are never drawn, such as cameras.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMaterial;

impl Material for NoMaterial {
    fn render_pipeline(&self, _ctx: &PipelineCtx<'_>) -> Result<wgpu::RenderPipeline, RenderError> {
        Err(RenderError::NoMaterial)
    }
}
