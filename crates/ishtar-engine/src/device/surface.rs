use super::{DeviceContext, RenderError, RendererConfig, SurfaceErrorAction, SurfaceFrame};

/// A host element the GPU can present into.
///
/// Implemented for `winit` windows by [`crate::window::WindowTarget`] and for
/// headless use by [`super::OffscreenTarget`]. The renderer owns two of these
/// and keeps exactly one visible.
pub trait DrawableTarget {
    /// Current drawable size in physical pixels.
    fn pixel_size(&self) -> (u32, u32);

    /// Shows or hides the element.
    fn set_visible(&self, visible: bool);

    /// Returns whether the element is currently shown.
    fn is_visible(&self) -> bool;

    /// Produces the handle wgpu creates a presentation surface from.
    ///
    /// Not called for off-screen targets.
    fn surface_target(&self) -> Result<wgpu::SurfaceTarget<'static>, RenderError>;

    /// Targets without a host surface render into a texture owned by the
    /// [`RenderSurface`] instead.
    fn is_offscreen(&self) -> bool {
        false
    }

    /// Called right before a frame of this target is presented.
    fn pre_present(&self) {}
}

/// Where frames of a [`RenderSurface`] end up.
enum Backing {
    Surface(wgpu::Surface<'static>),
    /// Created at configure time, recreated on resize.
    Texture(Option<wgpu::Texture>),
}

/// Presentation surface bound to a [`DrawableTarget`].
///
/// The wgpu surface exists from construction; it only becomes usable after
/// [`RenderSurface::configure`] has run against a negotiated device.
pub struct RenderSurface<T: DrawableTarget> {
    target: T,
    backing: Backing,
    config: Option<wgpu::SurfaceConfiguration>,
    size: (u32, u32),
}

impl<T: DrawableTarget> RenderSurface<T> {
    /// Creates the presentation surface for `target`.
    pub fn new(instance: &wgpu::Instance, target: T) -> Result<Self, RenderError> {
        let backing = if target.is_offscreen() {
            Backing::Texture(None)
        } else {
            let handle = target.surface_target()?;
            let surface = instance
                .create_surface(handle)
                .map_err(|e| RenderError::ContextFailure(e.to_string()))?;
            Backing::Surface(surface)
        };
        let size = target.pixel_size();

        Ok(Self {
            target,
            backing,
            config: None,
            size,
        })
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// The wgpu surface, absent for off-screen targets.
    pub(crate) fn raw(&self) -> Option<&wgpu::Surface<'static>> {
        match &self.backing {
            Backing::Surface(surface) => Some(surface),
            Backing::Texture(_) => None,
        }
    }

    /// Backing texture of an off-screen target, once configured.
    pub fn offscreen_texture(&self) -> Option<&wgpu::Texture> {
        match &self.backing {
            Backing::Texture(texture) => texture.as_ref(),
            Backing::Surface(_) => None,
        }
    }

    /// Size the surface was last configured (or resized) to.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Returns the configured format, if configured.
    pub fn format(&self) -> Option<wgpu::TextureFormat> {
        self.config.as_ref().map(|c| c.format)
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Picks format and alpha mode for the negotiated adapter and configures
    /// the surface at the target's current pixel size.
    pub fn configure(
        &mut self,
        ctx: &DeviceContext,
        config: &RendererConfig,
    ) -> Result<wgpu::TextureFormat, RenderError> {
        let (format, alpha_mode) = match &self.backing {
            Backing::Surface(surface) => {
                let caps = surface.get_capabilities(&ctx.adapter);
                let format = choose_surface_format(&caps, config.prefer_srgb)
                    .ok_or(RenderError::NoSurfaceFormat)?;
                (format, choose_alpha_mode(&caps, config.alpha_mode))
            }
            Backing::Texture(_) => (
                offscreen_format(config.prefer_srgb),
                wgpu::CompositeAlphaMode::Opaque,
            ),
        };

        let (width, height) = self.target.pixel_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: config.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: config.desired_maximum_frame_latency,
        };

        apply_config(&mut self.backing, ctx, &surface_config);
        self.config = Some(surface_config);
        self.size = (width, height);

        Ok(format)
    }

    /// Re-reads the target's pixel size and reconfigures.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that case,
    /// only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, ctx: &DeviceContext) {
        let new_size = self.target.pixel_size();
        self.size = new_size;

        let Some(config) = self.config.as_mut() else { return };
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }

        config.width = new_size.0;
        config.height = new_size.1;
        apply_config(&mut self.backing, ctx, config);
    }

    /// Acquires this frame's texture and a default view of it.
    ///
    /// Returns `Ok(None)` when the frame should be skipped (surface outdated,
    /// timed out, or zero-sized).
    pub fn acquire(&self, ctx: &DeviceContext) -> Result<Option<SurfaceFrame>, RenderError> {
        if self.config.is_none() || self.size.0 == 0 || self.size.1 == 0 {
            return Ok(None);
        }

        let surface = match &self.backing {
            Backing::Surface(surface) => surface,
            Backing::Texture(texture) => {
                return Ok(texture.as_ref().map(|texture| SurfaceFrame {
                    surface_texture: None,
                    view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
                }));
            }
        };

        let surface_texture = match surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                return match self.handle_surface_error(ctx, surface, &err) {
                    SurfaceErrorAction::Fatal => Err(RenderError::SurfaceLost(err)),
                    action => {
                        log::debug!("surface frame skipped: {err} ({action:?})");
                        Ok(None)
                    }
                };
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Some(SurfaceFrame {
            surface_texture: Some(surface_texture),
            view,
        }))
    }

    /// Converts a `SurfaceError` into a higher-level action.
    fn handle_surface_error(
        &self,
        ctx: &DeviceContext,
        surface: &wgpu::Surface<'static>,
        err: &wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if let Some(config) = self.config.as_ref() {
                    if self.size.0 > 0 && self.size.1 > 0 {
                        surface.configure(&ctx.device, config);
                    }
                }
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

/// Configures the wgpu surface, or reallocates the off-screen texture at the
/// configured size.
fn apply_config(backing: &mut Backing, ctx: &DeviceContext, config: &wgpu::SurfaceConfiguration) {
    match backing {
        Backing::Surface(surface) => surface.configure(&ctx.device, config),
        Backing::Texture(texture) => {
            *texture = Some(ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("ishtar offscreen color"),
                size: wgpu::Extent3d {
                    width: config.width,
                    height: config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            }));
        }
    }
}

/// Color format of off-screen targets, following the sRGB preference.
pub(crate) fn offscreen_format(prefer_srgb: bool) -> wgpu::TextureFormat {
    if prefer_srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}


pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        alpha: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes: alpha,
            ..Default::default()
        }
    }

    #[test]
    fn format_prefers_srgb_when_available() {
        let c = caps(
            vec![wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            vec![],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn format_falls_back_to_first() {
        let c = caps(
            vec![wgpu::TextureFormat::Rgba16Float, wgpu::TextureFormat::Bgra8UnormSrgb],
            vec![],
        );
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Rgba16Float));
    }

    #[test]
    fn format_none_when_unsupported() {
        assert_eq!(choose_surface_format(&caps(vec![], vec![]), true), None);
    }

    #[test]
    fn alpha_mode_honours_supported_request() {
        let c = caps(
            vec![],
            vec![wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PreMultiplied],
        );
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn alpha_mode_ignores_unsupported_request() {
        let c = caps(vec![], vec![wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PostMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&caps(vec![], vec![]), None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn offscreen_format_follows_srgb_preference() {
        assert_eq!(offscreen_format(true), wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!(offscreen_format(false), wgpu::TextureFormat::Rgba8Unorm);
    }
}
