use crate::device::RenderError;

/// One shader-visible resource destined for a bind-group slot.
#[derive(Debug, Clone, Copy)]
pub enum BindResource<'a> {
    /// Bound as a whole-buffer binding.
    Buffer(&'a wgpu::Buffer),
    /// Bound through a freshly created default view.
    Texture(&'a wgpu::Texture),
    /// Bound as-is.
    Sampler(&'a wgpu::Sampler),
}

/// Discriminant of a [`BindResource`], for diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindResourceKind {
    Buffer,
    Texture,
    Sampler,
}

impl BindResource<'_> {
    pub fn kind(&self) -> BindResourceKind {
        match self {
            BindResource::Buffer(_) => BindResourceKind::Buffer,
            BindResource::Texture(_) => BindResourceKind::Texture,
            BindResource::Sampler(_) => BindResourceKind::Sampler,
        }
    }
}

impl<'a> From<&'a wgpu::Buffer> for BindResource<'a> {
    fn from(buffer: &'a wgpu::Buffer) -> Self {
        BindResource::Buffer(buffer)
    }
}

impl<'a> From<&'a wgpu::Texture> for BindResource<'a> {
    fn from(texture: &'a wgpu::Texture) -> Self {
        BindResource::Texture(texture)
    }
}

impl<'a> From<&'a wgpu::Sampler> for BindResource<'a> {
    fn from(sampler: &'a wgpu::Sampler) -> Self {
        BindResource::Sampler(sampler)
    }
}

/// Owned form of a resource while its bind group is assembled.
///
/// Texture views created here must outlive the entry list that borrows them.
enum Resolved<'a> {
    Buffer(&'a wgpu::Buffer),
    View(wgpu::TextureView),
    Sampler(&'a wgpu::Sampler),
}

/// Binds `resources` to slots `0..len` of `pipeline`'s layout at `group_index`.
///
/// Binding is positional: callers supply resources in the slot order the
/// shader declares. `group_index` must name a group the pipeline declares.
pub fn build_bind_group(
    device: &wgpu::Device,
    pipeline: &wgpu::RenderPipeline,
    group_index: u32,
    resources: &[BindResource<'_>],
) -> Result<wgpu::BindGroup, RenderError> {
    if resources.is_empty() {
        return Err(RenderError::BindingShape("empty resource list".to_string()));
    }

    let max_bindings = device.limits().max_bindings_per_bind_group as usize;
    if resources.len() > max_bindings {
        return Err(RenderError::BindingShape(format!(
            "{} resources exceed the device limit of {max_bindings} bindings per group",
            resources.len()
        )));
    }

    let resolved: Vec<Resolved<'_>> = resources
        .iter()
        .map(|resource| match *resource {
            BindResource::Buffer(b) => Resolved::Buffer(b),
            BindResource::Texture(t) => {
                Resolved::View(t.create_view(&wgpu::TextureViewDescriptor::default()))
            }
            BindResource::Sampler(s) => Resolved::Sampler(s),
        })
        .collect();

    let entries: Vec<wgpu::BindGroupEntry<'_>> = resolved
        .iter()
        .enumerate()
        .map(|(slot, r)| wgpu::BindGroupEntry {
            binding: slot as u32,
            resource: match r {
                Resolved::Buffer(b) => b.as_entire_binding(),
                Resolved::View(v) => wgpu::BindingResource::TextureView(v),
                Resolved::Sampler(s) => wgpu::BindingResource::Sampler(s),
            },
        })
        .collect();

    let layout = pipeline.get_bind_group_layout(group_index);

    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("ishtar bind group"),
        layout: &layout,
        entries: &entries,
    }))
}
