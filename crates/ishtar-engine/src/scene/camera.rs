use std::cell::RefCell;

use glam::Mat4;

use crate::device::DeviceContext;
use crate::render::{buffer, Mesh};

use super::{Actor, Camera, Material, NoMaterial, Transform};

/// Right-handed perspective camera with a `[0, 1]` depth range.
pub struct PerspectiveCamera {
    pub transform: Transform,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,

    mesh: Mesh,
    material: NoMaterial,
    projection: RefCell<Option<CachedProjection>>,
}

struct CachedProjection {
    key: [f32; 4],
    buffer: wgpu::Buffer,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(Transform::default(), 60f32.to_radians(), 0.1, 100.0)
    }
}

impl PerspectiveCamera {
    pub fn new(transform: Transform, fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            transform,
            fov_y,
            near,
            far,
            mesh: Mesh::new(),
            material: NoMaterial,
            projection: RefCell::new(None),
        }
    }

    /// Projection matrix for `aspect` (width / height).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }
}

impl Actor for PerspectiveCamera {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn material(&self) -> &dyn Material {
        &self.material
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }
}

impl Camera for PerspectiveCamera {
    /// Reuses the previous buffer while lens parameters and aspect are unchanged.
    fn projection_buffer(&self, ctx: &DeviceContext, aspect: f32) -> wgpu::Buffer {
        let key = [self.fov_y, self.near, self.far, aspect];
        let mut cached = self.projection.borrow_mut();

        if let Some(p) = cached.as_ref() {
            if p.key == key {
                return p.buffer.clone();
            }
        }

        let buffer = buffer::matrix_uniform(
            ctx,
            "ishtar camera projection ubo",
            &self.projection_matrix(aspect),
        );
        *cached = Some(CachedProjection {
            key,
            buffer: buffer.clone(),
        });
        buffer
    }
}
