use std::rc::Rc;

use crate::device::DeviceContext;
use crate::render::Mesh;

use super::{Material, Transform};

/// Anything the renderer can draw: geometry, a material and a placement.
pub trait Actor {
    fn mesh(&self) -> &Mesh;
    fn material(&self) -> &dyn Material;
    fn transform(&self) -> &Transform;
}

/// A camera is an actor that also supplies the projection.
///
/// Cameras may appear in the actor list handed to the renderer; they are
/// skipped by identity.
pub trait Camera: Actor {
    /// Uniform buffer holding the projection matrix for `aspect` (width / height).
    ///
    /// Implementations may cache the buffer across frames.
    fn projection_buffer(&self, ctx: &DeviceContext, aspect: f32) -> wgpu::Buffer;
}

/// Returns `true` if `actor` and `camera` are the same object.
pub fn is_same_object(actor: &dyn Actor, camera: &dyn Camera) -> bool {
    std::ptr::addr_eq(actor as *const dyn Actor, camera as *const dyn Camera)
}

/// Plain drawable: a mesh, a shared material and a transform.
pub struct MeshActor {
    pub mesh: Mesh,
    pub material: Rc<dyn Material>,
    pub transform: Transform,
}

impl MeshActor {
    pub fn new(mesh: Mesh, material: Rc<dyn Material>, transform: Transform) -> Self {
        Self {
            mesh,
            material,
            transform,
        }
    }
}

impl Actor for MeshActor {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }
}
