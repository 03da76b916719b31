//! Scene collaborators consumed by the renderer.
//!
//! Responsibilities:
//! - define what the renderer needs from a drawable (`Actor`), a camera
//!   (`Camera`) and a material (`Material`)
//! - provide small reference implementations so applications can draw
//!   without writing their own entity model

mod actor;
mod camera;
mod material;
mod transform;

pub mod shapes;

pub use actor::{is_same_object, Actor, Camera, MeshActor};
pub use camera::PerspectiveCamera;
pub use material::{BasicMaterial, Material, NoMaterial};
pub use transform::Transform;
