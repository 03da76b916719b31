//! Rotation helpers.
//!
//! Per-axis rotations are plain functions; an Euler rotation is their
//! product applied Z·Y·X, so X is applied to a vector first.

use glam::{Mat4, Vec3};

pub fn rotation_x(angle: f32) -> Mat4 {
    Mat4::from_rotation_x(angle)
}

pub fn rotation_y(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

pub fn rotation_z(angle: f32) -> Mat4 {
    Mat4::from_rotation_z(angle)
}

/// `Rz(euler.z) * Ry(euler.y) * Rx(euler.x)`, angles in radians.
pub fn rotation_zyx(euler: Vec3) -> Mat4 {
    rotation_z(euler.z) * rotation_y(euler.y) * rotation_x(euler.x)
}
