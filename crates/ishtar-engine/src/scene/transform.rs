use glam::{Mat4, Vec3};

use crate::math;

/// Translation, Euler rotation (radians, applied Z·Y·X) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Model-to-world matrix: `T * R * S`.
    pub fn transformation_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * self.rotation_matrix()
            * Mat4::from_scale(self.scale)
    }

    /// Rotation part only. Used to carry normals into world space.
    pub fn rotation_matrix(&self) -> Mat4 {
        math::rotation_zyx(self.rotation)
    }

    /// World-to-view matrix of an object placed by this transform.
    ///
    /// Scale is ignored; a camera is a rigid frame.
    pub fn view_transformation_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.translation) * self.rotation_matrix()).inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.transformation_matrix(), Mat4::IDENTITY);
        assert_eq!(t.view_transformation_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_applies_before_translation() {
        let t = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0));
        let p = t.transformation_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn rotation_matrix_has_no_translation() {
        let t = Transform::from_translation(Vec3::new(5.0, 6.0, 7.0))
            .with_rotation(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(t.rotation_matrix().w_axis, glam::Vec4::W);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let t = Transform::from_translation(Vec3::new(0.0, 2.0, 5.0))
            .with_rotation(Vec3::new(0.0, 0.4, 0.0));
        let eye = t.view_transformation_matrix().transform_point3(t.translation);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));
    }
}
