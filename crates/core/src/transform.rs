//! Decomposed transforms for scene-graph groups.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform in 3D space (position, rotation, scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// A translation-only transform.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Decompose a matrix into position, rotation and scale.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Recompose into a matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Same transform with a different vertical position.
    pub fn with_y(mut self, y: f32) -> Self {
        self.position.y = y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_is_deterministic() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(1.0),
            Quat::from_rotation_x(-0.3),
            Vec3::new(0.0, -1.4, -0.8),
        );
        let a = Transform::from_matrix(&m);
        let b = Transform::from_matrix(&m);
        assert_eq!(a, b);
        assert!((a.position.y + 1.4).abs() < 1e-6);
    }

    #[test]
    fn with_y_only_touches_vertical() {
        let t = Transform::new(Vec3::new(1.0, 2.0, 3.0)).with_y(5.0);
        assert_eq!(t.position, Vec3::new(1.0, 5.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }
}
