//! Projection matrices.

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// A camera projection, stored as a right-handed projection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    matrix: Mat4,
}

impl Projection {
    /// Perspective projection. `fov_y` is in radians.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            matrix: Mat4::perspective_rh(fov_y, aspect, near, far),
        }
    }

    /// Orthographic projection of the given box.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            matrix: Mat4::orthographic_rh(left, right, bottom, top, near, far),
        }
    }

    /// Projection used for screen-space geometry: the unit box with a flipped depth range.
    pub fn screen_space() -> Self {
        Self::orthographic(-1.0, 1.0, -1.0, 1.0, 1.0, -1.0)
    }

    /// Wraps an existing projection matrix.
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Returns the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_space_maps_unit_box() {
        let proj = Projection::screen_space();
        let p = proj.matrix().project_point3(glam::Vec3::new(1.0, -1.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_screen_space_is_finite() {
        let m = Projection::screen_space().matrix();
        assert!(m.is_finite());
    }
}
