//! Fixed look-at camera.

use glam::{Mat4, Vec3};

/// Camera with a fixed eye/target/up triple and perspective projection.
///
/// Both matrices are pure functions of the fields; nothing here changes
/// after construction. Left-handed, matching the handedness of the mesh
/// data and winding order.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Width / height of the output surface.
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect,
            z_near: 0.01,
            z_far: 100.0,
        }
    }

    /// World space → camera space.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye, self.target, self.up)
    }

    /// Camera space → clip space (perspective divide pending).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -15.0), Vec3::ZERO, 640.0 / 480.0)
    }

    #[test]
    fn view_maps_eye_to_origin() {
        let v = camera().view().transform_point3(Vec3::new(0.0, 0.0, -15.0));
        assert!(v.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn view_looks_down_positive_z() {
        // Left-handed view space: the target sits ahead of the eye on +Z.
        let v = camera().view().transform_point3(Vec3::ZERO);
        assert!(v.x.abs() < 1e-5 && v.y.abs() < 1e-5);
        assert!(v.z > 0.0);
    }

    #[test]
    fn matrices_are_deterministic() {
        let c = camera();
        assert_eq!(c.view().to_cols_array(), c.view().to_cols_array());
        assert_eq!(c.projection().to_cols_array(), c.projection().to_cols_array());
    }
}
