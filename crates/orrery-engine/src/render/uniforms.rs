//! Per-draw constant block.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::camera::Camera;
use super::lighting::Lighting;

/// Constant block uploaded once per object per frame.
///
/// Field order and padding mirror the uniform struct in
/// `shaders/scene.wgsl`. Matrices are column-major on both sides (glam and
/// WGSL), so they upload without transposition.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub diffuse_material: [f32; 4],
    pub diffuse_light: [f32; 4],
    pub ambient_material: [f32; 4],
    pub ambient_light: [f32; 4],
    pub specular_material: [f32; 4],
    pub specular_light: [f32; 4],
    pub light_dir: [f32; 3],
    pub specular_power: f32,
    pub eye_pos: [f32; 3],
    pub _pad: f32,
}

impl ObjectUniforms {
    pub fn new(world: Mat4, camera: &Camera, lighting: &Lighting) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            projection: camera.projection().to_cols_array_2d(),
            diffuse_material: lighting.diffuse_material,
            diffuse_light: lighting.diffuse_light,
            ambient_material: lighting.ambient_material,
            ambient_light: lighting.ambient_light,
            specular_material: lighting.specular_material,
            specular_light: lighting.specular_light,
            light_dir: lighting.light_dir.normalize().to_array(),
            specular_power: lighting.specular_power,
            eye_pos: camera.eye.to_array(),
            _pad: 0.0,
        }
    }

    /// Returns the `wgpu` minimum binding size for the constant block.
    ///
    /// The block always contains the three matrices, so its size is non-zero
    /// by construction. Centralising this avoids `.unwrap()` at the pipeline
    /// and bind-group creation sites.
    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<ObjectUniforms>() as u64)
            .expect("ObjectUniforms has non-zero size by construction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -15.0), Vec3::ZERO, 4.0 / 3.0)
    }

    #[test]
    fn block_size_matches_wgsl_layout() {
        // 3 mat4 + 6 vec4 + 2 packed vec3/f32 slots.
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 320);
        assert_eq!(std::mem::size_of::<ObjectUniforms>() % 16, 0);
    }

    #[test]
    fn world_matrix_passes_through_untransposed() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let block = ObjectUniforms::new(world, &camera(), &Lighting::default());
        assert_eq!(block.world, world.to_cols_array_2d());
        // Translation lives in the last column.
        assert_eq!(block.world[3][0], 1.0);
        assert_eq!(block.world[3][1], 2.0);
        assert_eq!(block.world[3][2], 3.0);
    }

    #[test]
    fn light_direction_is_normalized_on_upload() {
        let block = ObjectUniforms::new(Mat4::IDENTITY, &camera(), &Lighting::default());
        let len = Vec3::from(block.light_dir).length();
        assert!((len - 1.0).abs() < 1e-5);
    }

    #[test]
    fn eye_position_matches_camera() {
        let block = ObjectUniforms::new(Mat4::IDENTITY, &camera(), &Lighting::default());
        assert_eq!(block.eye_pos, [0.0, 0.0, -15.0]);
    }
}
