//! Static directional light + material configuration.

use glam::Vec3;

/// One directional light and one material set for the whole scene.
///
/// The values never change between frames; every draw call uploads the same
/// configuration alongside its transforms.
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    /// Direction toward the light, world space. Normalized on upload.
    pub light_dir: Vec3,
    pub diffuse_material: [f32; 4],
    pub diffuse_light: [f32; 4],
    pub ambient_material: [f32; 4],
    pub ambient_light: [f32; 4],
    pub specular_material: [f32; 4],
    pub specular_light: [f32; 4],
    pub specular_power: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(0.25, 0.5, -1.0),
            diffuse_material: [0.8, 0.5, 0.5, 1.0],
            diffuse_light: [1.0, 1.0, 1.0, 1.0],
            ambient_material: [0.2, 0.2, 0.2, 1.0],
            ambient_light: [0.2, 0.2, 0.2, 1.0],
            specular_material: [0.8, 0.8, 0.8, 1.0],
            specular_light: [0.5, 0.5, 0.5, 1.0],
            specular_power: 10.0,
        }
    }
}
