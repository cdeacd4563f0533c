//! The scene's single light: a point in view space with Phong colour terms.
//!
//! [`Light`] is the CPU-side description; [`LightUniform`] is what the body
//! shader reads at `@group(0) @binding(0)`.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    /// Position in view space, so the light stays fixed relative to the camera.
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Specular exponent. Values below 1 are raised to 1.
    pub shininess: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(20.0, 30.0, 40.0),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.6),
            shininess: 32.0,
        }
    }
}

impl Light {
    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            position: self.position.extend(1.0).to_array(),
            ambient: self.ambient.extend(0.0).to_array(),
            diffuse: self.diffuse.extend(0.0).to_array(),
            specular_shininess: self.specular.extend(self.shininess.max(1.0)).to_array(),
        }
    }
}

/// GPU-side light, 64 bytes, four `vec4<f32>`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz = view-space position, w = 1.
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// xyz = specular colour, w = shininess.
    pub specular_shininess: [f32; 4],
}
