use glam::{Quat, Vec3};
use iblkit_core::LightTransform;

/// One light extracted from an environment map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescriptor {
    /// Sampled color scaled to unit length (zero for a black sample).
    pub color: Vec3,
    /// Length of the sampled color before normalization.
    pub intensity: f32,
    /// Unit direction from the origin toward the light.
    pub direction: Vec3,
    pub position: Vec3,
    /// Aims the light's -Z axis at the origin.
    pub rotation: Quat,
}

impl LightDescriptor {
    pub fn from_sample(direction: Vec3, sampled: Vec3, radius: f32) -> Self {
        let transform = LightTransform::on_sphere(direction, radius);
        Self {
            color: sampled.normalize_or_zero(),
            intensity: sampled.length(),
            direction,
            position: transform.position,
            rotation: transform.rotation,
        }
    }

    pub fn transform(&self) -> LightTransform {
        LightTransform::new(self.position, self.rotation)
    }
}
