use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Placement of a light: where it sits and where it points.
///
/// Lights shine along their local -Z axis, the same convention cameras use.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LightTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Light at `direction * radius` aimed back at the origin.
    pub fn on_sphere(direction: Vec3, radius: f32) -> Self {
        Self {
            position: direction * radius,
            rotation: look_along(-direction),
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl Default for LightTransform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

/// Rotation whose -Z axis points along `forward`, keeping +Y as up where
/// possible. Straight up or down falls back to +Z as the up reference.
pub fn look_along(forward: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let right = forward.cross(up).normalize();
    let up = right.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}
