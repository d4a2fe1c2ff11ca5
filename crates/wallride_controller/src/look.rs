//! Look angles and the view frame derived from them
//!
//! Yaw and pitch are in degrees. Yaw 0 faces -Z and grows turning right;
//! positive pitch looks down.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch limit in degrees
pub const PITCH_LIMIT: f32 = 90.0;

/// Where the player is looking
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    /// Create from yaw and pitch in degrees
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    /// Apply a pointer delta. Moving up (positive y) looks up.
    pub fn apply_delta(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw += delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Horizontal facing direction
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(sin, 0.0, -cos)
    }

    /// Horizontal right direction
    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos, 0.0, sin)
    }

    /// Body rotation: yaw only
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Camera rotation from yaw, pitch and a roll in degrees
    pub fn view_rotation(&self, roll: f32) -> Quat {
        self.body_rotation()
            * Quat::from_rotation_x(-self.pitch.to_radians())
            * Quat::from_rotation_z(roll.to_radians())
    }

    /// Where the camera points, pitch included
    pub fn aim_direction(&self) -> Vec3 {
        self.view_rotation(0.0) * Vec3::NEG_Z
    }
}

/// Angle in degrees from `from` to `to` around `axis`, in `[-180, 180]`
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    if from.length_squared() == 0.0 || to.length_squared() == 0.0 {
        return 0.0;
    }
    let unsigned = from.angle_between(to).to_degrees();
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_facing_directions() {
        let look = LookAngles::new(0.0, 0.0);
        assert_relative_eq!(look.forward().z, -1.0);
        assert_relative_eq!(look.right().x, 1.0);

        let look = LookAngles::new(90.0, 0.0);
        assert_relative_eq!(look.forward().x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(look.right().z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_matches_facing() {
        for yaw in [0.0, 37.0, -120.0, 200.0] {
            let look = LookAngles::new(yaw, 0.0);
            let rotated = look.body_rotation() * Vec3::NEG_Z;
            assert_relative_eq!(rotated.x, look.forward().x, epsilon = 1e-5);
            assert_relative_eq!(rotated.z, look.forward().z, epsilon = 1e-5);
            let rotated_right = look.body_rotation() * Vec3::X;
            assert_relative_eq!(rotated_right.x, look.right().x, epsilon = 1e-5);
            assert_relative_eq!(rotated_right.z, look.right().z, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_pitch_clamped() {
        let mut look = LookAngles::default();
        look.apply_delta(Vec2::new(10.0, -1000.0), 0.4);
        assert_eq!(look.yaw, 4.0);
        assert_eq!(look.pitch, PITCH_LIMIT);

        look.apply_delta(Vec2::new(0.0, 10_000.0), 0.4);
        assert_eq!(look.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_positive_pitch_looks_down() {
        let look = LookAngles::new(0.0, 30.0);
        assert!(look.aim_direction().y < 0.0);
        let look = LookAngles::new(0.0, -30.0);
        assert!(look.aim_direction().y > 0.0);
    }

    #[test]
    fn test_signed_angle() {
        assert_relative_eq!(signed_angle(Vec3::X, Vec3::NEG_Z, Vec3::Y), 90.0, epsilon = 1e-4);
        assert_relative_eq!(signed_angle(Vec3::NEG_Z, Vec3::X, Vec3::Y), -90.0, epsilon = 1e-4);
        assert_eq!(signed_angle(Vec3::ZERO, Vec3::X, Vec3::Y), 0.0);
    }
}
