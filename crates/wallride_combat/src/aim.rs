//! Aim pose and shot planning

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wallride_physics::RaycastHit;

/// Where a shot leaves from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimPose {
    /// Camera/eye position; the aim ray and the resolving projectile start here
    pub eye: Vec3,
    /// Weapon muzzle; the display projectile starts here
    pub muzzle: Vec3,
    /// Aim direction (normalized on use)
    pub forward: Vec3,
}

impl AimPose {
    /// Create a pose
    pub fn new(eye: Vec3, muzzle: Vec3, forward: Vec3) -> Self {
        Self {
            eye,
            muzzle,
            forward,
        }
    }

    /// Unit aim direction, zero if `forward` is degenerate
    pub fn direction(&self) -> Vec3 {
        self.forward.normalize_or_zero()
    }
}

/// Velocities for both projectiles of one shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    /// Velocity of the resolving projectile, launched from the eye
    pub resolving_velocity: Vec3,
    /// Nearest aim hit, if the ray hit anything
    pub look_point: Option<Vec3>,
    /// Velocity of the display projectile, launched from the muzzle.
    /// `None` when the aim hit is too close to be worth drawing.
    pub display_velocity: Option<Vec3>,
}

impl ShotPlan {
    /// Ratio between display and resolving projectile speed
    pub fn display_speed_scale(&self) -> Option<f32> {
        let resolving = self.resolving_velocity.length();
        if resolving <= 0.0 {
            return None;
        }
        self.display_velocity.map(|v| v.length() / resolving)
    }
}

/// Work out both launch velocities from the nearest aim hit.
///
/// With a hit, the display projectile heads for the hit point and its speed
/// is scaled by `|look_point - muzzle| / hit.distance`, so both projectiles
/// need the same flight time. Without a hit it flies along the aim direction
/// at `bullet_speed`.
pub fn plan_shot(
    pose: &AimPose,
    nearest_hit: Option<&RaycastHit>,
    bullet_speed: f32,
    display_spawn_threshold: f32,
) -> ShotPlan {
    let direction = pose.direction();
    let resolving_velocity = direction * bullet_speed;

    let Some(hit) = nearest_hit else {
        return ShotPlan {
            resolving_velocity,
            look_point: None,
            display_velocity: Some(direction * bullet_speed),
        };
    };

    let to_look = hit.point - pose.muzzle;
    let display_distance = to_look.length();

    // Too close to draw when either the aim hit or the look point from the
    // muzzle is within the threshold
    let too_close = hit.distance <= display_spawn_threshold.max(0.0)
        || display_distance <= display_spawn_threshold;
    let display_velocity = if too_close {
        None
    } else {
        let scale = display_distance / hit.distance;
        Some(to_look.normalize_or_zero() * bullet_speed * scale)
    };

    ShotPlan {
        resolving_velocity,
        look_point: Some(hit.point),
        display_velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wallride_physics::ObjectId;

    fn hit_at(point: Vec3, distance: f32) -> RaycastHit {
        RaycastHit {
            object: ObjectId(9),
            point,
            normal: Vec3::Z,
            distance,
        }
    }

    #[test]
    fn test_no_hit_flies_forward_unscaled() {
        let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 0.0), Vec3::new(0.0, 0.0, -2.0));
        let plan = plan_shot(&pose, None, 80.0, 3.0);

        assert_eq!(plan.look_point, None);
        assert_eq!(plan.display_velocity, Some(Vec3::new(0.0, 0.0, -80.0)));
        assert_eq!(plan.display_speed_scale(), Some(1.0));
        assert_eq!(plan.resolving_velocity, Vec3::new(0.0, 0.0, -80.0));
    }

    #[test]
    fn test_display_speed_matches_flight_time() {
        // Muzzle 2 units behind the eye, target 50 units ahead of the eye
        let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        let hit = hit_at(Vec3::new(0.0, 0.0, -50.0), 50.0);
        let plan = plan_shot(&pose, Some(&hit), 100.0, 3.0);

        let velocity = plan.display_velocity.unwrap();
        assert_relative_eq!(velocity.length(), 100.0 * 52.0 / 50.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.normalize().z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(plan.display_speed_scale().unwrap(), 52.0 / 50.0, epsilon = 1e-5);

        // Same time of flight for both projectiles
        let resolving_time = hit.distance / plan.resolving_velocity.length();
        let display_time = 52.0 / velocity.length();
        assert_relative_eq!(resolving_time, display_time, epsilon = 1e-5);
    }

    #[test]
    fn test_close_aim_point_skips_display() {
        let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.5), Vec3::NEG_Z);
        let hit = hit_at(Vec3::new(0.0, 0.0, -2.0), 2.0);
        let plan = plan_shot(&pose, Some(&hit), 100.0, 3.0);

        assert_eq!(plan.display_velocity, None);
        assert_eq!(plan.look_point, Some(Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn test_close_aim_hit_skips_display() {
        // Look point is 4 units from the muzzle but the aim hit is only 2 away
        let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        let hit = hit_at(Vec3::new(0.0, 0.0, -2.0), 2.0);
        let plan = plan_shot(&pose, Some(&hit), 100.0, 3.0);

        assert_eq!(plan.display_velocity, None);
        assert_eq!(plan.display_speed_scale(), None);
    }

    #[test]
    fn test_zero_hit_distance_skips_display() {
        let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = hit_at(Vec3::ZERO, 0.0);
        let plan = plan_shot(&pose, Some(&hit), 100.0, 0.0);

        assert_eq!(plan.display_velocity, None);
        assert_eq!(plan.look_point, Some(Vec3::ZERO));
    }

    #[test]
    fn test_degenerate_forward() {
        let pose = AimPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        let plan = plan_shot(&pose, None, 100.0, 3.0);
        assert_eq!(plan.resolving_velocity, Vec3::ZERO);
        assert_eq!(plan.display_speed_scale(), None);
    }
}
