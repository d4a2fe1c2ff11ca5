//! Weapon system

use crate::aim::{plan_shot, AimPose};
use crate::error::{CombatError, Result};
use crate::projectile::{ProjectileId, ProjectileSet};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use wallride_physics::query::nearest;
use wallride_physics::{CollisionLayer, ObjectId, RayCaster, RaycastOptions};

/// Look of the display projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayStyle {
    /// Scale when spawned
    pub initial_size: f32,
    /// Scale it grows toward
    pub final_size: f32,
    /// Scale units per second
    pub size_change_speed: f32,
    /// Glow intensity once at `final_size`
    pub final_light_intensity: f32,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            initial_size: 0.05,
            final_size: 0.2,
            size_change_speed: 1.5,
            final_light_intensity: 2.0,
        }
    }
}

/// Weapon statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Projectile speed in units per second
    pub bullet_speed: f32,
    /// Seconds between shots
    pub firing_delay: f32,
    /// Display projectile is skipped when the aim point is this close to the muzzle
    pub display_spawn_threshold: f32,
    /// Seconds a resolving projectile may fly before it is dropped
    pub bullet_lifetime: f32,
    /// Seconds a display projectile may fly on its own
    pub display_lifetime: f32,
    /// Layers the aim ray and projectiles can hit
    pub aim_mask: u32,
    /// Display projectile look
    pub display: DisplayStyle,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            bullet_speed: 120.0,
            firing_delay: 0.12,
            display_spawn_threshold: 3.0,
            bullet_lifetime: 4.0,
            display_lifetime: 4.0,
            aim_mask: CollisionLayer::mask_of(&[CollisionLayer::GROUND, CollisionLayer::PLAYER]),
            display: DisplayStyle::default(),
        }
    }
}

impl WeaponStats {
    /// Reject stats the firing loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.bullet_speed > 0.0) {
            return Err(CombatError::InvalidConfig(format!(
                "bullet_speed must be positive, got {}",
                self.bullet_speed
            )));
        }
        if self.firing_delay < 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "firing_delay must not be negative, got {}",
                self.firing_delay
            )));
        }
        if self.display_spawn_threshold < 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "display_spawn_threshold must not be negative, got {}",
                self.display_spawn_threshold
            )));
        }
        if self.aim_mask == 0 {
            return Err(CombatError::InvalidConfig(
                "aim_mask selects no layers".to_string(),
            ));
        }
        Ok(())
    }
}

/// What one shot produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    /// The resolving projectile
    pub resolving: ProjectileId,
    /// The display projectile, absent when the aim point was too close
    pub display: Option<ProjectileId>,
    /// Nearest aim hit, if any
    pub look_point: Option<Vec3>,
    /// Distance from the eye to `look_point`
    pub hit_distance: Option<f32>,
    /// Display speed over resolving speed
    pub display_speed_scale: Option<f32>,
}

/// A weapon with a firing cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    /// Weapon name/id
    pub name: String,
    /// Weapon stats
    pub stats: WeaponStats,
    /// Seconds until the next shot is allowed
    #[serde(skip)]
    pub firing_timer: f32,
}

impl Weapon {
    /// Create a new weapon with default stats
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stats: WeaponStats::default(),
            firing_timer: 0.0,
        }
    }

    /// Set weapon stats
    pub fn with_stats(mut self, stats: WeaponStats) -> Self {
        self.stats = stats;
        self
    }

    /// Set projectile speed
    pub fn with_bullet_speed(mut self, speed: f32) -> Self {
        self.stats.bullet_speed = speed;
        self
    }

    /// Set the cooldown between shots
    pub fn with_firing_delay(mut self, delay: f32) -> Self {
        self.stats.firing_delay = delay;
        self
    }

    /// Count the cooldown down, never below zero
    pub fn tick_cooldown(&mut self, delta_time: f32) {
        self.firing_timer = (self.firing_timer - delta_time).max(0.0);
    }

    /// Check if the cooldown has elapsed
    pub fn ready(&self) -> bool {
        self.firing_timer <= 0.0
    }

    /// Fire one shot and restart the cooldown.
    ///
    /// Casts the aim ray from `pose.eye`, spawns the resolving projectile at
    /// the eye and, unless the aim point is too close, a speed-matched display
    /// projectile at the muzzle. Does not check [`ready`](Self::ready).
    pub fn fire<R: RayCaster + ?Sized>(
        &mut self,
        pose: &AimPose,
        shooter: ObjectId,
        world: &R,
        projectiles: &mut ProjectileSet,
    ) -> ShotReport {
        let options = RaycastOptions::against(self.stats.aim_mask).exclude(shooter);
        let hits = world.raycast_all(pose.eye, pose.direction(), &options);
        let hit = nearest(&hits);

        let plan = plan_shot(
            pose,
            hit.as_ref(),
            self.stats.bullet_speed,
            self.stats.display_spawn_threshold,
        );

        let display = plan.display_velocity.map(|velocity| {
            projectiles.spawn_display(
                pose.muzzle,
                velocity,
                self.stats.display_lifetime,
                self.stats.display,
            )
        });
        let resolving = projectiles.spawn_resolving(
            pose.eye,
            plan.resolving_velocity,
            shooter,
            self.stats.aim_mask,
            self.stats.bullet_lifetime,
            display,
        );

        self.firing_timer = self.stats.firing_delay;

        log::debug!(
            "{} fired {:?} (display {:?}, look point {:?})",
            self.name,
            resolving,
            display,
            plan.look_point
        );

        ShotReport {
            resolving,
            display,
            look_point: plan.look_point,
            hit_distance: hit.map(|h| h.distance),
            display_speed_scale: plan.display_speed_scale(),
        }
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new("Default Weapon")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wallride_physics::RaycastHit;

    /// Returns the same hits for every query, honouring exclusions
    struct Scripted(Vec<RaycastHit>);

    impl RayCaster for Scripted {
        fn raycast_all(&self, _origin: Vec3, _direction: Vec3, options: &RaycastOptions) -> Vec<RaycastHit> {
            self.0
                .iter()
                .copied()
                .filter(|h| !options.exclude.contains(&h.object) && h.distance <= options.max_distance)
                .collect()
        }
    }

    fn hit(object: u64, distance: f32) -> RaycastHit {
        RaycastHit {
            object: ObjectId(object),
            point: Vec3::new(0.0, 0.0, -distance),
            normal: Vec3::Z,
            distance,
        }
    }

    fn pose() -> AimPose {
        AimPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_weapon_creation() {
        let weapon = Weapon::new("Rifle").with_bullet_speed(80.0).with_firing_delay(0.5);
        assert_eq!(weapon.stats.bullet_speed, 80.0);
        assert_eq!(weapon.stats.firing_delay, 0.5);
        assert!(weapon.ready());
        assert!(weapon.stats.validate().is_ok());
    }

    #[test]
    fn test_cooldown() {
        let mut weapon = Weapon::new("Rifle").with_firing_delay(0.1);
        let mut projectiles = ProjectileSet::new();
        weapon.fire(&pose(), ObjectId(1), &Scripted(Vec::new()), &mut projectiles);

        assert!(!weapon.ready());
        weapon.tick_cooldown(0.06);
        assert!(!weapon.ready());
        weapon.tick_cooldown(0.06);
        assert!(weapon.ready());
        assert_eq!(weapon.firing_timer, 0.0);
    }

    #[test]
    fn test_fire_uses_nearest_hit() {
        let mut weapon = Weapon::new("Rifle").with_bullet_speed(100.0);
        let mut projectiles = ProjectileSet::new();
        let world = Scripted(vec![hit(3, 80.0), hit(2, 50.0)]);

        let report = weapon.fire(&pose(), ObjectId(1), &world, &mut projectiles);
        assert_eq!(report.hit_distance, Some(50.0));
        assert_relative_eq!(report.display_speed_scale.unwrap(), 52.0 / 50.0, epsilon = 1e-5);

        let display = projectiles.display(report.display.unwrap()).unwrap();
        assert_eq!(display.position, Vec3::new(0.0, 0.0, 2.0));
        let resolving = projectiles.resolving(report.resolving).unwrap();
        assert_eq!(resolving.position, Vec3::ZERO);
        assert_eq!(resolving.display, report.display);
    }

    #[test]
    fn test_fire_ignores_shooter() {
        let mut weapon = Weapon::new("Rifle");
        let mut projectiles = ProjectileSet::new();
        let world = Scripted(vec![hit(1, 1.0)]);

        let report = weapon.fire(&pose(), ObjectId(1), &world, &mut projectiles);
        assert_eq!(report.look_point, None);
        assert_eq!(report.display_speed_scale, Some(1.0));
    }

    #[test]
    fn test_close_hit_leaves_resolving_unlinked() {
        let mut weapon = Weapon::new("Rifle");
        let mut projectiles = ProjectileSet::new();
        let close_pose = AimPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.5), Vec3::NEG_Z);
        let world = Scripted(vec![hit(4, 1.0)]);

        let report = weapon.fire(&close_pose, ObjectId(1), &world, &mut projectiles);
        assert_eq!(report.display, None);
        assert_eq!(projectiles.resolving(report.resolving).unwrap().display, None);
        assert_eq!(projectiles.display_iter().count(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_stats() {
        let stats = WeaponStats {
            bullet_speed: 0.0,
            ..Default::default()
        };
        assert!(stats.validate().is_err());
    }
}
