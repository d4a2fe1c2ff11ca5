//! In-flight projectiles

use crate::weapon::DisplayStyle;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use wallride_physics::query::nearest;
use wallride_physics::{ObjectId, RayCaster, RaycastOptions};

/// Identifier of a projectile within a [`ProjectileSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

/// The projectile that decides what a shot hits
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Whoever fired it; never hit by its own projectile
    pub shooter: ObjectId,
    /// Layers the swept ray tests against
    pub hit_mask: u32,
    pub age: f32,
    pub lifetime: f32,
    /// The display projectile drawn for this shot, if one was spawned
    pub display: Option<ProjectileId>,
}

/// A purely visual projectile
#[derive(Debug, Clone)]
pub struct DisplayProjectile {
    pub id: ProjectileId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub lifetime: f32,
    /// Uniform scale, grows toward `style.final_size`
    pub scale: f32,
    pub trail_width: f32,
    pub light_intensity: f32,
    pub style: DisplayStyle,
}

impl DisplayProjectile {
    /// Grow toward the final size for one visual frame
    pub fn update_visuals(&mut self, delta_time: f32) {
        self.scale = move_towards(
            self.scale,
            self.style.final_size,
            self.style.size_change_speed * delta_time,
        );
        self.trail_width = self.scale;
        self.light_intensity = if self.style.final_size > 0.0 {
            self.scale * self.style.final_light_intensity / self.style.final_size
        } else {
            0.0
        };
    }
}

/// Where a resolving projectile stopped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub projectile: ProjectileId,
    pub object: ObjectId,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Move `current` toward `target` by at most `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Every live projectile
#[derive(Debug, Default)]
pub struct ProjectileSet {
    next_id: u64,
    resolving: Vec<Projectile>,
    display: Vec<DisplayProjectile>,
}

impl ProjectileSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ProjectileId {
        self.next_id += 1;
        ProjectileId(self.next_id)
    }

    /// Spawn a resolving projectile
    pub fn spawn_resolving(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        shooter: ObjectId,
        hit_mask: u32,
        lifetime: f32,
        display: Option<ProjectileId>,
    ) -> ProjectileId {
        let id = self.allocate_id();
        self.resolving.push(Projectile {
            id,
            position,
            velocity,
            shooter,
            hit_mask,
            age: 0.0,
            lifetime,
            display,
        });
        id
    }

    /// Spawn a display projectile
    pub fn spawn_display(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        lifetime: f32,
        style: DisplayStyle,
    ) -> ProjectileId {
        let id = self.allocate_id();
        let scale = style.initial_size;
        let mut display = DisplayProjectile {
            id,
            position,
            velocity,
            age: 0.0,
            lifetime,
            scale,
            trail_width: scale,
            light_intensity: 0.0,
            style,
        };
        display.update_visuals(0.0);
        self.display.push(display);
        id
    }

    /// Look up a resolving projectile
    pub fn resolving(&self, id: ProjectileId) -> Option<&Projectile> {
        self.resolving.iter().find(|p| p.id == id)
    }

    /// Look up a display projectile
    pub fn display(&self, id: ProjectileId) -> Option<&DisplayProjectile> {
        self.display.iter().find(|p| p.id == id)
    }

    /// All display projectiles
    pub fn display_iter(&self) -> impl Iterator<Item = &DisplayProjectile> {
        self.display.iter()
    }

    /// Number of live projectiles of both kinds
    pub fn len(&self) -> usize {
        self.resolving.len() + self.display.len()
    }

    /// Check if nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.resolving.is_empty() && self.display.is_empty()
    }

    /// Advance everything by one fixed step.
    ///
    /// Each resolving projectile sweeps a ray along its velocity for the
    /// distance it covers this step. On a hit it snaps to the hit point and is
    /// destroyed together with its display projectile. Projectiles past their
    /// lifetime are dropped.
    pub fn step<R: RayCaster + ?Sized>(&mut self, delta_time: f32, world: &R) -> Vec<Impact> {
        let mut impacts = Vec::new();
        let mut dead_displays = Vec::new();

        self.resolving.retain_mut(|projectile| {
            let travel = projectile.velocity.length() * delta_time;
            if travel > 0.0 {
                let options = RaycastOptions::against(projectile.hit_mask)
                    .with_max_distance(travel)
                    .exclude(projectile.shooter);
                let hits = world.raycast_all(projectile.position, projectile.velocity, &options);
                if let Some(hit) = nearest(&hits) {
                    projectile.position = hit.point;
                    log::debug!(
                        "Projectile {:?} hit {:?} at {:?}",
                        projectile.id,
                        hit.object,
                        hit.point
                    );
                    impacts.push(Impact {
                        projectile: projectile.id,
                        object: hit.object,
                        point: hit.point,
                        normal: hit.normal,
                    });
                    dead_displays.extend(projectile.display);
                    return false;
                }
            }

            projectile.position += projectile.velocity * delta_time;
            projectile.age += delta_time;
            if projectile.age >= projectile.lifetime {
                dead_displays.extend(projectile.display);
                return false;
            }
            true
        });

        self.display.retain_mut(|display| {
            if dead_displays.contains(&display.id) {
                return false;
            }
            display.position += display.velocity * delta_time;
            display.age += delta_time;
            display.age < display.lifetime
        });

        impacts
    }

    /// Run the per-frame visual update of every display projectile
    pub fn update_visuals(&mut self, delta_time: f32) {
        for display in &mut self.display {
            display.update_visuals(delta_time);
        }
    }
}
