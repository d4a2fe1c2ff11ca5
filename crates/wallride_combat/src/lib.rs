//! Wallride Combat - Dual-Projectile Firing
//!
//! Every shot spawns two projectiles:
//!
//! - a *resolving* projectile that leaves the eye along the aim ray and
//!   decides what the shot hits, and
//! - a *display* projectile that leaves the muzzle and is only drawn. Its
//!   speed is rescaled so it reaches the aim point at the same moment the
//!   resolving projectile would.
//!
//! # Features
//!
//! - Weapon cooldown (`firing_delay`)
//! - Aim ray against a layer mask, excluding the shooter
//! - Speed-matched display projectile, skipped when the aim hit is too close
//! - Swept re-cast of resolving projectiles every fixed step
//! - Display projectile growth (scale, trail width, glow)
//!
//! # Example
//!
//! ```ignore
//! use wallride_combat::prelude::*;
//!
//! let mut weapon = Weapon::new("Rifle").with_firing_delay(0.1);
//! let mut projectiles = ProjectileSet::new();
//!
//! weapon.tick_cooldown(dt);
//! if weapon.ready() {
//!     let report = weapon.fire(&pose, shooter, &world, &mut projectiles);
//! }
//! let impacts = projectiles.step(dt, &world);
//! ```

pub mod aim;
pub mod error;
pub mod projectile;
pub mod weapon;

pub mod prelude {
    pub use crate::aim::{plan_shot, AimPose, ShotPlan};
    pub use crate::error::{CombatError, Result};
    pub use crate::projectile::{
        move_towards, DisplayProjectile, Impact, Projectile, ProjectileId, ProjectileSet,
    };
    pub use crate::weapon::{DisplayStyle, ShotReport, Weapon, WeaponStats};
}

pub use prelude::*;
