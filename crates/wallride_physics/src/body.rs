//! Rigid body types and the body-facing side of the collaborator contract

use glam::Vec3;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

/// How a force passed to [`PhysicsBody::add_force`] is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceMode {
    /// Mass-independent acceleration integrated over the coming step
    Acceleration,
    /// Instantaneous velocity delta, never integrated
    VelocityChange,
}

/// A body whose motion is integrated by the physics collaborator.
///
/// Velocity changes must be visible through [`linear_velocity`] as soon as
/// `add_force` returns; accelerations only show up after the next step.
///
/// [`linear_velocity`]: PhysicsBody::linear_velocity
pub trait PhysicsBody {
    /// World-space position of the body origin
    fn position(&self) -> Vec3;

    /// Current linear velocity
    fn linear_velocity(&self) -> Vec3;

    /// Apply a force in the given mode
    fn add_force(&mut self, force: Vec3, mode: ForceMode);
}

/// What kind of body to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Level geometry; never moves
    Fixed,
    /// Simulated, affected by engine gravity
    Dynamic,
    /// Simulated but upright and never asleep, with gravity left to the
    /// controller
    Character,
}

/// How to build a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    pub kind: BodyKind,
    pub position: Vec3,
}

impl RigidBodyDesc {
    pub fn fixed() -> Self {
        Self::of(BodyKind::Fixed)
    }

    pub fn dynamic() -> Self {
        Self::of(BodyKind::Dynamic)
    }

    /// Body for a movement controller: supplies its own gravity and drag
    pub fn character() -> Self {
        Self::of(BodyKind::Character)
    }

    fn of(kind: BodyKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
        }
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub(crate) fn build(&self) -> rapier::RigidBody {
        let p = self.position;
        let builder = match self.kind {
            BodyKind::Fixed => rapier::RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => rapier::RigidBodyBuilder::dynamic(),
            // Unit mass on top of the colliders
            BodyKind::Character => rapier::RigidBodyBuilder::dynamic()
                .gravity_scale(0.0)
                .additional_mass(1.0)
                .locked_axes(rapier::LockedAxes::ROTATION_LOCKED)
                .ccd_enabled(true)
                .can_sleep(false),
        };
        builder
            .translation(rapier::Vector::new(p.x, p.y, p.z))
            .build()
    }
}
