//! Colliders tagged with the object they belong to

use crate::events::ObjectId;
use crate::layers::CollisionGroups;
use glam::Vec3;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

/// Shapes the arena and the player are made of
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Upright capsule; `half_height` is the straight section only
    Capsule { half_height: f32, radius: f32 },
}

impl ColliderShape {
    pub fn sphere(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Box from half extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Cuboid {
            half_extents: Vec3::new(hx, hy, hz),
        }
    }

    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::Capsule { half_height, radius }
    }

    fn shared_shape(&self) -> rapier::SharedShape {
        match *self {
            Self::Ball { radius } => rapier::SharedShape::ball(radius),
            Self::Cuboid { half_extents: h } => rapier::SharedShape::cuboid(h.x, h.y, h.z),
            Self::Capsule { half_height, radius } => rapier::SharedShape::capsule_y(half_height, radius),
        }
    }
}

/// How to build a collider.
///
/// The [`ObjectId`] is what contact callbacks and ray hits report, so every
/// piece of level geometry the controller can touch should carry one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    /// Combined with the other surface by taking the smaller value
    pub friction: f32,
    /// Sensors never show up in contact reports
    pub sensor: bool,
    pub collision_groups: CollisionGroups,
    pub object: ObjectId,
}

impl ColliderDesc {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            friction: 0.5,
            sensor: false,
            collision_groups: CollisionGroups::ALL,
            object: ObjectId::NONE,
        }
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Make this a sensor
    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    /// Set collision groups
    pub fn with_collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set the identity reported for this collider
    pub fn with_object(mut self, object: ObjectId) -> Self {
        self.object = object;
        self
    }

    pub(crate) fn build(&self) -> rapier::Collider {
        let groups = rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(self.collision_groups.memberships),
            rapier::Group::from_bits_truncate(self.collision_groups.filter),
        );
        rapier::ColliderBuilder::new(self.shape.shared_shape())
            .sensor(self.sensor)
            .friction(self.friction)
            .friction_combine_rule(rapier::CoefficientCombineRule::Min)
            .collision_groups(groups)
            .user_data(self.object.0 as u128)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_stored_in_user_data() {
        let collider = ColliderDesc::new(ColliderShape::capsule(0.5, 0.5))
            .with_object(ObjectId(42))
            .build();
        assert_eq!(collider.user_data, 42);
        assert!(!collider.is_sensor());
    }

    #[test]
    fn test_sensor_flag() {
        let collider = ColliderDesc::new(ColliderShape::sphere(1.0)).as_sensor().build();
        assert!(collider.is_sensor());
    }
}
