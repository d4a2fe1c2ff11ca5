//! Collision layers
//!
//! Each collider belongs to layers (`memberships`) and sees layers
//! (`filter`). Two colliders interact only when each one sees the other.

use serde::{Deserialize, Serialize};

/// Bit index of a collision layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Anything without a more specific role
    pub const DEFAULT: Self = Self(0);
    pub const PLAYER: Self = Self(1);
    /// Level geometry the player can stand on or ride along
    pub const GROUND: Self = Self(2);

    /// Single-bit mask for this layer
    pub const fn as_mask(&self) -> u32 {
        1 << self.0
    }

    /// Mask covering every layer in `layers`
    pub fn mask_of(layers: &[CollisionLayer]) -> u32 {
        layers.iter().map(CollisionLayer::as_mask).fold(0, |mask, bit| mask | bit)
    }
}

/// Membership and filter masks of one collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    pub memberships: u32,
    pub filter: u32,
}

impl CollisionGroups {
    /// Member of and sees every layer
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Create from a single layer that collides with specific layers
    pub fn from_layer(layer: CollisionLayer, collides_with: &[CollisionLayer]) -> Self {
        Self {
            memberships: layer.as_mask(),
            filter: CollisionLayer::mask_of(collides_with),
        }
    }

    /// Query groups that see every collider whose membership intersects `mask`
    pub fn query_mask(mask: u32) -> Self {
        Self {
            memberships: u32::MAX,
            filter: mask,
        }
    }

    /// Both sides see each other
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        self.memberships & other.filter != 0 && other.memberships & self.filter != 0
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_groups() {
        let player = CollisionGroups::from_layer(
            CollisionLayer::PLAYER,
            &[CollisionLayer::GROUND, CollisionLayer::PLAYER],
        );
        let ground = CollisionGroups::from_layer(CollisionLayer::GROUND, &[CollisionLayer::PLAYER]);
        let prop = CollisionGroups::from_layer(CollisionLayer::DEFAULT, &[]);

        assert!(player.can_collide(&ground));
        assert!(!player.can_collide(&prop));
    }

    #[test]
    fn test_query_mask_sees_members() {
        let aim = CollisionGroups::query_mask(CollisionLayer::mask_of(&[
            CollisionLayer::GROUND,
            CollisionLayer::PLAYER,
        ]));
        let ground = CollisionGroups::from_layer(CollisionLayer::GROUND, &[CollisionLayer::PLAYER]);
        let prop = CollisionGroups::from_layer(CollisionLayer::DEFAULT, &[CollisionLayer::GROUND]);

        assert!(aim.can_collide(&ground));
        assert!(!aim.can_collide(&prop));
    }
}
