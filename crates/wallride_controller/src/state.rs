//! Locomotion states and the forces each one uses

use crate::config::MovementParams;
use serde::{Deserialize, Serialize};

/// Current locomotion state. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionState {
    /// Standing or running on ground
    Ground,
    /// Airborne
    Air,
    /// Riding along a wall
    Wall,
    /// Pushed off a wall; like Air with its own acceleration and drag
    Knockback,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self::Air
    }
}

impl std::fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ground => write!(f, "ground"),
            Self::Air => write!(f, "air"),
            Self::Wall => write!(f, "wall"),
            Self::Knockback => write!(f, "knockback"),
        }
    }
}

/// Acceleration, drag and gravity in effect for one state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceProfile {
    /// Movement acceleration along the move direction
    pub acceleration: f32,
    pub horizontal_drag: f32,
    pub vertical_drag: f32,
    pub gravity: f32,
}

impl LocomotionState {
    /// Forces this state applies with the given tuning
    pub fn profile(&self, params: &MovementParams) -> ForceProfile {
        match self {
            Self::Ground => ForceProfile {
                acceleration: params.ground_acc,
                horizontal_drag: params.ground_horizontal_drag,
                vertical_drag: params.ground_vertical_drag,
                gravity: 0.0,
            },
            Self::Air => ForceProfile {
                acceleration: params.air_acc,
                horizontal_drag: params.air_horizontal_drag,
                vertical_drag: params.air_vertical_drag,
                gravity: params.air_gravity,
            },
            Self::Wall => ForceProfile {
                acceleration: params.wall_acc,
                horizontal_drag: params.wall_drag,
                vertical_drag: params.wall_drag,
                gravity: params.wall_gravity,
            },
            Self::Knockback => ForceProfile {
                acceleration: params.kb_acc,
                horizontal_drag: params.kb_drag,
                vertical_drag: params.air_vertical_drag,
                gravity: params.air_gravity,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_air() {
        assert_eq!(LocomotionState::default(), LocomotionState::Air);
    }

    #[test]
    fn test_profiles() {
        let params = MovementParams::default();

        let ground = LocomotionState::Ground.profile(&params);
        assert_eq!(ground.gravity, 0.0);
        assert_eq!(ground.horizontal_drag, params.ground_horizontal_drag);

        let wall = LocomotionState::Wall.profile(&params);
        assert_eq!(wall.horizontal_drag, params.wall_drag);
        assert_eq!(wall.vertical_drag, params.wall_drag);
        assert_eq!(wall.gravity, params.wall_gravity);

        let knockback = LocomotionState::Knockback.profile(&params);
        assert_eq!(knockback.acceleration, params.kb_acc);
        assert_eq!(knockback.horizontal_drag, params.kb_drag);
        assert_eq!(knockback.vertical_drag, params.air_vertical_drag);
        assert_eq!(knockback.gravity, params.air_gravity);
    }
}
