//! Controller configuration

use crate::error::{ControllerError, Result};
use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wallride_combat::WeaponStats;
use wallride_physics::{ObjectId, PhysicsConfig};

/// Movement tuning. Read-only once the controller is built.
///
/// Accelerations and gravities are in units/s², drags in 1/s, speeds in
/// units/s and angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementParams {
    pub ground_acc: f32,
    pub air_acc: f32,
    pub wall_acc: f32,
    pub kb_acc: f32,

    /// Vertical speed a jump or double jump raises the body to
    pub jump_speed: f32,
    /// Vertical speed a wall ride starts with, if the body is slower
    pub wall_boost_speed: f32,
    /// Speed pushed along the wall normal when leaving a wall
    pub wall_jump_speed: f32,

    pub ground_horizontal_drag: f32,
    pub ground_vertical_drag: f32,
    pub air_horizontal_drag: f32,
    pub air_vertical_drag: f32,
    /// Both drags while wall riding
    pub wall_drag: f32,
    /// Horizontal drag during knockback
    pub kb_drag: f32,

    pub air_gravity: f32,
    pub wall_gravity: f32,

    /// Steepest surface still counted as ground
    pub slope_limit: f32,
    /// How far from exactly vertical a surface may be and still count as a
    /// wall. Zero only accepts perfectly vertical surfaces.
    pub wall_angle_tolerance: f32,
    /// Camera roll at full lean while wall riding
    pub lean_constant: f32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            ground_acc: 70.0,
            air_acc: 18.0,
            wall_acc: 35.0,
            kb_acc: 8.0,
            jump_speed: 9.0,
            wall_boost_speed: 5.0,
            wall_jump_speed: 20.0,
            ground_horizontal_drag: 7.0,
            ground_vertical_drag: 3.0,
            air_horizontal_drag: 0.6,
            air_vertical_drag: 0.1,
            wall_drag: 1.5,
            kb_drag: 0.3,
            air_gravity: 25.0,
            wall_gravity: 5.0,
            slope_limit: 50.0,
            wall_angle_tolerance: 0.0,
            lean_constant: 15.0,
        }
    }
}

impl MovementParams {
    /// Set the steepest walkable slope
    pub fn with_slope_limit(mut self, degrees: f32) -> Self {
        self.slope_limit = degrees;
        self
    }

    /// Accept walls up to `degrees` away from vertical
    pub fn with_wall_angle_tolerance(mut self, degrees: f32) -> Self {
        self.wall_angle_tolerance = degrees;
        self
    }

    /// Reject tuning that would break the ground/wall split
    pub fn validate(&self) -> Result<()> {
        if !(0.0..90.0).contains(&self.slope_limit) {
            return Err(ControllerError::InvalidConfig(format!(
                "slope_limit must be in [0, 90), got {}",
                self.slope_limit
            )));
        }
        if self.wall_angle_tolerance < 0.0 || self.slope_limit >= 90.0 - self.wall_angle_tolerance {
            return Err(ControllerError::InvalidConfig(format!(
                "wall_angle_tolerance {} overlaps slope_limit {}",
                self.wall_angle_tolerance, self.slope_limit
            )));
        }
        let non_negative = [
            ("jump_speed", self.jump_speed),
            ("wall_boost_speed", self.wall_boost_speed),
            ("wall_jump_speed", self.wall_jump_speed),
            ("ground_horizontal_drag", self.ground_horizontal_drag),
            ("ground_vertical_drag", self.ground_vertical_drag),
            ("air_horizontal_drag", self.air_horizontal_drag),
            ("air_vertical_drag", self.air_vertical_drag),
            ("wall_drag", self.wall_drag),
            ("kb_drag", self.kb_drag),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ControllerError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Per-player settings shared between the session and the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Degrees of rotation per unit of look delta
    pub mouse_sensitivity: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.4,
        }
    }
}

/// Settings owned by the session and read by the controller under a lock
pub type SharedSettings = Arc<RwLock<PlayerSettings>>;

impl PlayerSettings {
    /// Wrap for sharing
    pub fn shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }
}

/// Camera rig tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position relative to the body origin; also the aim origin
    pub offset: [f32; 3],
    /// Degrees per second the roll moves toward the lean target
    pub rotation_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.7, 0.0],
            rotation_speed: 60.0,
        }
    }
}

impl CameraConfig {
    /// Offset as a vector
    pub fn offset(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }

    /// Set the camera offset
    pub fn with_offset(mut self, x: f32, y: f32, z: f32) -> Self {
        self.offset = [x, y, z];
        self
    }
}

/// The player's physical body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Identity the player's collider reports
    pub object: ObjectId,
    pub radius: f32,
    /// Half height of the capsule's straight section
    pub half_height: f32,
    /// Muzzle position in view space, relative to the camera
    pub muzzle_offset: [f32; 3],
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            object: ObjectId(1),
            radius: 0.5,
            half_height: 0.5,
            muzzle_offset: [0.3, -0.25, -0.5],
        }
    }
}

impl BodyConfig {
    /// Muzzle offset as a vector
    pub fn muzzle_offset(&self) -> Vec3 {
        Vec3::from_array(self.muzzle_offset)
    }
}

/// Everything needed to spawn a controlled player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub physics: PhysicsConfig,
    pub movement: MovementParams,
    pub camera: CameraConfig,
    pub weapon: WeaponStats,
    pub body: BodyConfig,
    pub settings: PlayerSettings,
}

impl ControllerConfig {
    /// Set camera tuning
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;
        self.movement.validate()?;
        self.weapon.validate()?;
        if self.body.radius <= 0.0 || self.body.half_height < 0.0 {
            return Err(ControllerError::InvalidConfig(format!(
                "body capsule must have a positive radius, got radius {} half height {}",
                self.body.radius, self.body.half_height
            )));
        }
        if self.body.object == ObjectId::NONE {
            return Err(ControllerError::InvalidConfig(
                "player object id must not be ObjectId::NONE".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
        assert_eq!(MovementParams::default().wall_jump_speed, 20.0);
        assert_eq!(PlayerSettings::default().mouse_sensitivity, 0.4);
    }

    #[test]
    fn test_slope_limit_must_leave_room_for_walls() {
        let params = MovementParams::default().with_slope_limit(90.0);
        assert!(matches!(params.validate(), Err(ControllerError::InvalidConfig(_))));

        let params = MovementParams::default()
            .with_slope_limit(85.0)
            .with_wall_angle_tolerance(10.0);
        assert!(params.validate().is_err());

        let params = MovementParams::default()
            .with_slope_limit(60.0)
            .with_wall_angle_tolerance(5.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_negative_drag_rejected() {
        let params = MovementParams {
            kb_drag: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_physics_errors_propagate() {
        let mut config = ControllerConfig::default();
        config.physics.timestep = 0.0;
        assert!(matches!(config.validate(), Err(ControllerError::Physics(_))));
    }
}
