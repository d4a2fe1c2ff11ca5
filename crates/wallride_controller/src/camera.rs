//! First-person camera rig
//!
//! The rig only reads [`ControllerSnapshot`]s. Positions are captured once
//! per fixed step and blended by the fixed-step fraction each frame, so the
//! view stays smooth when the frame rate and the physics rate differ.

use crate::config::CameraConfig;
use crate::controller::ControllerSnapshot;
use crate::look::LookAngles;
use glam::{Quat, Vec3};
use wallride_combat::move_towards;

/// Where to draw the player's own mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPose {
    pub position: Vec3,
    /// Yaw only
    pub rotation: Quat,
}

/// Camera bound to one controller
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    previous: Vec3,
    current: Vec3,
    /// Current roll in degrees
    roll: f32,
    position: Vec3,
    rotation: Quat,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            previous: Vec3::ZERO,
            current: Vec3::ZERO,
            roll: 0.0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Snap to a body at `position`, dropping any history
    pub fn start_follow(&mut self, position: Vec3) {
        self.previous = position;
        self.current = position;
        self.roll = 0.0;
        self.position = position + self.config.offset();
    }

    /// Capture the body position and ease the roll toward the lean target
    pub fn fixed_update(&mut self, snapshot: &ControllerSnapshot, delta_time: f32) {
        let max_delta = self.config.rotation_speed * delta_time;
        self.roll = move_towards(self.roll, snapshot.lean_target, max_delta);

        self.previous = self.current;
        self.current = snapshot.position;
    }

    /// Blend between the last two captured positions. `alpha` is the
    /// fraction of a fixed step elapsed since the last one ran.
    pub fn update(&mut self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.position = self.previous.lerp(self.current, alpha) + self.config.offset();
    }

    /// Orient the view after all movement for the frame is done
    pub fn late_update(&mut self, snapshot: &ControllerSnapshot) {
        let look = LookAngles::new(snapshot.yaw, snapshot.pitch);
        self.rotation = look.view_rotation(self.roll);
    }

    /// World position of the camera
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Roll in degrees
    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// Mesh sits under the camera and turns with yaw only
    pub fn mesh_pose(&self, yaw: f32) -> MeshPose {
        MeshPose {
            position: self.position - self.config.offset(),
            rotation: LookAngles::new(yaw, 0.0).body_rotation(),
        }
    }
}
