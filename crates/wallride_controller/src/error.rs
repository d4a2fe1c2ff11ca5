//! Controller error types

use thiserror::Error;
use wallride_combat::CombatError;
use wallride_physics::PhysicsError;

/// Errors raised while setting up or running a controller session
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The level has nowhere to put the player
    #[error("No spawn points available")]
    NoSpawnPoints,

    /// The aim origin is derived from the camera, so one must be bound
    #[error("No camera bound to the session")]
    CameraNotBound,

    /// Tuning rejected at construction
    #[error("Invalid controller configuration: {0}")]
    InvalidConfig(String),

    /// Physics collaborator failure
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Weapon setup failure
    #[error("Combat error: {0}")]
    Combat(#[from] CombatError),
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;
