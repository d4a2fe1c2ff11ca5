//! Wallride Controller - First-Person Locomotion
//!
//! A rigid body driven through four locomotion states, each with its own
//! acceleration, drag and gravity:
//!
//! - **Ground** - running on surfaces no steeper than the slope limit
//! - **Air** - falling or jumping, with one double jump per landing
//! - **Wall** - riding along a vertical surface after jumping into it
//! - **Knockback** - pushed off a wall, until the next landing or wall ride
//!
//! Transitions come from two sources: contact changes reported by the
//! physics collaborator (through [`ContactRegistry`]) and jump input edges
//! (through the [`InputState`] buffer).
//!
//! # Architecture
//!
//! ```text
//!  physics ──contacts──▶ ContactRegistry ──normals/deltas──▶ MovementController
//!     ▲                                                        │      │
//!     └──────────────── forces (accel / velocity change) ──────┘      │
//!  input thread ──InputSender──▶ InputQueue ──edges──▶ ───────────────┤
//!                                                                     ▼
//!                                      ControllerSnapshot ──▶ CameraRig
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wallride_controller::prelude::*;
//!
//! let mut builder = SessionBuilder::new(ControllerConfig::default())?;
//! build_level(builder.world_mut());
//! let mut session = builder
//!     .with_spawn_point(SpawnPoint::new(Vec3::new(0.0, 2.0, 0.0), 0.0))
//!     .with_camera(CameraRig::new(CameraConfig::default()))
//!     .spawn()?;
//!
//! let input = session.input_sender();
//! input.send(InputEvent::Jump(true));
//! session.tick(1.0 / 60.0)?;
//! ```

pub mod camera;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod input;
pub mod look;
pub mod registry;
pub mod session;
pub mod state;

pub mod prelude {
    //! Common imports for controller functionality
    pub use crate::camera::{CameraRig, MeshPose};
    pub use crate::config::{
        BodyConfig, CameraConfig, ControllerConfig, MovementParams, PlayerSettings, SharedSettings,
    };
    pub use crate::controller::{ControllerEvent, ControllerSnapshot, MovementController};
    pub use crate::drag::{drag_acceleration, gravity_acceleration, project_on_plane};
    pub use crate::error::{ControllerError, Result};
    pub use crate::input::{input_channel, InputEdges, InputEvent, InputQueue, InputSender, InputState};
    pub use crate::look::{signed_angle, LookAngles, PITCH_LIMIT};
    pub use crate::registry::{Contact, ContactRegistry, RegistryDelta, SurfaceKind, UP};
    pub use crate::session::{GameSession, SessionBuilder, SpawnPoint};
    pub use crate::state::{ForceProfile, LocomotionState};
}

pub use prelude::*;
