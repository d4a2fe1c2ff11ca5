//! Wallride Physics - Rapier 3D Collaborator
//!
//! This crate is the physics side of the Wallride movement controller. The
//! controller never talks to Rapier directly; it only sees the traits defined
//! here, so any engine that can report contacts, apply forces and cast rays
//! can drive it.
//!
//! # Features
//!
//! - Contact begin/persist/end callbacks per touched object
//! - Acceleration and velocity-change force modes
//! - Ray queries returning every hit against a layer mask
//! - Collision layers and filtering
//! - A Rapier-backed [`PhysicsWorld`] implementing all of the above
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 PhysicsWorld                  │
//! │  ┌────────────┐ ┌─────────────┐ ┌──────────┐ │
//! │  │ Rapier sets│ │ContactTracker│ │  Query   │ │
//! │  └────────────┘ └─────────────┘ └──────────┘ │
//! └──────────────────────────────────────────────┘
//!          │                │               │
//!          ▼                ▼               ▼
//!    ┌───────────┐  ┌───────────────┐ ┌──────────┐
//!    │PhysicsBody│  │ContactListener│ │RayCaster │
//!    └───────────┘  └───────────────┘ └──────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wallride_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let body = physics.create_rigid_body(RigidBodyDesc::dynamic().with_position(0.0, 2.0, 0.0));
//! let collider = physics.create_collider(
//!     ColliderDesc::new(ColliderShape::capsule(0.5, 0.5)).with_object(ObjectId(1)),
//!     Some(body),
//! );
//! physics.watch_contacts(collider, CollisionLayer::GROUND.as_mask());
//!
//! physics.step_with(1.0 / 50.0, |world| {
//!     world.dispatch_contacts(collider, &mut my_listener);
//! });
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod layers;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyKind, ForceMode, PhysicsBody, RigidBodyDesc, RigidBodyHandle};
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{ContactEvent, ContactListener, ContactPoint, ContactTracker, ObjectId};
    pub use crate::layers::{CollisionGroups, CollisionLayer};
    pub use crate::query::{RayCaster, RaycastHit, RaycastOptions};
    pub use crate::world::{BodyMut, PhysicsWorld};
}

pub use prelude::*;
