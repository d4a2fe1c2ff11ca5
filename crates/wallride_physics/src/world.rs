//! Physics world - main simulation container

use crate::body::{ForceMode, PhysicsBody, RigidBodyDesc, RigidBodyHandle};
use crate::collider::{ColliderDesc, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{ContactEvent, ContactListener, ContactPoint, ContactTracker, ObjectId};
use crate::query::{PhysicsQuery, RayCaster, RaycastHit, RaycastOptions};
use glam::Vec3;
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Contact bookkeeping for one watched collider
#[derive(Debug)]
struct ContactWatch {
    /// Only surfaces whose membership intersects this mask are reported
    surface_mask: u32,
    tracker: ContactTracker,
    pending: Vec<ContactEvent>,
}

/// Rapier-backed world the controller, projectiles and level live in.
///
/// Stepped at a fixed rate from a frame-time accumulator. Watched colliders
/// get their contacts snapshotted after every substep and turned into
/// begin/persist/end events for a [`ContactListener`].
pub struct PhysicsWorld {
    config: PhysicsConfig,
    gravity: rapier::Vector<f32>,
    integration_params: rapier::IntegrationParameters,

    pipeline: rapier::PhysicsPipeline,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,
    query_pipeline: rapier::QueryPipeline,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,

    /// Accelerations to apply during the next substep only
    pending_accelerations: HashMap<RigidBodyHandle, Vec3>,
    watches: HashMap<ColliderHandle, ContactWatch>,
    /// Frame time not yet consumed by a substep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        if let Some(iterations) = NonZeroUsize::new(config.velocity_iterations) {
            integration_params.num_solver_iterations = iterations;
        }

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            pending_accelerations: HashMap::new(),
            watches: HashMap::new(),
            accumulated_time: 0.0,
        }
    }

    /// Create a world after checking the configuration
    pub fn try_new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Length of one fixed substep in seconds
    pub fn timestep(&self) -> f32 {
        self.config.timestep
    }

    /// Fraction of a substep carried over to the next frame, in `[0, 1)`.
    /// Used by variable-rate consumers to interpolate between substeps.
    pub fn interpolation_alpha(&self) -> f32 {
        (self.accumulated_time / self.config.timestep).clamp(0.0, 1.0)
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body
    pub fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        let handle = self.bodies.insert(desc.build());
        RigidBodyHandle(handle)
    }

    /// Remove a rigid body and its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // Remove attached colliders
        );
        self.pending_accelerations.remove(&handle);
        let colliders = &self.colliders;
        self.watches.retain(|h, _| colliders.contains(h.0));
    }

    /// Get rigid body position
    pub fn get_body_position(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let pos = b.translation();
                Vec3::new(pos.x, pos.y, pos.z)
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body linear velocity
    pub fn get_body_linear_velocity(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let vel = b.linvel();
                Vec3::new(vel.x, vel.y, vel.z)
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Set rigid body linear velocity
    pub fn set_body_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.set_linvel(rapier::Vector::new(velocity.x, velocity.y, velocity.z), true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Apply a force in the given mode.
    ///
    /// Accelerations accumulate and act on the next substep only; velocity
    /// changes take effect immediately.
    pub fn add_force(&mut self, handle: RigidBodyHandle, force: Vec3, mode: ForceMode) -> Result<()> {
        match mode {
            ForceMode::Acceleration => {
                if !self.bodies.contains(handle.0) {
                    return Err(PhysicsError::BodyNotFound(handle));
                }
                *self.pending_accelerations.entry(handle).or_insert(Vec3::ZERO) += force;
                Ok(())
            }
            ForceMode::VelocityChange => {
                let velocity = self.get_body_linear_velocity(handle)?;
                self.set_body_linear_velocity(handle, velocity + force)
            }
        }
    }

    /// Borrow one body through the collaborator traits
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Result<BodyMut<'_>> {
        if !self.bodies.contains(handle.0) {
            return Err(PhysicsError::BodyNotFound(handle));
        }
        Ok(BodyMut {
            world: self,
            handle,
        })
    }

    // ==================== Colliders ====================

    /// Create a collider, optionally attached to a rigid body
    pub fn create_collider(&mut self, desc: ColliderDesc, parent: Option<RigidBodyHandle>) -> ColliderHandle {
        let collider = desc.build();
        let handle = match parent {
            Some(body) => self.colliders.insert_with_parent(collider, body.0, &mut self.bodies),
            None => self.colliders.insert(collider),
        };
        ColliderHandle(handle)
    }

    /// Report contacts of `collider` against surfaces on the layers in
    /// `surface_mask` as begin/persist/end events.
    pub fn watch_contacts(&mut self, collider: ColliderHandle, surface_mask: u32) {
        self.watches.insert(
            collider,
            ContactWatch {
                surface_mask,
                tracker: ContactTracker::new(),
                pending: Vec::new(),
            },
        );
    }

    /// Hand the contact events gathered for `collider` to `listener`.
    /// Returns how many events were delivered.
    pub fn dispatch_contacts<L: ContactListener + ?Sized>(
        &mut self,
        collider: ColliderHandle,
        listener: &mut L,
    ) -> Result<usize> {
        let watch = self
            .watches
            .get_mut(&collider)
            .ok_or(PhysicsError::ColliderNotFound(collider))?;
        let events = std::mem::take(&mut watch.pending);
        for event in &events {
            event.dispatch(listener);
        }
        Ok(events.len())
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep
    pub fn step(&mut self, delta_time: f32) -> u32 {
        self.step_with(delta_time, |_| {})
    }

    /// Step with fixed timestep, running `before_substep` at the start of
    /// every substep. Contact dispatch and the controller's fixed update
    /// belong in that hook. Returns the number of substeps taken.
    pub fn step_with<F>(&mut self, delta_time: f32, mut before_substep: F) -> u32
    where
        F: FnMut(&mut PhysicsWorld),
    {
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            before_substep(self);
            self.step_internal();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }

        // Drop the backlog instead of spiralling
        if self.accumulated_time >= self.config.timestep {
            log::warn!(
                "Physics fell behind by {:.3}s, dropping backlog",
                self.accumulated_time
            );
            self.accumulated_time %= self.config.timestep;
        }

        steps
    }

    /// Manually sync the query pipeline with current colliders.
    /// Call this after adding colliders if you need to query before the first step().
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        // Accelerations are integrated as a velocity delta over this substep
        let dt = self.config.timestep;
        for (handle, acceleration) in self.pending_accelerations.drain() {
            if let Some(body) = self.bodies.get_mut(handle.0) {
                let delta = acceleration * dt;
                let velocity = *body.linvel() + rapier::Vector::new(delta.x, delta.y, delta.z);
                body.set_linvel(velocity, true);
            }
        }

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.query_pipeline.update(&self.colliders);
        self.collect_contacts();
    }

    /// Snapshot contacts of every watched collider and queue the events
    fn collect_contacts(&mut self) {
        for (watched, watch) in self.watches.iter_mut() {
            let mut snapshot: Vec<(ObjectId, Vec<ContactPoint>)> = Vec::new();

            for pair in self.narrow_phase.contact_pairs_with(watched.0) {
                if !pair.has_any_active_contact {
                    continue;
                }

                // Normals in a manifold point away from collider1
                let (other, sign) = if pair.collider1 == watched.0 {
                    (pair.collider2, -1.0f32)
                } else {
                    (pair.collider1, 1.0f32)
                };

                let Some(other_collider) = self.colliders.get(other) else {
                    continue;
                };
                if other_collider.is_sensor()
                    || other_collider.collision_groups().memberships.bits() & watch.surface_mask == 0
                {
                    continue;
                }

                let mut contacts = Vec::new();
                for manifold in &pair.manifolds {
                    let n = manifold.data.normal * sign;
                    for solver_contact in &manifold.data.solver_contacts {
                        let p = solver_contact.point;
                        contacts.push(ContactPoint::new(
                            Vec3::new(p.x, p.y, p.z),
                            Vec3::new(n.x, n.y, n.z),
                        ));
                    }
                }

                let object = ObjectId(other_collider.user_data as u64);
                match snapshot.iter_mut().find(|(o, _)| *o == object) {
                    Some((_, existing)) => existing.extend(contacts),
                    None => snapshot.push((object, contacts)),
                }
            }

            let events = watch.tracker.update(snapshot);
            for event in &events {
                match event {
                    ContactEvent::Begin { object, contacts } => {
                        log::debug!("Contact begin with {:?} ({} points)", object, contacts.len());
                    }
                    ContactEvent::End { object } => {
                        log::debug!("Contact end with {:?}", object);
                    }
                    ContactEvent::Persist { .. } => {
                        // Every substep while touching - too noisy to log
                    }
                }
            }
            watch.pending.extend(events);
        }
    }

    // ==================== Queries ====================

    /// Get a query interface for raycasting
    pub fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
        }
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl RayCaster for PhysicsWorld {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Vec<RaycastHit> {
        self.query().raycast_all(origin, direction, options)
    }
}

/// One body of a [`PhysicsWorld`] seen through the collaborator traits.
///
/// Also answers ray queries against the rest of the world, so a controller
/// can move its body and aim in the same fixed update.
pub struct BodyMut<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl<'w> BodyMut<'w> {
    /// The borrowed body
    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }
}

impl<'w> PhysicsBody for BodyMut<'w> {
    fn position(&self) -> Vec3 {
        self.world.get_body_position(self.handle).unwrap_or(Vec3::ZERO)
    }

    fn linear_velocity(&self) -> Vec3 {
        self.world
            .get_body_linear_velocity(self.handle)
            .unwrap_or(Vec3::ZERO)
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        if let Err(e) = self.world.add_force(self.handle, force, mode) {
            log::warn!("Dropped force on removed body: {}", e);
        }
    }
}

impl<'w> RayCaster for BodyMut<'w> {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Vec<RaycastHit> {
        self.world.raycast_all(origin, direction, options)
    }
}
