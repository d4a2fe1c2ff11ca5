//! Player session: owns the world, the controller and its camera
//!
//! A session is built in two steps. [`SessionBuilder`] collects the world
//! geometry, spawn points and camera binding; [`SessionBuilder::spawn`]
//! checks that nothing is missing and places the player. After that the host
//! calls [`GameSession::tick`] once per rendered frame.

use crate::camera::{CameraRig, MeshPose};
use crate::config::{ControllerConfig, SharedSettings};
use crate::controller::{ControllerEvent, ControllerSnapshot, MovementController};
use crate::error::{ControllerError, Result};
use crate::input::{input_channel, InputQueue, InputSender};
use crate::look::LookAngles;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use wallride_combat::Weapon;
use wallride_physics::{
    ColliderDesc, ColliderHandle, ColliderShape, CollisionGroups, CollisionLayer, PhysicsBody,
    PhysicsError, PhysicsWorld, RigidBodyDesc, RigidBodyHandle,
};

/// A place the player may start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    /// Initial facing in degrees
    pub yaw: f32,
}

impl SpawnPoint {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// Collects everything a session needs before the player exists
pub struct SessionBuilder {
    config: ControllerConfig,
    world: PhysicsWorld,
    spawn_points: Vec<SpawnPoint>,
    camera: Option<CameraRig>,
}

impl SessionBuilder {
    /// Start a session with an empty world
    pub fn new(config: ControllerConfig) -> Result<Self> {
        let world = PhysicsWorld::try_new(config.physics.clone())?;
        Ok(Self {
            config,
            world,
            spawn_points: Vec::new(),
            camera: None,
        })
    }

    /// World to build level geometry into
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Add a spawn point
    pub fn with_spawn_point(mut self, spawn: SpawnPoint) -> Self {
        self.spawn_points.push(spawn);
        self
    }

    /// Bind the camera that will follow the player
    pub fn with_camera(mut self, camera: CameraRig) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Place the player at a random spawn point.
    ///
    /// Fails without spawn points or a bound camera, or when the
    /// configuration is invalid.
    pub fn spawn(self) -> Result<GameSession> {
        let Self {
            config,
            mut world,
            spawn_points,
            camera,
        } = self;

        config.validate()?;
        if spawn_points.is_empty() {
            return Err(ControllerError::NoSpawnPoints);
        }
        let mut camera = camera.ok_or(ControllerError::CameraNotBound)?;

        let index = ((rand_float() * spawn_points.len() as f32) as usize).min(spawn_points.len() - 1);
        let spawn = spawn_points[index];

        let p = spawn.position;
        let body = world.create_rigid_body(RigidBodyDesc::character().with_position(p.x, p.y, p.z));
        let collider = world.create_collider(
            ColliderDesc::new(ColliderShape::capsule(config.body.half_height, config.body.radius))
                .with_friction(0.0)
                .with_collision_groups(CollisionGroups::from_layer(
                    CollisionLayer::PLAYER,
                    &[CollisionLayer::GROUND, CollisionLayer::PLAYER],
                ))
                .with_object(config.body.object),
            Some(body),
        );
        world.watch_contacts(collider, CollisionLayer::GROUND.as_mask());
        world.sync_query_pipeline();

        let settings = config.settings.clone().shared();
        let weapon = Weapon::new("rifle").with_stats(config.weapon.clone());
        let controller = MovementController::new(
            config.movement.clone(),
            weapon,
            settings.clone(),
            config.body.object,
        )?
        .with_aim_offsets(camera.config().offset(), config.body.muzzle_offset())
        .with_look(LookAngles::new(spawn.yaw, 0.0));

        camera.start_follow(p);

        log::info!(
            "Spawned player {:?} at {:?} (spawn point {} of {})",
            config.body.object,
            p,
            index + 1,
            spawn_points.len()
        );

        let (sender, queue) = input_channel();
        Ok(GameSession {
            world,
            controller,
            camera,
            settings,
            spawn_points,
            body,
            collider,
            sender,
            queue,
        })
    }
}

/// A spawned player and the world it moves in
pub struct GameSession {
    world: PhysicsWorld,
    controller: MovementController,
    camera: CameraRig,
    settings: SharedSettings,
    spawn_points: Vec<SpawnPoint>,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    sender: InputSender,
    queue: InputQueue,
}

impl GameSession {
    /// Advance one rendered frame. Runs as many fixed substeps as the frame
    /// time covers, then updates the camera and visuals. Returns the number
    /// of substeps taken.
    pub fn tick(&mut self, frame_time: f32) -> Result<u32> {
        let Self {
            world,
            controller,
            camera,
            body,
            collider,
            queue,
            ..
        } = self;
        let body = *body;
        let collider = *collider;

        let mut failure: Option<PhysicsError> = None;
        let steps = world.step_with(frame_time, |world| {
            if failure.is_some() {
                return;
            }
            let dt = world.timestep();

            for event in queue.drain() {
                controller.apply_input(event);
            }

            if let Err(e) = world.dispatch_contacts(collider, &mut *controller) {
                failure = Some(e);
                return;
            }

            match world.body_mut(body) {
                Ok(mut handle) => {
                    controller.fixed_update(&mut handle, dt);
                    let snapshot =
                        controller.snapshot(handle.position(), handle.linear_velocity());
                    camera.fixed_update(&snapshot, dt);
                }
                Err(e) => failure = Some(e),
            }
        });

        if let Some(e) = failure {
            return Err(e.into());
        }

        camera.update(world.interpolation_alpha());
        let snapshot = self.snapshot()?;
        self.camera.late_update(&snapshot);
        self.controller.update_visuals(frame_time);

        Ok(steps)
    }

    /// Handle for producing input from any thread
    pub fn input_sender(&self) -> InputSender {
        self.sender.clone()
    }

    /// Settings shared with the controller
    pub fn settings(&self) -> SharedSettings {
        self.settings.clone()
    }

    /// Current controller state for cameras and UI
    pub fn snapshot(&self) -> Result<ControllerSnapshot> {
        let position = self.world.get_body_position(self.body)?;
        let velocity = self.world.get_body_linear_velocity(self.body)?;
        Ok(self.controller.snapshot(position, velocity))
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Where to draw the player's own mesh
    pub fn mesh_pose(&self) -> MeshPose {
        self.camera.mesh_pose(self.controller.look().yaw)
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// Take controller events since the last call
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        self.controller.drain_events()
    }
}

fn rand_float() -> f32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as f32 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::input::InputEvent;
    use crate::state::LocomotionState;

    fn arena(builder: &mut SessionBuilder) {
        let world = builder.world_mut();
        let floor = world.create_rigid_body(RigidBodyDesc::fixed().with_position(0.0, -0.5, 0.0));
        world.create_collider(
            ColliderDesc::new(ColliderShape::cuboid(50.0, 0.5, 50.0))
                .with_collision_groups(CollisionGroups::from_layer(
                    CollisionLayer::GROUND,
                    &[CollisionLayer::PLAYER],
                ))
                .with_object(wallride_physics::ObjectId(100)),
            Some(floor),
        );
    }

    #[test]
    fn test_spawn_requires_spawn_points() {
        let builder = SessionBuilder::new(ControllerConfig::default())
            .unwrap()
            .with_camera(CameraRig::new(CameraConfig::default()));
        assert!(matches!(builder.spawn(), Err(ControllerError::NoSpawnPoints)));
    }

    #[test]
    fn test_spawn_requires_camera() {
        let builder = SessionBuilder::new(ControllerConfig::default())
            .unwrap()
            .with_spawn_point(SpawnPoint::new(Vec3::new(0.0, 2.0, 0.0), 0.0));
        assert!(matches!(builder.spawn(), Err(ControllerError::CameraNotBound)));
    }

    #[test]
    fn test_spawn_faces_spawn_yaw() {
        let session = SessionBuilder::new(ControllerConfig::default())
            .unwrap()
            .with_spawn_point(SpawnPoint::new(Vec3::new(0.0, 2.0, 0.0), 45.0))
            .with_camera(CameraRig::new(CameraConfig::default()))
            .spawn()
            .unwrap();

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.yaw, 45.0);
        assert_eq!(snapshot.state, LocomotionState::Air);
        assert_eq!(snapshot.position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_falls_and_lands() {
        let mut builder = SessionBuilder::new(ControllerConfig::default()).unwrap();
        arena(&mut builder);
        let mut session = builder
            .with_spawn_point(SpawnPoint::new(Vec3::new(0.0, 2.0, 0.0), 0.0))
            .with_camera(CameraRig::new(CameraConfig::default()))
            .spawn()
            .unwrap();

        let mut landed = false;
        for _ in 0..120 {
            session.tick(1.0 / 60.0).unwrap();
            let snapshot = session.snapshot().unwrap();
            if snapshot.state == LocomotionState::Ground {
                landed = true;
                assert!(snapshot.double_jump);
                assert!(snapshot.ground_contacts >= 1);
            }
        }

        assert!(landed);
        let snapshot = session.snapshot().unwrap();
        assert!(snapshot.position.y < 1.5);
        assert!(snapshot.position.y > 0.5);
    }

    #[test]
    fn test_input_reaches_controller() {
        let mut session = SessionBuilder::new(ControllerConfig::default())
            .unwrap()
            .with_spawn_point(SpawnPoint::new(Vec3::ZERO, 0.0))
            .with_camera(CameraRig::new(CameraConfig::default()))
            .spawn()
            .unwrap();

        let sender = session.input_sender();
        assert!(sender.send(InputEvent::Look(glam::Vec2::new(10.0, 0.0))));
        session.settings().write().mouse_sensitivity = 1.0;

        // Enough frame time for at least one substep
        session.tick(0.05).unwrap();
        assert_eq!(session.controller().look().yaw, 10.0);
    }
}
