//! Locomotion state machine
//!
//! The controller is driven from two directions. Contact callbacks update the
//! registry and take the collision-driven transitions (landing, leaving the
//! ground, losing the wall). [`MovementController::fixed_update`] then runs
//! once per physics substep: it fires the weapon, applies movement, evaluates
//! the jump-driven transitions and adds drag and gravity.
//!
//! ```text
//!             ground 0→N                    jump (wall normal ≠ 0)
//!   Air ───────────────────▶ Ground   Air/Knockback ─────────────────▶ Wall
//!    ▲                         │                                        │
//!    └──── jump / ground N→0 ──┘          Knockback ◀── release / wall N→0
//! ```

use crate::config::{MovementParams, SharedSettings};
use crate::drag::{drag_acceleration, gravity_acceleration, project_on_plane};
use crate::error::Result;
use crate::input::{InputEvent, InputState};
use crate::look::{signed_angle, LookAngles};
use crate::registry::{ContactRegistry, RegistryDelta, UP};
use crate::state::LocomotionState;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use wallride_combat::{AimPose, Impact, ProjectileSet, ShotReport, Weapon};
use wallride_physics::{ContactListener, ContactPoint, ForceMode, ObjectId, PhysicsBody, RayCaster};

/// Something the controller did, for logging and game logic
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Locomotion state changed
    StateChanged {
        from: LocomotionState,
        to: LocomotionState,
    },
    /// Jumped off the ground
    Jumped,
    /// Used the double jump
    DoubleJumped,
    /// Pushed off a wall along `normal`
    WallJump { normal: Vec3 },
    /// Fired a shot
    Fired(ShotReport),
    /// A resolving projectile hit something
    Impact(Impact),
}

/// Read-only view of the controller for cameras and UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub yaw: f32,
    pub pitch: f32,
    /// Camera roll the rig should lean toward, degrees
    pub lean_target: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub state: LocomotionState,
    pub double_jump: bool,
    pub ground_contacts: usize,
    pub wall_contacts: usize,
}

/// First-person movement controller
pub struct MovementController {
    params: MovementParams,
    settings: SharedSettings,
    /// Own identity, excluded from aim rays
    object: ObjectId,

    registry: ContactRegistry,
    state: LocomotionState,
    ground_normal: Vec3,
    wall_normal: Vec3,
    double_jump: bool,
    /// Wall jump owed from a contact callback, applied at the next fixed step
    pending_wall_jump: Option<Vec3>,

    look: LookAngles,
    input: InputState,

    weapon: Weapon,
    projectiles: ProjectileSet,
    eye_offset: Vec3,
    muzzle_offset: Vec3,

    events: Vec<ControllerEvent>,
}

impl MovementController {
    /// Create a controller in the Air state
    pub fn new(
        params: MovementParams,
        weapon: Weapon,
        settings: SharedSettings,
        object: ObjectId,
    ) -> Result<Self> {
        params.validate()?;
        weapon.stats.validate()?;

        Ok(Self {
            registry: ContactRegistry::new(params.slope_limit, params.wall_angle_tolerance),
            params,
            settings,
            object,
            state: LocomotionState::Air,
            ground_normal: UP,
            wall_normal: Vec3::ZERO,
            double_jump: false,
            pending_wall_jump: None,
            look: LookAngles::default(),
            input: InputState::default(),
            weapon,
            projectiles: ProjectileSet::new(),
            eye_offset: Vec3::ZERO,
            muzzle_offset: Vec3::ZERO,
            events: Vec::new(),
        })
    }

    /// Set where the eye and muzzle sit. `eye` is relative to the body
    /// origin, `muzzle` is in view space relative to the eye.
    pub fn with_aim_offsets(mut self, eye: Vec3, muzzle: Vec3) -> Self {
        self.eye_offset = eye;
        self.muzzle_offset = muzzle;
        self
    }

    /// Start looking in a given direction
    pub fn with_look(mut self, look: LookAngles) -> Self {
        self.look = look;
        self
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn double_jump(&self) -> bool {
        self.double_jump
    }

    pub fn ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    pub fn wall_normal(&self) -> Vec3 {
        self.wall_normal
    }

    pub fn registry(&self) -> &ContactRegistry {
        &self.registry
    }

    pub fn look(&self) -> LookAngles {
        self.look
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn params(&self) -> &MovementParams {
        &self.params
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn projectiles(&self) -> &ProjectileSet {
        &self.projectiles
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Take everything that happened since the last call
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    // ==================== Input ====================

    /// Fold one input event in. Look deltas rotate the view right away.
    pub fn apply_input(&mut self, event: InputEvent) {
        if let Some(delta) = self.input.apply(event) {
            let sensitivity = self.settings.read().mouse_sensitivity;
            self.look.apply_delta(delta, sensitivity);
        }
    }

    // ==================== Outputs ====================

    /// Camera roll target: leans away from the wall while riding it
    pub fn lean_target(&self) -> f32 {
        if self.state != LocomotionState::Wall {
            return 0.0;
        }
        let angle = signed_angle(self.wall_normal, self.look.forward(), UP);
        self.params.lean_constant * angle.to_radians().sin()
    }

    /// Snapshot for cameras and UI
    pub fn snapshot(&self, position: Vec3, velocity: Vec3) -> ControllerSnapshot {
        ControllerSnapshot {
            yaw: self.look.yaw,
            pitch: self.look.pitch,
            lean_target: self.lean_target(),
            position,
            velocity,
            state: self.state,
            double_jump: self.double_jump,
            ground_contacts: self.registry.ground_count(),
            wall_contacts: self.registry.wall_count(),
        }
    }

    /// Eye, muzzle and aim direction for a body at `position`
    pub fn aim_pose(&self, position: Vec3) -> AimPose {
        let rotation = self.look.view_rotation(0.0);
        let eye = position + self.eye_offset;
        AimPose::new(eye, eye + rotation * self.muzzle_offset, rotation * Vec3::NEG_Z)
    }

    /// Movement direction on the ground plane, zero without input
    pub fn move_direction(&self) -> Vec3 {
        let wish = self.wish_direction();
        if wish == Vec3::ZERO {
            return Vec3::ZERO;
        }
        project_on_plane(wish, self.ground_normal).normalize_or_zero()
    }

    /// Movement direction along the wall plane, zero without a wall
    fn wall_direction(&self) -> Vec3 {
        let wish = self.wish_direction();
        if wish == Vec3::ZERO || self.wall_normal == Vec3::ZERO {
            return Vec3::ZERO;
        }
        project_on_plane(wish, self.wall_normal).normalize_or_zero()
    }

    fn wish_direction(&self) -> Vec3 {
        let input = self.input.move_input;
        self.look.right() * input.x + self.look.forward() * input.y
    }

    // ==================== Visual frame ====================

    /// Per-frame visual work (display projectile growth)
    pub fn update_visuals(&mut self, delta_time: f32) {
        self.projectiles.update_visuals(delta_time);
    }

    // ==================== Fixed step ====================

    /// Run one physics substep against `body`
    pub fn fixed_update<B>(&mut self, body: &mut B, delta_time: f32)
    where
        B: PhysicsBody + RayCaster + ?Sized,
    {
        if let Some(normal) = self.pending_wall_jump.take() {
            // Landing before this step cancels the push-off
            if self.state == LocomotionState::Knockback {
                self.wall_jump(body, normal);
            }
        }

        self.ground_normal = self.registry.ground_normal();
        self.wall_normal = self.registry.wall_normal();

        self.weapon.tick_cooldown(delta_time);
        for impact in self.projectiles.step(delta_time, &*body) {
            self.events.push(ControllerEvent::Impact(impact));
        }
        if self.input.fire_held && self.weapon.ready() {
            let pose = self.aim_pose(body.position());
            let report = self.weapon.fire(&pose, self.object, &*body, &mut self.projectiles);
            self.events.push(ControllerEvent::Fired(report));
        }

        let push = if self.state == LocomotionState::Wall {
            self.wall_direction()
        } else {
            self.move_direction()
        };
        let acceleration = self.state.profile(&self.params).acceleration;
        if push != Vec3::ZERO {
            body.add_force(push * acceleration, ForceMode::Acceleration);
        }

        self.evaluate_jump(body);

        let profile = self.state.profile(&self.params);
        let drag = drag_acceleration(
            body.linear_velocity(),
            self.ground_normal,
            profile.horizontal_drag,
            profile.vertical_drag,
        );
        body.add_force(drag, ForceMode::Acceleration);
        body.add_force(gravity_acceleration(profile.gravity), ForceMode::Acceleration);

        self.input.edges.clear();
    }

    fn evaluate_jump<B: PhysicsBody + ?Sized>(&mut self, body: &mut B) {
        let edges = self.input.edges;
        let velocity = body.linear_velocity();
        let jump_speed = self.params.jump_speed;

        match self.state {
            LocomotionState::Ground => {
                if edges.jumped && velocity.y <= jump_speed {
                    // Drag for the rest of this step uses the air frame
                    self.ground_normal = UP;
                    self.enter(LocomotionState::Air);
                    body.add_force(UP * (jump_speed - velocity.y), ForceMode::VelocityChange);
                    self.events.push(ControllerEvent::Jumped);
                }
            }
            LocomotionState::Air | LocomotionState::Knockback => {
                if self.wall_normal != Vec3::ZERO {
                    if edges.jumped {
                        self.enter(LocomotionState::Wall);
                        let boost = self.params.wall_boost_speed;
                        if velocity.y < boost {
                            body.add_force(UP * (boost - velocity.y), ForceMode::VelocityChange);
                        }
                    }
                } else if self.double_jump && edges.jumped && velocity.y <= jump_speed {
                    self.double_jump = false;
                    body.add_force(UP * (jump_speed - velocity.y), ForceMode::VelocityChange);
                    log::debug!("Double jump");
                    self.events.push(ControllerEvent::DoubleJumped);
                }
            }
            LocomotionState::Wall => {
                if edges.released_jump {
                    let normal = self.wall_normal;
                    self.wall_jump(body, normal);
                }
            }
        }
    }

    /// Push off a wall along `normal` and top vertical speed up to the jump speed
    fn wall_jump<B: PhysicsBody + ?Sized>(&mut self, body: &mut B, normal: Vec3) {
        self.enter(LocomotionState::Knockback);

        let n = normal.normalize_or_zero();
        if n != Vec3::ZERO {
            body.add_force(n * self.params.wall_jump_speed, ForceMode::VelocityChange);
        }
        let vertical = body.linear_velocity().y;
        if vertical < self.params.jump_speed {
            body.add_force(UP * (self.params.jump_speed - vertical), ForceMode::VelocityChange);
        }

        log::debug!("Wall jump along {:?}", n);
        self.events.push(ControllerEvent::WallJump { normal: n });
    }

    fn enter(&mut self, to: LocomotionState) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        if to == LocomotionState::Ground {
            self.double_jump = true;
            self.pending_wall_jump = None;
        }
        log::debug!("Locomotion {} -> {}", from, to);
        self.events.push(ControllerEvent::StateChanged { from, to });
    }

    // ==================== Contact-driven transitions ====================

    fn handle_contact_delta(&mut self, delta: RegistryDelta, wall_before: Vec3) {
        if delta.ground_gained() && self.state != LocomotionState::Ground {
            self.enter(LocomotionState::Ground);
        } else if delta.ground_lost() && self.state == LocomotionState::Ground {
            self.enter(LocomotionState::Air);
        }

        if self.state == LocomotionState::Wall && delta.wall_lost() {
            // No body here; the push-off happens at the start of the next step
            self.enter(LocomotionState::Knockback);
            self.pending_wall_jump = Some(wall_before);
        }
    }
}

impl ContactListener for MovementController {
    fn on_contact_begin(&mut self, object: ObjectId, contacts: &[ContactPoint]) {
        let wall_before = self.registry.wall_normal();
        let delta = self.registry.on_contact_begin(object, contacts);
        self.handle_contact_delta(delta, wall_before);
    }

    fn on_contact_persist(&mut self, object: ObjectId, contacts: &[ContactPoint]) {
        let wall_before = self.registry.wall_normal();
        let delta = self.registry.on_contact_persist(object, contacts);
        self.handle_contact_delta(delta, wall_before);
    }

    fn on_contact_end(&mut self, object: ObjectId) {
        let wall_before = self.registry.wall_normal();
        let delta = self.registry.on_contact_end(object);
        self.handle_contact_delta(delta, wall_before);
    }
}
