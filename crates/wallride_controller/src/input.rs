//! Player input queue
//!
//! Any thread can push [`InputEvent`]s through an [`InputSender`]. The fixed
//! step drains the matching [`InputQueue`] into an [`InputState`], which
//! latches jump edges until the end of that step.

use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single player input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Movement stick/keys; x is strafe, y is forward
    Move(Vec2),
    /// Pointer delta
    Look(Vec2),
    /// Fire button held or released
    Fire(bool),
    /// Jump pressed (`true`) or released (`false`)
    Jump(bool),
}

/// Create a connected sender/queue pair
pub fn input_channel() -> (InputSender, InputQueue) {
    let (sender, receiver) = unbounded();
    (InputSender { sender }, InputQueue { receiver })
}

/// Producer side of the input queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns false once the session is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Input dropped, session closed: {:?}", event);
                false
            }
            Err(TrySendError::Full(_)) => false,
        }
    }
}

/// Consumer side of the input queue
#[derive(Debug)]
pub struct InputQueue {
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    /// Take every queued event without blocking
    pub fn drain(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.receiver.try_iter()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Jump edges latched since the last fixed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEdges {
    pub jumped: bool,
    pub released_jump: bool,
}

impl InputEdges {
    /// Reset both edges
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Level and edge input as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub move_input: Vec2,
    pub fire_held: bool,
    pub edges: InputEdges,
}

impl InputState {
    /// Fold one event in. Look deltas are returned for the caller to apply.
    pub fn apply(&mut self, event: InputEvent) -> Option<Vec2> {
        match event {
            InputEvent::Move(v) => self.move_input = v,
            InputEvent::Fire(held) => self.fire_held = held,
            InputEvent::Jump(true) => self.edges.jumped = true,
            InputEvent::Jump(false) => self.edges.released_jump = true,
            InputEvent::Look(delta) => return Some(delta),
        }
        None
    }
}
