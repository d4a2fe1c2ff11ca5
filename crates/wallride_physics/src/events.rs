//! Contact events and the listener contract

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque identity of a touched or hit object.
///
/// Only ever compared for equality. Holding one says nothing about whether
/// the object is still alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Identity used by colliders nobody asked to track
    pub const NONE: Self = Self(0);
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::NONE
    }
}

/// A single contact point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Contact point in world space
    pub point: Vec3,
    /// Surface normal, pointing out of the touched object
    pub normal: Vec3,
}

impl ContactPoint {
    /// Create a new contact point
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }
}

/// A contact phase change for one touched object
#[derive(Debug, Clone, PartialEq)]
pub enum ContactEvent {
    /// Started touching `object`
    Begin {
        object: ObjectId,
        contacts: Vec<ContactPoint>,
    },
    /// Still touching `object`; `contacts` is the current contact set
    Persist {
        object: ObjectId,
        contacts: Vec<ContactPoint>,
    },
    /// Stopped touching `object`
    End { object: ObjectId },
}

impl ContactEvent {
    /// The object this event is about
    pub fn object(&self) -> ObjectId {
        match self {
            Self::Begin { object, .. } | Self::Persist { object, .. } | Self::End { object } => {
                *object
            }
        }
    }

    /// Check if this is a begin event
    pub fn is_begin(&self) -> bool {
        matches!(self, Self::Begin { .. })
    }

    /// Check if this is an end event
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End { .. })
    }

    /// Forward the event to the matching listener callback
    pub fn dispatch<L: ContactListener + ?Sized>(&self, listener: &mut L) {
        match self {
            Self::Begin { object, contacts } => listener.on_contact_begin(*object, contacts),
            Self::Persist { object, contacts } => listener.on_contact_persist(*object, contacts),
            Self::End { object } => listener.on_contact_end(*object),
        }
    }
}

/// Receiver of contact callbacks.
///
/// Called strictly from the fixed-step phase, before the listener's own
/// fixed update in the same substep.
pub trait ContactListener {
    /// Started touching `object`
    fn on_contact_begin(&mut self, object: ObjectId, contacts: &[ContactPoint]);

    /// Still touching `object`, with its current contact set
    fn on_contact_persist(&mut self, object: ObjectId, contacts: &[ContactPoint]);

    /// Stopped touching `object`
    fn on_contact_end(&mut self, object: ObjectId);
}

/// Turns per-step contact snapshots into begin/persist/end events.
///
/// Objects touched this step are reported first, in snapshot order (begin
/// for new ones, persist for known ones), followed by an end for every
/// object that was touched last step and is missing now.
#[derive(Debug, Default, Clone)]
pub struct ContactTracker {
    touching: Vec<ObjectId>,
}

impl ContactTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects touched as of the last update, in first-seen order
    pub fn touching(&self) -> &[ObjectId] {
        &self.touching
    }

    /// Feed the contacts observed this step and get the resulting events.
    /// Snapshot entries with no contact points count as not touching.
    pub fn update(&mut self, snapshot: Vec<(ObjectId, Vec<ContactPoint>)>) -> Vec<ContactEvent> {
        let mut events = Vec::with_capacity(snapshot.len() + self.touching.len());
        let mut now_touching = Vec::with_capacity(snapshot.len());

        for (object, contacts) in snapshot {
            if contacts.is_empty() || now_touching.contains(&object) {
                continue;
            }
            now_touching.push(object);
            if self.touching.contains(&object) {
                events.push(ContactEvent::Persist { object, contacts });
            } else {
                events.push(ContactEvent::Begin { object, contacts });
            }
        }

        for object in &self.touching {
            if !now_touching.contains(object) {
                events.push(ContactEvent::End { object: *object });
            }
        }

        // Keep the order objects were first touched in.
        let mut ordered: Vec<ObjectId> = self
            .touching
            .iter()
            .copied()
            .filter(|o| now_touching.contains(o))
            .collect();
        for object in now_touching {
            if !ordered.contains(&object) {
                ordered.push(object);
            }
        }
        self.touching = ordered;

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up_contact() -> Vec<ContactPoint> {
        vec![ContactPoint::new(Vec3::ZERO, Vec3::Y)]
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl ContactListener for Recorder {
        fn on_contact_begin(&mut self, object: ObjectId, contacts: &[ContactPoint]) {
            self.log.push(format!("begin {} {}", object.0, contacts.len()));
        }

        fn on_contact_persist(&mut self, object: ObjectId, contacts: &[ContactPoint]) {
            self.log.push(format!("persist {} {}", object.0, contacts.len()));
        }

        fn on_contact_end(&mut self, object: ObjectId) {
            self.log.push(format!("end {}", object.0));
        }
    }

    #[test]
    fn test_begin_persist_end() {
        let mut tracker = ContactTracker::new();
        let a = ObjectId(7);

        let events = tracker.update(vec![(a, up_contact())]);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_begin());

        let events = tracker.update(vec![(a, up_contact())]);
        assert!(matches!(events[0], ContactEvent::Persist { object, .. } if object == a));

        let events = tracker.update(Vec::new());
        assert_eq!(events, vec![ContactEvent::End { object: a }]);
        assert!(tracker.touching().is_empty());
    }

    #[test]
    fn test_empty_contact_set_counts_as_separation() {
        let mut tracker = ContactTracker::new();
        let a = ObjectId(1);
        tracker.update(vec![(a, up_contact())]);

        let events = tracker.update(vec![(a, Vec::new())]);
        assert_eq!(events, vec![ContactEvent::End { object: a }]);
    }

    #[test]
    fn test_ends_follow_begins() {
        let mut tracker = ContactTracker::new();
        let wall = ObjectId(1);
        let floor = ObjectId(2);
        tracker.update(vec![(wall, up_contact())]);

        let events = tracker.update(vec![(floor, up_contact())]);
        assert!(events[0].is_begin());
        assert_eq!(events[0].object(), floor);
        assert!(events[1].is_end());
        assert_eq!(events[1].object(), wall);
    }

    #[test]
    fn test_touching_keeps_first_seen_order() {
        let mut tracker = ContactTracker::new();
        let a = ObjectId(1);
        let b = ObjectId(2);
        tracker.update(vec![(a, up_contact())]);
        tracker.update(vec![(b, up_contact()), (a, up_contact())]);
        assert_eq!(tracker.touching(), &[a, b]);
    }

    #[test]
    fn test_dispatch_routes_to_callbacks() {
        let mut recorder = Recorder::default();
        let object = ObjectId(3);
        ContactEvent::Begin {
            object,
            contacts: up_contact(),
        }
        .dispatch(&mut recorder);
        ContactEvent::Persist {
            object,
            contacts: Vec::new(),
        }
        .dispatch(&mut recorder);
        ContactEvent::End { object }.dispatch(&mut recorder);

        assert_eq!(recorder.log, vec!["begin 3 1", "persist 3 0", "end 3"]);
    }
}
