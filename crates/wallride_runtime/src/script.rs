//! Scripted input for the demo run

use glam::Vec2;
use wallride_controller::{InputEvent, InputSender};

/// Input events keyed by the frame they are sent on
pub struct InputScript {
    events: Vec<(u32, InputEvent)>,
    next: usize,
}

impl InputScript {
    /// Run forward, jump while drifting toward the wall, ride it, push off,
    /// land and fire at the target
    pub fn demo() -> Self {
        Self::new(vec![
            (0, InputEvent::Move(Vec2::new(0.0, 1.0))),
            (60, InputEvent::Move(Vec2::new(1.0, 1.0))),
            (70, InputEvent::Jump(true)),
            (76, InputEvent::Jump(false)),
            (95, InputEvent::Jump(true)),
            (160, InputEvent::Jump(false)),
            (200, InputEvent::Move(Vec2::ZERO)),
            (260, InputEvent::Look(Vec2::new(0.0, -10.0))),
            (270, InputEvent::Fire(true)),
            (330, InputEvent::Fire(false)),
            (360, InputEvent::Look(Vec2::new(0.0, 10.0))),
        ])
    }

    pub fn new(mut events: Vec<(u32, InputEvent)>) -> Self {
        events.sort_by_key(|(frame, _)| *frame);
        Self { events, next: 0 }
    }

    /// Send everything due at `frame`. Returns how many events were sent.
    pub fn feed(&mut self, frame: u32, sender: &InputSender) -> usize {
        let mut sent = 0;
        while let Some((at, event)) = self.events.get(self.next) {
            if *at > frame {
                break;
            }
            if sender.send(*event) {
                sent += 1;
            }
            self.next += 1;
        }
        sent
    }

    /// Check if every event was sent
    pub fn finished(&self) -> bool {
        self.next >= self.events.len()
    }
}
