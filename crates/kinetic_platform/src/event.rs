//! Events delivered by the host loop

use std::time::Instant;

use crate::input::InputEvent;

/// Host events
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Input event (mouse, touch), stamped with the time it was received
    Input {
        event: InputEvent,
        at: Instant,
    },
    /// Frame tick - time to advance animations and deferred jobs
    ///
    /// Sent by the host once per display refresh while anything is active.
    Frame(Instant),
}

impl Event {
    /// Input event received now
    pub fn input(event: InputEvent) -> Self {
        Event::Input {
            event,
            at: Instant::now(),
        }
    }

    /// The time the event refers to
    pub fn time(&self) -> Instant {
        match self {
            Event::Input { at, .. } => *at,
            Event::Frame(at) => *at,
        }
    }
}
