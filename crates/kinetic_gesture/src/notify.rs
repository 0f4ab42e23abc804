//! Gesture bus notifications

use kinetic_core::Dispatcher;

use crate::synthetic::SyntheticEvent;

/// Notification names on the gesture bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Down,
    Over,
    Move,
    Out,
    Up,
}

impl GestureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::Down => "down",
            GestureKind::Over => "over",
            GestureKind::Move => "move",
            GestureKind::Out => "out",
            GestureKind::Up => "up",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification as delivered to bus listeners
#[derive(Clone, Debug, PartialEq)]
pub struct GestureNotification {
    pub kind: GestureKind,
    pub event: SyntheticEvent,
}

/// Receiver of gesture notifications
///
/// Fire-and-forget: the session never looks at what a sink does.
pub trait GestureSink {
    fn emit(&mut self, kind: GestureKind, event: &SyntheticEvent);
}

impl GestureSink for Dispatcher<GestureNotification> {
    fn emit(&mut self, kind: GestureKind, event: &SyntheticEvent) {
        self.dispatch(&GestureNotification {
            kind,
            event: event.clone(),
        });
    }
}

/// Collects notifications in order
impl GestureSink for Vec<(GestureKind, SyntheticEvent)> {
    fn emit(&mut self, kind: GestureKind, event: &SyntheticEvent) {
        self.push((kind, event.clone()));
    }
}
