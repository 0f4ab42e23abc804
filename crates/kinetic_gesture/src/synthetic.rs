//! Synthetic pointer events
//!
//! Every notification on the gesture bus carries a [`SyntheticEvent`], no
//! matter whether a finger or the mouse produced it. Touch events always
//! report the primary button (`which == 1`).

use std::rc::Rc;

use kinetic_core::{NodeId, Point};
use kinetic_platform::{MouseEvent, TouchBatch, TouchPoint};

/// Which pointer produced an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// The raw event a synthetic event was built from
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    Touch(Rc<TouchBatch>),
    Mouse(MouseEvent),
}

/// A normalized pointer event
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticEvent {
    pub pointer: PointerId,
    pub client: Point,
    pub screen: Point,
    /// Topmost element under the pointer
    pub target: Option<NodeId>,
    /// For `over`, the element left; for `out`, the element entered
    pub related_target: Option<NodeId>,
    /// Pressed-button flag, DOM `which` numbering
    pub which: u8,
    pub src: SourceEvent,
}

impl SyntheticEvent {
    /// Build from one touch point of a batch
    pub fn from_touch(point: &TouchPoint, batch: Rc<TouchBatch>, target: Option<NodeId>) -> Self {
        Self {
            pointer: PointerId::Touch(point.identifier),
            client: point.client(),
            screen: point.screen(),
            target,
            related_target: None,
            which: 1,
            src: SourceEvent::Touch(batch),
        }
    }

    /// Build from a mouse event at `position`
    pub fn from_mouse(event: &MouseEvent, position: Point, target: Option<NodeId>) -> Self {
        Self {
            pointer: PointerId::Mouse,
            client: position,
            screen: position,
            target,
            related_target: None,
            which: event.button().map_or(0, |b| b.which()),
            src: SourceEvent::Mouse(event.clone()),
        }
    }

    /// Touch identifier, if a finger produced the event
    pub fn identifier(&self) -> Option<u64> {
        match self.pointer {
            PointerId::Touch(id) => Some(id),
            PointerId::Mouse => None,
        }
    }
}
