//! Input event types for mouse and touch

use kinetic_core::Point;
use smallvec::SmallVec;

use crate::error::{InputError, Result};

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Touch event (mobile/touchscreen)
    Touch(TouchBatch),
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events
#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved {
        /// X position in client coordinates
        x: f32,
        /// Y position in client coordinates
        y: f32,
    },
    /// Mouse button pressed
    ButtonPressed {
        /// Which button was pressed
        button: MouseButton,
        /// X position when pressed
        x: f32,
        /// Y position when pressed
        y: f32,
    },
    /// Mouse button released
    ButtonReleased {
        /// Which button was released
        button: MouseButton,
        /// X position when released
        x: f32,
        /// Y position when released
        y: f32,
    },
    /// Mouse left the window
    Left,
}

impl MouseEvent {
    /// Get the position (returns None for Left)
    pub fn position(&self) -> Option<Point> {
        match self {
            MouseEvent::Moved { x, y } => Some(Point::new(*x, *y)),
            MouseEvent::ButtonPressed { x, y, .. } => Some(Point::new(*x, *y)),
            MouseEvent::ButtonReleased { x, y, .. } => Some(Point::new(*x, *y)),
            MouseEvent::Left => None,
        }
    }

    /// The button involved, if any
    pub fn button(&self) -> Option<MouseButton> {
        match self {
            MouseEvent::ButtonPressed { button, .. } => Some(*button),
            MouseEvent::ButtonReleased { button, .. } => Some(*button),
            _ => None,
        }
    }
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Other button with index
    Other(u16),
}

impl MouseButton {
    /// DOM-style `which` value: 1 left, 2 middle, 3 right
    pub fn which(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::Other(n) => u8::try_from(n.saturating_add(1)).unwrap_or(u8::MAX),
        }
    }
}

// ============================================================================
// Touch Events
// ============================================================================

/// Phase of a native touch callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// One or more fingers touched down
    Start,
    /// One or more fingers moved
    Move,
    /// One or more fingers lifted
    End,
    /// The system took over the touches (e.g. an OS gesture)
    Cancel,
}

/// A single touch point within a batch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Stable identifier of the finger for the lifetime of the touch
    pub identifier: u64,
    /// X position in client (viewport) coordinates
    pub client_x: f32,
    /// Y position in client (viewport) coordinates
    pub client_y: f32,
    /// X position in screen coordinates
    pub screen_x: f32,
    /// Y position in screen coordinates
    pub screen_y: f32,
}

impl TouchPoint {
    /// A touch whose screen coordinates equal its client coordinates
    pub fn new(identifier: u64, client_x: f32, client_y: f32) -> Self {
        Self {
            identifier,
            client_x,
            client_y,
            screen_x: client_x,
            screen_y: client_y,
        }
    }

    /// Override the screen coordinates
    pub fn with_screen(mut self, screen_x: f32, screen_y: f32) -> Self {
        self.screen_x = screen_x;
        self.screen_y = screen_y;
        self
    }

    pub fn client(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }

    pub fn screen(&self) -> Point {
        Point::new(self.screen_x, self.screen_y)
    }
}

/// One native touch callback: its phase and the touches that changed
#[derive(Clone, Debug, PartialEq)]
pub struct TouchBatch {
    pub phase: TouchPhase,
    pub changed_touches: SmallVec<[TouchPoint; 4]>,
}

impl TouchBatch {
    pub fn new(phase: TouchPhase, touches: impl IntoIterator<Item = TouchPoint>) -> Self {
        Self {
            phase,
            changed_touches: touches.into_iter().collect(),
        }
    }

    /// The first changed touch, which drives the synthetic event
    pub fn primary(&self) -> Result<&TouchPoint> {
        self.changed_touches
            .first()
            .ok_or(InputError::Malformed("touch event has no changed touches"))
    }

    /// Number of touches that changed in this callback
    pub fn changed_count(&self) -> usize {
        self.changed_touches.len()
    }
}
