//! Kinetic Platform Layer
//!
//! Raw input as delivered by the host: touch batches (one per native touch
//! callback), mouse events, and frame ticks. Also describes the quirks of the
//! platform the application runs on, so point resolution can pick a strategy
//! once at startup.
//!
//! # Example
//!
//! ```rust
//! use kinetic_platform::*;
//!
//! let batch = TouchBatch::new(TouchPhase::Start, [TouchPoint::new(7, 120.0, 48.0)]);
//! assert_eq!(batch.primary().unwrap().identifier, 7);
//!
//! let empty = TouchBatch::new(TouchPhase::Move, Vec::new());
//! assert!(matches!(empty.primary(), Err(InputError::Malformed(_))));
//! ```

mod error;
mod event;
mod input;
mod platform;

// Re-export all public types
pub use error::{InputError, Result};
pub use event::Event;
pub use input::{InputEvent, MouseButton, MouseEvent, TouchBatch, TouchPhase, TouchPoint};
pub use platform::PlatformProfile;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{InputError, Result};
    pub use crate::event::Event;
    pub use crate::input::{
        InputEvent, MouseButton, MouseEvent, TouchBatch, TouchPhase, TouchPoint,
    };
    pub use crate::platform::PlatformProfile;
}
