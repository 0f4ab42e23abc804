//! Kinetic Application Framework
//!
//! Wires the gesture layer, the keyframe sequencer and flux stores into a
//! single [`App`] driven by the host loop.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use kinetic_app::prelude::*;
//!
//! let config = AppConfig::from_toml_str("[gesture]\nreset_delay_ms = 100").unwrap();
//! let mut app = App::with_config(config);
//! let body = app
//!     .document_mut()
//!     .create_root("body", Rect::new(0.0, 0.0, 320.0, 480.0));
//!
//! let start = Event::Input {
//!     event: InputEvent::Touch(TouchBatch::new(
//!         TouchPhase::Start,
//!         [TouchPoint::new(0, 10.0, 10.0)],
//!     )),
//!     at: Instant::now(),
//! };
//! app.handle_event(&start).unwrap();
//! assert_eq!(app.gestures().mode(), InputMode::Touch);
//! assert_eq!(app.gestures().state().last_over.as_ref().unwrap().target, Some(body));
//! ```

mod app;
mod config;
mod error;
pub mod logging;

#[cfg(test)]
mod tests;

pub use app::App;
pub use config::{AnimationConfig, AppConfig, StoreConfig};
pub use error::{AppError, Result};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::{AnimationConfig, AppConfig, StoreConfig};
    pub use crate::error::{AppError, Result};
    pub use crate::logging::init_tracing;

    // Core types
    pub use kinetic_core::{Document, FluxStore, NodeId, Point, Rect, Source, StoreError};

    // Input
    pub use kinetic_platform::{
        Event, InputEvent, MouseButton, MouseEvent, PlatformProfile, TouchBatch, TouchPhase,
        TouchPoint,
    };

    // Gestures
    pub use kinetic_gesture::{
        EventResponse, GestureConfig, GestureKind, GestureNotification, InputMode, SyntheticEvent,
    };

    // Animation
    pub use kinetic_animation::{
        CharacterId, CompletionCallback, KeyframeSpec, Pose, SequenceContext,
    };
}
