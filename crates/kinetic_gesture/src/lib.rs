//! Kinetic Gestures
//!
//! Turns raw touch batches and mouse events into one stream of synthetic
//! pointer notifications (`down`, `over`, `move`, `out`, `up`) on a shared
//! gesture bus.
//!
//! # Architecture
//!
//! ```text
//! Platform Input (touch batch, mouse event)
//!     ↓
//! GestureSession (MouseMode / TouchMode, tracked finger, last over)
//!     ↓  TargetResolver (native / screen-coordinate / traversal)
//! SyntheticEvent
//!     ↓
//! GestureSink (dispatch bus)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use kinetic_core::{Document, Rect};
//! use kinetic_gesture::{GestureConfig, GestureKind, GestureSession, SyntheticEvent};
//! use kinetic_platform::{InputEvent, PlatformProfile, TouchBatch, TouchPhase, TouchPoint};
//!
//! let mut doc = Document::new();
//! let body = doc.create_root("body", Rect::new(0.0, 0.0, 320.0, 480.0));
//!
//! let mut session = GestureSession::new(GestureConfig::default(), &PlatformProfile::desktop());
//! let mut seen: Vec<(GestureKind, SyntheticEvent)> = Vec::new();
//!
//! let start = InputEvent::Touch(TouchBatch::new(TouchPhase::Start, [TouchPoint::new(1, 10.0, 10.0)]));
//! session.handle(&start, Instant::now(), &doc, &mut seen).unwrap();
//!
//! let kinds: Vec<_> = seen.iter().map(|(kind, _)| *kind).collect();
//! assert_eq!(kinds, vec![GestureKind::Down, GestureKind::Over]);
//! assert_eq!(seen[0].1.target, Some(body));
//! ```

pub mod error;
pub mod notify;
pub mod session;
pub mod synthetic;
pub mod target;

pub use error::{GestureError, Result};
pub use notify::{GestureKind, GestureNotification, GestureSink};
pub use session::{EventResponse, GestureConfig, GestureSession, GestureState, InputMode};
pub use synthetic::{PointerId, SourceEvent, SyntheticEvent};
pub use target::{find_target_traverse, TargetResolver, TargetStrategy};
