//! Kinetic Animation System
//!
//! Keyframe sequences played as chains of linear pose steps.
//!
//! # Features
//!
//! - **Poses**: ordered style-property maps that interpolate per property
//! - **Characters**: per-node animation state, one active step at a time
//! - **Frame Driver**: advances active characters from the host's frame clock
//! - **Keyframe Sequencer**: percentage-keyed specs, completion callbacks and
//!   reversal back to the starting pose
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use kinetic_animation::{AnimationDriver, FrameDriver, KeyframeSequencer, KeyframeSpec, Pose};
//! use kinetic_core::{Document, Rect};
//!
//! let mut doc = Document::new();
//! let node = doc.create_root("box", Rect::new(0.0, 0.0, 10.0, 10.0));
//!
//! let mut driver = FrameDriver::new();
//! let mut sequencer = KeyframeSequencer::new();
//! let id = driver.add_character(node, Pose::new().with("left", 0.0));
//!
//! let spec = KeyframeSpec::from_json(
//!     r#"{"keyFrame": {"0": {"left": 0}, "100": {"left": 100}}, "duration": 200}"#,
//! ).unwrap();
//! let start = Instant::now();
//! sequencer.animate(&mut driver, id, spec, start, None).unwrap();
//!
//! sequencer.tick(&mut driver, start).unwrap();
//! let done = sequencer.tick(&mut driver, start + Duration::from_millis(200)).unwrap();
//! assert_eq!(done, vec![id]);
//! assert_eq!(driver.character(id).unwrap().current().get("left"), Some(100.0));
//! ```

pub mod character;
pub mod driver;
pub mod error;
pub mod keyframe;
pub mod pose;

pub use character::Character;
pub use driver::{AnimationDriver, CharacterId, FrameDriver};
pub use error::{AnimationError, Result};
pub use keyframe::{
    step_duration, CompletionCallback, KeyframeSequencer, KeyframeSpec, SequenceContext,
};
pub use pose::{Interpolate, Pose};
