//! Animation error types

use thiserror::Error;

use crate::driver::CharacterId;

#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("unknown character {0:?}")]
    UnknownCharacter(CharacterId),

    #[error("invalid keyframe `{0}`: expected a percentage between 0 and 100")]
    InvalidKeyframe(String),

    #[error("keyframe duration must be a non-negative number of milliseconds, got {0}")]
    NegativeDuration(f32),

    #[error("malformed keyframe spec: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
