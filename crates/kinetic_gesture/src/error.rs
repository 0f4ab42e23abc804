//! Gesture error types

use kinetic_platform::InputError;
use thiserror::Error;

/// Errors raised while normalizing input
///
/// All of them are recoverable: the offending event is skipped and the
/// session stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// The raw event is missing data the gesture layer needs
    #[error(transparent)]
    Malformed(#[from] InputError),
}

/// Result type for gesture operations
pub type Result<T> = std::result::Result<T, GestureError>;
