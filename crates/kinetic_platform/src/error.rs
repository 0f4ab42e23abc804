//! Input error types

use thiserror::Error;

/// Raw input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The event is missing a field the gesture layer needs
    #[error("Malformed input event: {0}")]
    Malformed(&'static str),
}

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;
