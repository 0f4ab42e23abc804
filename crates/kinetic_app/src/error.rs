//! Error types for kinetic_app

use kinetic_animation::AnimationError;
use kinetic_core::{CoreError, StoreError};
use kinetic_gesture::GestureError;
use thiserror::Error;

/// Errors that can occur in a Kinetic application
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Gesture(#[from] GestureError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Config(format!("{:#}", err))
    }
}

/// Result type for kinetic_app operations
pub type Result<T> = std::result::Result<T, AppError>;
