//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`
pub fn init_tracing() -> Result<()> {
    init_tracing_with("info")
}

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_directive`
/// when it is unset
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing_with(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
