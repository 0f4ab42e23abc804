//! Core error types

use thiserror::Error;

use crate::dom::NodeId;
use crate::store::StoreId;

/// Errors raised by the node tree and dispatch primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The node handle does not belong to the tree (or was invalidated)
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
}

/// Errors raised by the flux store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The data source failed to produce a payload
    #[error("Source fetch failed: {0}")]
    Source(String),

    /// The store id is not registered with the dispatcher
    #[error("Store not registered: {0:?}")]
    NotRegistered(StoreId),

    /// The payload could not be decoded
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result type for node tree operations
pub type Result<T> = std::result::Result<T, CoreError>;
