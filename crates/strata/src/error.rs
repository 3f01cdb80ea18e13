//! Error types for Strata operations.
//!
//! Most engine operations never fail: the blast radius degrades to an empty
//! result for unknown nodes and the path finder reports failures as a
//! [`PathFailure`](crate::PathFailure) value. `Error` is reserved for the cases
//! where the caller handed us something invalid:
//!
//! - asking for the lineage or selection detail of a node that does not exist
//! - a snapshot or configuration file that cannot be read or parsed
//! - configuration values outside their documented bounds

use thiserror::Error;

use crate::types::NodeId;

/// Result type for Strata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Strata operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested node id is not present in the graph index
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph snapshot could not be decoded
    #[error("invalid graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}
