//! Graph snapshots supplied by the schema/lineage backend.
//!
//! A snapshot is the only input the engine consumes. It is immutable: loading
//! a new graph means building a new [`Engine`](crate::Engine) from a new
//! snapshot.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::{Edge, Node, NodeId};

/// Flat node/edge list describing one database's dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Every object in the graph
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Directed dependencies between objects
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Cycles detected upstream, surfaced as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<Vec<NodeId>>>,
}

impl GraphSnapshot {
    /// Create a snapshot without cycle information.
    #[must_use]
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            cycles: None,
        }
    }

    /// Decode a snapshot from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Snapshot`](crate::Error::Snapshot) if the document is
    /// not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        debug!(
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Decoded graph snapshot"
        );
        Ok(snapshot)
    }

    /// Read and decode a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read and
    /// [`Error::Snapshot`](crate::Error::Snapshot) if it cannot be decoded.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
