//! Shortest impact path between two nodes.
//!
//! The target is given as a free-form query and resolved in stages, first
//! match wins:
//!
//! 1. exact node id
//! 2. case-insensitive node id (must be unique)
//! 3. case-insensitive label (must be unique among visible nodes)
//! 4. case-insensitive label substring (must be unique among visible nodes)
//!
//! Zero matches and ambiguous matches are reported identically.
//!
//! Failures are checked in this order: unknown source, hidden source, target
//! unresolved, hidden target, hop bound. The target is resolved before the
//! visibility checks so that a query naming the source itself still yields
//! the zero-hop path, even for a hidden source.
//!
//! The search
//! itself is a hop-bounded BFS over enabled outgoing edges, so the returned
//! path is always a shortest one.
//!
//! Failing to find a path is an expected outcome, not an error: it is
//! reported as [`PathResult::NotFound`] with a [`PathFailure`] whose `Display`
//! is the user-facing reason.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use crate::config::{MAX_HOPS_LIMIT, MIN_HOPS_LIMIT};
use crate::filter::GraphView;
use crate::types::{EdgeType, NodeId, NodeRef};

/// A path from source to target, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactPath {
    /// Nodes from source to target
    pub path: Vec<NodeRef>,
    /// Edge type used for each hop; `edge_types.len() == hops`
    pub edge_types: Vec<EdgeType>,
    /// Number of edges on the path
    pub hops: usize,
    /// Nodes discovered by the search, source included
    pub visited_count: usize,
}

/// Why no path was returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFailure {
    /// The source id is not in the index
    SourceNotFound {
        /// Requested source id
        source: NodeId,
    },
    /// The source exists but the active filters hide it
    SourceHidden {
        /// Requested source id
        source: NodeId,
    },
    /// The target query matched no node, or more than one
    TargetUnresolved {
        /// Target query as given
        query: String,
    },
    /// The target resolved but the active filters hide it
    TargetHidden {
        /// Resolved target id
        target: NodeId,
    },
    /// No route exists within the hop bound
    NoPathWithin {
        /// Effective hop bound after clamping
        max_hops: usize,
    },
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound { source } => write!(f, "source node \"{source}\" not found"),
            Self::SourceHidden { source } => {
                write!(f, "source node \"{source}\" is hidden by the active filters")
            }
            Self::TargetUnresolved { query } => {
                write!(f, "target \"{query}\" not found or ambiguous")
            }
            Self::TargetHidden { target } => {
                write!(f, "target node \"{target}\" is hidden by the active filters")
            }
            Self::NoPathWithin { max_hops } => write!(f, "no path within {max_hops} hops"),
        }
    }
}

/// Outcome of a path search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    /// A shortest path was found
    Found(ImpactPath),
    /// No path; the failure explains why
    NotFound(PathFailure),
}

impl PathResult {
    /// Whether a path was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The path, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<&ImpactPath> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound(_) => None,
        }
    }

    /// The failure, if no path was found.
    #[must_use]
    pub fn failure(&self) -> Option<&PathFailure> {
        match self {
            Self::Found(_) => None,
            Self::NotFound(failure) => Some(failure),
        }
    }

    /// Human-readable failure reason.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.failure().map(ToString::to_string)
    }
}

#[derive(Serialize)]
struct PathResultRepr<'a> {
    found: bool,
    #[serde(flatten)]
    path: Option<&'a ImpactPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Serialize for PathResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PathResultRepr {
            found: self.is_found(),
            path: self.path(),
            reason: self.reason(),
        }
        .serialize(serializer)
    }
}

/// How a target query resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetResolution {
    Resolved(NodeIndex),
    NotFound,
    Ambiguous(usize),
}

/// Resolve a free-form target query to a single node.
fn resolve_target(view: &GraphView<'_>, query: &str) -> TargetResolution {
    let index = view.index();

    if let Some(node) = index.lookup(query) {
        return TargetResolution::Resolved(node);
    }

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return TargetResolution::NotFound;
    }

    let by_id: Vec<NodeIndex> = index
        .node_indices()
        .filter(|node| index.node(*node).id.as_str().to_lowercase() == needle)
        .collect();
    match by_id.as_slice() {
        [single] => return TargetResolution::Resolved(*single),
        [] => {}
        _ => return TargetResolution::Ambiguous(by_id.len()),
    }

    let labels: Vec<(NodeIndex, String)> = view
        .visible_nodes()
        .map(|node| (node, view.node(node).display_label().to_lowercase()))
        .collect();

    let exact: Vec<NodeIndex> = labels
        .iter()
        .filter(|(_, label)| *label == needle)
        .map(|(node, _)| *node)
        .collect();
    match exact.as_slice() {
        [single] => return TargetResolution::Resolved(*single),
        [] => {}
        _ => return TargetResolution::Ambiguous(exact.len()),
    }

    let partial: Vec<NodeIndex> = labels
        .iter()
        .filter(|(_, label)| label.contains(&needle))
        .map(|(node, _)| *node)
        .collect();
    match partial.as_slice() {
        [single] => TargetResolution::Resolved(*single),
        [] => TargetResolution::NotFound,
        _ => TargetResolution::Ambiguous(partial.len()),
    }
}

/// Find a shortest path from `source_id` to the node matching `target_query`.
///
/// `max_hops` is clamped to `1..=20`.
#[must_use]
pub fn find_path(
    view: &GraphView<'_>,
    source_id: &str,
    target_query: &str,
    max_hops: usize,
) -> PathResult {
    let max_hops = max_hops.clamp(MIN_HOPS_LIMIT, MAX_HOPS_LIMIT);

    let Some(source) = view.index().lookup(source_id) else {
        return PathResult::NotFound(PathFailure::SourceNotFound {
            source: NodeId::new(source_id),
        });
    };

    let source_hidden = || {
        PathResult::NotFound(PathFailure::SourceHidden {
            source: view.node(source).id.clone(),
        })
    };
    let unresolved = || {
        if !view.is_node_visible(source) {
            return source_hidden();
        }
        PathResult::NotFound(PathFailure::TargetUnresolved {
            query: target_query.to_string(),
        })
    };
    let target = match resolve_target(view, target_query) {
        TargetResolution::Resolved(target) => target,
        TargetResolution::Ambiguous(candidates) => {
            debug!(query = target_query, candidates, "Target query is ambiguous");
            return unresolved();
        }
        TargetResolution::NotFound => {
            debug!(query = target_query, "Target query matched no node");
            return unresolved();
        }
    };

    if source == target {
        return PathResult::Found(ImpactPath {
            path: vec![view.node(source).to_ref()],
            edge_types: Vec::new(),
            hops: 0,
            visited_count: 1,
        });
    }

    if !view.is_node_visible(source) {
        return source_hidden();
    }
    if !view.is_node_visible(target) {
        return PathResult::NotFound(PathFailure::TargetHidden {
            target: view.node(target).id.clone(),
        });
    }

    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeType)> = HashMap::new();
    let mut visited = HashSet::from([source]);
    let mut queue = VecDeque::from([(source, 0_usize)]);

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_hops {
            continue;
        }
        for adj in view.enabled_edges(current, Direction::Outgoing) {
            if !visited.insert(adj.neighbor) {
                continue;
            }
            predecessors.insert(adj.neighbor, (current, adj.edge_type));
            if adj.neighbor == target {
                let path = reconstruct(view, &predecessors, source, target, visited.len());
                debug!(
                    source = source_id,
                    target = %view.node(target).id,
                    hops = path.hops,
                    visited = path.visited_count,
                    "Found impact path"
                );
                return PathResult::Found(path);
            }
            queue.push_back((adj.neighbor, depth + 1));
        }
    }

    debug!(
        source = source_id,
        target = %view.node(target).id,
        max_hops,
        visited = visited.len(),
        "No impact path within hop bound"
    );
    PathResult::NotFound(PathFailure::NoPathWithin { max_hops })
}

fn reconstruct(
    view: &GraphView<'_>,
    predecessors: &HashMap<NodeIndex, (NodeIndex, EdgeType)>,
    source: NodeIndex,
    target: NodeIndex,
    visited_count: usize,
) -> ImpactPath {
    let mut nodes = vec![target];
    let mut edge_types = Vec::new();
    let mut current = target;

    while current != source {
        let Some(&(previous, edge_type)) = predecessors.get(&current) else {
            break;
        };
        nodes.push(previous);
        edge_types.push(edge_type);
        current = previous;
    }

    nodes.reverse();
    edge_types.reverse();

    ImpactPath {
        path: nodes.into_iter().map(|node| view.node(node).to_ref()).collect(),
        hops: edge_types.len(),
        edge_types,
        visited_count,
    }
}
