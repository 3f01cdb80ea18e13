//! Graph index over a lineage snapshot.
//!
//! The index is built once per graph load and never patched afterwards. It
//! keeps the nodes and edges in a petgraph `DiGraph` (so edges get stable
//! indices the visibility overlay can flag) and materializes four adjacency
//! views per node:
//!
//! | View | Contents | Order |
//! |------|----------|-------|
//! | typed outgoing | `(target, edge type)` per edge | edge insertion order |
//! | typed incoming | `(source, edge type)` per edge | edge insertion order |
//! | untyped downstream | distinct targets | first seen |
//! | untyped upstream | distinct sources | first seen |
//!
//! Edges whose endpoints were never registered as nodes are dropped rather
//! than failing the build. Dropped edges are counted in [`BuildStats`].

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{Edge, EdgeType, Node};

/// One entry of a typed adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    /// Index of the edge in the graph
    pub edge: EdgeIndex,
    /// The node on the other end of the edge
    pub neighbor: NodeIndex,
    /// Relationship carried by the edge
    pub edge_type: EdgeType,
}

/// Counters collected while building the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    /// Nodes registered
    pub nodes: usize,
    /// Edges indexed
    pub edges: usize,
    /// Edges dropped because an endpoint was not a registered node
    pub dropped_edges: usize,
    /// Nodes ignored because their id was already registered
    pub duplicate_nodes: usize,
}

/// Read-only adjacency index over one graph snapshot.
#[derive(Debug, Clone)]
pub struct GraphIndex {
    graph: DiGraph<Node, EdgeType>,
    node_map: HashMap<String, NodeIndex>,
    outgoing: Vec<Vec<Adjacent>>,
    incoming: Vec<Vec<Adjacent>>,
    downstream: Vec<Vec<NodeIndex>>,
    upstream: Vec<Vec<NodeIndex>>,
    stats: BuildStats,
}

impl GraphIndex {
    /// Build the index from a flat node/edge list in O(|V| + |E|).
    pub fn build<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();
        let mut stats = BuildStats::default();

        for node in nodes {
            if node_map.contains_key(node.id.as_str()) {
                debug!(id = %node.id, "Ignoring duplicate node id");
                stats.duplicate_nodes += 1;
                continue;
            }
            let key = node.id.as_str().to_string();
            let index = graph.add_node(node);
            node_map.insert(key, index);
        }

        let node_count = graph.node_count();
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        let mut downstream = vec![Vec::new(); node_count];
        let mut upstream = vec![Vec::new(); node_count];
        let mut seen_pairs: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();

        for edge in edges {
            let (Some(&source), Some(&target)) = (
                node_map.get(edge.source.as_str()),
                node_map.get(edge.target.as_str()),
            ) else {
                debug!(
                    source = %edge.source,
                    target = %edge.target,
                    "Dropping edge with unregistered endpoint"
                );
                stats.dropped_edges += 1;
                continue;
            };

            let edge_index = graph.add_edge(source, target, edge.edge_type);
            outgoing[source.index()].push(Adjacent {
                edge: edge_index,
                neighbor: target,
                edge_type: edge.edge_type,
            });
            incoming[target.index()].push(Adjacent {
                edge: edge_index,
                neighbor: source,
                edge_type: edge.edge_type,
            });
            if seen_pairs.insert((source, target)) {
                downstream[source.index()].push(target);
                upstream[target.index()].push(source);
            }
        }

        stats.nodes = graph.node_count();
        stats.edges = graph.edge_count();

        if stats.dropped_edges > 0 {
            warn!(
                dropped = stats.dropped_edges,
                "Snapshot contains edges referencing unknown nodes"
            );
        }
        debug!(
            nodes = stats.nodes,
            edges = stats.edges,
            duplicate_nodes = stats.duplicate_nodes,
            "Built graph index"
        );

        Self {
            graph,
            node_map,
            outgoing,
            incoming,
            downstream,
            upstream,
            stats,
        }
    }

    /// Counters collected during the build.
    #[must_use]
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Look up the graph index of a node id.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// The node stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this graph index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.lookup(id).map(|index| &self.graph[index])
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of indexed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node indices in registration order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All edge indices in insertion order.
    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Type of the edge at `index`, `None` if it is not part of this graph.
    #[must_use]
    pub fn edge_type(&self, index: EdgeIndex) -> Option<EdgeType> {
        self.graph.edge_weight(index).copied()
    }

    /// Typed adjacency list of a node in the given direction.
    ///
    /// `Outgoing` yields `(target, type)` entries, `Incoming` yields
    /// `(source, type)` entries.
    #[must_use]
    pub fn edges(&self, index: NodeIndex, direction: Direction) -> &[Adjacent] {
        let lists = match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        lists.get(index.index()).map_or(&[], Vec::as_slice)
    }

    /// Distinct neighbors of a node in the given direction.
    #[must_use]
    pub fn neighbors(&self, index: NodeIndex, direction: Direction) -> &[NodeIndex] {
        let lists = match direction {
            Direction::Outgoing => &self.downstream,
            Direction::Incoming => &self.upstream,
        };
        lists.get(index.index()).map_or(&[], Vec::as_slice)
    }

    /// Number of edges touching a node, in either direction.
    #[must_use]
    pub fn degree(&self, index: NodeIndex) -> usize {
        self.edges(index, Direction::Outgoing).len() + self.edges(index, Direction::Incoming).len()
    }
}
