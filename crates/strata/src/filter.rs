//! Edge type filtering and the visibility overlay it produces.
//!
//! The filter tracks which filterable edge types are switched on. Every
//! change is followed by a full [`EdgeTypeFilter::recompute`]; overlays are
//! never patched in place.
//!
//! ## Cascade rule
//!
//! - An edge is hidden iff its type is filterable and not active.
//! - A node with at least one incident edge is hidden iff *all* of its
//!   incident edges are hidden.
//! - A node with no incident edges is never hidden.

use std::collections::BTreeSet;

use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::debug;

use crate::graph::{Adjacent, GraphIndex};
use crate::types::{EdgeType, Node};

/// Set of filterable edge types currently switched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTypeFilter {
    active: BTreeSet<EdgeType>,
}

impl Default for EdgeTypeFilter {
    fn default() -> Self {
        Self {
            active: EdgeType::FILTERABLE.into_iter().collect(),
        }
    }
}

impl EdgeTypeFilter {
    /// Filter with every filterable type enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set. Non-filterable types are ignored.
    pub fn set_active<I>(&mut self, types: I)
    where
        I: IntoIterator<Item = EdgeType>,
    {
        self.active = types
            .into_iter()
            .filter(|edge_type| {
                let keep = edge_type.is_filterable();
                if !keep {
                    debug!(%edge_type, "Ignoring non-filterable edge type");
                }
                keep
            })
            .collect();
    }

    /// Flip one filterable type on or off.
    ///
    /// Returns `false` (and changes nothing) for non-filterable types.
    pub fn toggle(&mut self, edge_type: EdgeType) -> bool {
        if !edge_type.is_filterable() {
            return false;
        }
        if !self.active.remove(&edge_type) {
            self.active.insert(edge_type);
        }
        true
    }

    /// Whether a filterable type is currently switched on.
    #[must_use]
    pub fn is_active(&self, edge_type: EdgeType) -> bool {
        self.active.contains(&edge_type)
    }

    /// Whether edges of this type are shown under the current filter.
    #[must_use]
    pub fn is_edge_enabled(&self, edge_type: EdgeType) -> bool {
        !edge_type.is_filterable() || self.active.contains(&edge_type)
    }

    /// Active filterable types, in canonical order.
    #[must_use]
    pub fn active_types(&self) -> Vec<EdgeType> {
        self.active.iter().copied().collect()
    }

    /// Filterable types currently switched off, in canonical order.
    #[must_use]
    pub fn disabled_types(&self) -> Vec<EdgeType> {
        EdgeType::FILTERABLE
            .into_iter()
            .filter(|edge_type| !self.active.contains(edge_type))
            .collect()
    }

    /// Derive the visibility overlay for `index` from scratch.
    #[must_use]
    pub fn recompute(&self, index: &GraphIndex) -> VisibilityOverlay {
        let hidden_edges: Vec<bool> = index
            .edge_indices()
            .map(|edge| {
                index
                    .edge_type(edge)
                    .is_some_and(|edge_type| !self.is_edge_enabled(edge_type))
            })
            .collect();

        let hidden_nodes: Vec<bool> = index
            .node_indices()
            .map(|node| {
                let mut incident = index
                    .edges(node, Direction::Outgoing)
                    .iter()
                    .chain(index.edges(node, Direction::Incoming))
                    .peekable();
                incident.peek().is_some()
                    && incident.all(|adj| hidden_edges[adj.edge.index()])
            })
            .collect();

        let overlay = VisibilityOverlay::new(hidden_edges, hidden_nodes);
        debug!(
            active = ?self.active_types(),
            hidden_edges = overlay.hidden_edge_count(),
            hidden_nodes = overlay.hidden_node_count(),
            "Recomputed visibility overlay"
        );
        overlay
    }
}

/// Hidden/visible flags for every node and edge of one graph index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityOverlay {
    hidden_edges: Vec<bool>,
    hidden_nodes: Vec<bool>,
    hidden_edge_count: usize,
    hidden_node_count: usize,
}

impl VisibilityOverlay {
    fn new(hidden_edges: Vec<bool>, hidden_nodes: Vec<bool>) -> Self {
        let hidden_edge_count = hidden_edges.iter().filter(|hidden| **hidden).count();
        let hidden_node_count = hidden_nodes.iter().filter(|hidden| **hidden).count();
        Self {
            hidden_edges,
            hidden_nodes,
            hidden_edge_count,
            hidden_node_count,
        }
    }

    /// Whether the edge is hidden by the active filters.
    #[must_use]
    pub fn is_edge_hidden(&self, edge: EdgeIndex) -> bool {
        self.hidden_edges.get(edge.index()).copied().unwrap_or(false)
    }

    /// Whether the node is hidden by the active filters.
    #[must_use]
    pub fn is_node_hidden(&self, node: NodeIndex) -> bool {
        self.hidden_nodes.get(node.index()).copied().unwrap_or(false)
    }

    /// Number of hidden edges.
    #[must_use]
    pub fn hidden_edge_count(&self) -> usize {
        self.hidden_edge_count
    }

    /// Number of hidden nodes.
    #[must_use]
    pub fn hidden_node_count(&self) -> usize {
        self.hidden_node_count
    }

    /// Number of visible edges.
    #[must_use]
    pub fn visible_edge_count(&self) -> usize {
        self.hidden_edges.len() - self.hidden_edge_count
    }

    /// Number of visible nodes.
    #[must_use]
    pub fn visible_node_count(&self) -> usize {
        self.hidden_nodes.len() - self.hidden_node_count
    }
}

/// A graph index seen through a visibility overlay.
///
/// Lineage, blast radius, path finding, search and the catalog all read the
/// graph through a view.
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    index: &'a GraphIndex,
    overlay: &'a VisibilityOverlay,
}

impl<'a> GraphView<'a> {
    /// Pair an index with an overlay computed for it.
    #[must_use]
    pub fn new(index: &'a GraphIndex, overlay: &'a VisibilityOverlay) -> Self {
        Self { index, overlay }
    }

    /// The underlying index, ignoring visibility.
    #[must_use]
    pub fn index(&self) -> &'a GraphIndex {
        self.index
    }

    /// The node stored at `node`.
    #[must_use]
    pub fn node(&self, node: NodeIndex) -> &'a Node {
        self.index.node(node)
    }

    /// Whether the node survives the active filters.
    #[must_use]
    pub fn is_node_visible(&self, node: NodeIndex) -> bool {
        !self.overlay.is_node_hidden(node)
    }

    /// Edges of `node` in `direction` whose type is currently enabled.
    pub fn enabled_edges(
        &self,
        node: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = &'a Adjacent> + 'a {
        let overlay = self.overlay;
        self.index
            .edges(node, direction)
            .iter()
            .filter(move |adj| !overlay.is_edge_hidden(adj.edge))
    }

    /// Number of enabled edges of `node` in `direction`.
    #[must_use]
    pub fn enabled_degree(&self, node: NodeIndex, direction: Direction) -> usize {
        self.enabled_edges(node, direction).count()
    }

    /// Visible nodes in registration order.
    pub fn visible_nodes(&self) -> impl Iterator<Item = NodeIndex> + 'a {
        let overlay = self.overlay;
        self.index
            .node_indices()
            .filter(move |node| !overlay.is_node_hidden(*node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, NodeType};

    fn index_with(edges: Vec<Edge>) -> GraphIndex {
        let nodes = ["a", "b", "c", "d", "lonely"]
            .into_iter()
            .map(|id| Node::new(id, id, NodeType::Table));
        GraphIndex::build(nodes, edges)
    }

    #[test]
    fn all_filterable_types_start_active() {
        let filter = EdgeTypeFilter::new();
        for edge_type in EdgeType::FILTERABLE {
            assert!(filter.is_active(edge_type));
        }
        assert!(filter.disabled_types().is_empty());
    }

    #[test]
    fn toggle_flips_filterable_types_only() {
        let mut filter = EdgeTypeFilter::new();

        assert!(filter.toggle(EdgeType::Select));
        assert!(!filter.is_edge_enabled(EdgeType::Select));
        assert!(filter.toggle(EdgeType::Select));
        assert!(filter.is_edge_enabled(EdgeType::Select));

        assert!(!filter.toggle(EdgeType::Call));
        assert!(filter.is_edge_enabled(EdgeType::Call));
    }

    #[test]
    fn set_active_ignores_non_filterable_types() {
        let mut filter = EdgeTypeFilter::new();
        filter.set_active([EdgeType::Insert, EdgeType::Call, EdgeType::Unknown]);

        assert_eq!(filter.active_types(), vec![EdgeType::Insert]);
        assert!(filter.is_edge_enabled(EdgeType::Call));
        assert!(filter.is_edge_enabled(EdgeType::Unknown));
        assert!(!filter.is_edge_enabled(EdgeType::ForeignKey));
    }

    #[test]
    fn node_hidden_only_when_every_incident_edge_is_hidden() {
        let index = index_with(vec![
            Edge::new("a", "b", EdgeType::Select),
            Edge::new("b", "c", EdgeType::ForeignKey),
            Edge::new("c", "d", EdgeType::Select),
        ]);
        let mut filter = EdgeTypeFilter::new();
        filter.set_active([EdgeType::ForeignKey]);

        let overlay = filter.recompute(&index);
        let hidden = |id: &str| overlay.is_node_hidden(index.lookup(id).expect("registered"));

        assert!(hidden("a"));
        assert!(!hidden("b"));
        assert!(!hidden("c"));
        assert!(hidden("d"));
        assert!(!hidden("lonely"));
        assert_eq!(overlay.hidden_edge_count(), 2);
        assert_eq!(overlay.visible_node_count(), 3);
    }

    #[test]
    fn non_filterable_edges_keep_their_nodes_visible() {
        let index = index_with(vec![
            Edge::new("a", "b", EdgeType::Select),
            Edge::new("a", "c", EdgeType::Call),
        ]);
        let mut filter = EdgeTypeFilter::new();
        filter.set_active(std::iter::empty());

        let overlay = filter.recompute(&index);

        assert!(!overlay.is_node_hidden(index.lookup("a").expect("registered")));
        assert!(overlay.is_node_hidden(index.lookup("b").expect("registered")));
        assert!(!overlay.is_node_hidden(index.lookup("c").expect("registered")));
    }

    #[test]
    fn recompute_restores_visibility_after_reenabling() {
        let index = index_with(vec![Edge::new("a", "b", EdgeType::Delete)]);
        let mut filter = EdgeTypeFilter::new();

        filter.toggle(EdgeType::Delete);
        assert_eq!(filter.recompute(&index).hidden_node_count(), 2);

        filter.toggle(EdgeType::Delete);
        let overlay = filter.recompute(&index);
        assert_eq!(overlay.hidden_node_count(), 0);
        assert_eq!(overlay.hidden_edge_count(), 0);
    }

    #[test]
    fn view_skips_hidden_edges() {
        let index = index_with(vec![
            Edge::new("a", "b", EdgeType::Select),
            Edge::new("a", "c", EdgeType::Insert),
        ]);
        let mut filter = EdgeTypeFilter::new();
        filter.toggle(EdgeType::Select);
        let overlay = filter.recompute(&index);
        let view = GraphView::new(&index, &overlay);

        let a = index.lookup("a").expect("registered");
        let c = index.lookup("c").expect("registered");
        let targets: Vec<_> = view
            .enabled_edges(a, Direction::Outgoing)
            .map(|adj| adj.neighbor)
            .collect();

        assert_eq!(targets, vec![c]);
        assert_eq!(view.enabled_degree(a, Direction::Outgoing), 1);
        assert_eq!(view.visible_nodes().count(), 4);
    }
}
