//! Shared fixtures for unit tests.

use crate::filter::{EdgeTypeFilter, GraphView, VisibilityOverlay};
use crate::graph::GraphIndex;
use crate::types::{Edge, EdgeType, Node, NodeType};

/// An index plus filter state, recomputed after every change.
pub(crate) struct Fixture {
    index: GraphIndex,
    filter: EdgeTypeFilter,
    overlay: VisibilityOverlay,
}

impl Fixture {
    /// Nodes are labeled with their id.
    pub(crate) fn new(nodes: &[(&str, NodeType)], edges: &[(&str, &str, EdgeType)]) -> Self {
        let nodes = nodes
            .iter()
            .map(|(id, node_type)| Node::new(*id, *id, *node_type))
            .collect();
        Self::from_nodes(nodes, edges)
    }

    pub(crate) fn from_nodes(nodes: Vec<Node>, edges: &[(&str, &str, EdgeType)]) -> Self {
        let edges = edges
            .iter()
            .map(|(source, target, edge_type)| Edge::new(*source, *target, *edge_type));
        let index = GraphIndex::build(nodes, edges);
        let filter = EdgeTypeFilter::new();
        let overlay = filter.recompute(&index);
        Self {
            index,
            filter,
            overlay,
        }
    }

    pub(crate) fn view(&self) -> GraphView<'_> {
        GraphView::new(&self.index, &self.overlay)
    }

    pub(crate) fn disable(&mut self, edge_type: EdgeType) {
        if self.filter.is_active(edge_type) {
            self.filter.toggle(edge_type);
        }
        self.overlay = self.filter.recompute(&self.index);
    }
}
