//! Presentation-facing projections: node catalog, selection detail and
//! graph summary.

use serde::Serialize;

use crate::blast::BlastRadius;
use crate::config::MAX_CATALOG_LIMIT;
use crate::filter::GraphView;
use crate::lineage::Lineage;
use crate::types::{EdgeType, Node, NodeId, NodeRef, NodeType, label_order};

/// Visible nodes sorted by label, capped to a page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCatalog {
    /// Visible nodes, sorted by label
    pub nodes: Vec<NodeRef>,
    /// Number of visible nodes before capping
    pub total_visible: usize,
    /// Whether `nodes` was capped
    pub truncated: bool,
    /// Effective cap after clamping
    pub limit: usize,
}

/// List visible nodes sorted by label, at most `limit` (capped at 2000).
#[must_use]
pub fn build_catalog(view: &GraphView<'_>, limit: usize) -> NodeCatalog {
    let limit = limit.min(MAX_CATALOG_LIMIT);
    let mut nodes: Vec<NodeRef> = view
        .visible_nodes()
        .map(|node| view.node(node).to_ref())
        .collect();
    nodes.sort_by(label_order);

    let total_visible = nodes.len();
    let truncated = total_visible > limit;
    nodes.truncate(limit);

    NodeCatalog {
        nodes,
        total_visible,
        truncated,
        limit,
    }
}

/// Everything the detail panel shows for a selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDetail {
    /// Node identifier
    pub id: NodeId,
    /// Display label
    pub name: String,
    /// Object kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Quality score, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Size of the full upstream set
    pub upstream_count: usize,
    /// Size of the full downstream set
    pub downstream_count: usize,
    /// Upstream nodes, clipped
    pub upstream_nodes: Vec<NodeRef>,
    /// Downstream nodes, clipped
    pub downstream_nodes: Vec<NodeRef>,
    /// Whether the upstream list was clipped
    pub upstream_has_more: bool,
    /// Whether the downstream list was clipped
    pub downstream_has_more: bool,
    /// Blast radius of the node
    pub blast_radius: BlastRadius,
    /// Blast radius preview limit in effect
    pub preview_limit: usize,
}

impl SelectionDetail {
    /// Assemble a detail record from its parts.
    #[must_use]
    pub fn new(node: &Node, lineage: Lineage, blast_radius: BlastRadius) -> Self {
        Self {
            id: node.id.clone(),
            name: node.display_label().to_string(),
            node_type: node.node_type,
            quality_score: node.quality(),
            upstream_count: lineage.upstream_count,
            downstream_count: lineage.downstream_count,
            upstream_nodes: lineage.upstream_nodes,
            downstream_nodes: lineage.downstream_nodes,
            upstream_has_more: lineage.upstream_has_more,
            downstream_has_more: lineage.downstream_has_more,
            preview_limit: blast_radius.preview_limit,
            blast_radius,
        }
    }
}

/// Size and filter state of the loaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    /// Registered nodes
    pub node_count: usize,
    /// Indexed edges
    pub edge_count: usize,
    /// Nodes surviving the active filters
    pub visible_node_count: usize,
    /// Edges surviving the active filters
    pub visible_edge_count: usize,
    /// Edges dropped at load time for referencing unknown nodes
    pub dropped_edges: usize,
    /// Nodes ignored at load time for reusing an id
    pub duplicate_nodes: usize,
    /// Filterable edge types currently switched on
    pub active_edge_types: Vec<EdgeType>,
    /// Whether the graph uses the dense blast radius cutoff
    pub dense: bool,
    /// Cycles reported by the backend
    pub cycles: Vec<Vec<NodeId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    fn fixture() -> Fixture {
        Fixture::new(
            &[
                ("zeta", NodeType::Table),
                ("Alpha", NodeType::View),
                ("beta", NodeType::Table),
                ("orphan", NodeType::Column),
            ],
            &[
                ("zeta", "Alpha", EdgeType::Select),
                ("beta", "zeta", EdgeType::ForeignKey),
            ],
        )
    }

    #[test]
    fn catalog_is_sorted_by_label_ignoring_case() {
        let fixture = fixture();
        let catalog = build_catalog(&fixture.view(), 400);

        let labels: Vec<_> = catalog.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "beta", "orphan", "zeta"]);
        assert!(!catalog.truncated);
    }

    #[test]
    fn catalog_is_capped() {
        let fixture = fixture();
        let catalog = build_catalog(&fixture.view(), 2);

        assert_eq!(catalog.nodes.len(), 2);
        assert_eq!(catalog.total_visible, 4);
        assert!(catalog.truncated);
    }

    #[test]
    fn catalog_limit_is_clamped() {
        let fixture = fixture();

        assert_eq!(build_catalog(&fixture.view(), 10_000).limit, MAX_CATALOG_LIMIT);
    }

    #[test]
    fn zero_limit_yields_an_empty_truncated_page() {
        let fixture = fixture();
        let catalog = build_catalog(&fixture.view(), 0);

        assert!(catalog.nodes.is_empty());
        assert_eq!(catalog.limit, 0);
        assert_eq!(catalog.total_visible, 4);
        assert!(catalog.truncated);
    }

    #[test]
    fn catalog_omits_hidden_nodes() {
        let mut fixture = fixture();
        fixture.disable(EdgeType::Select);
        let catalog = build_catalog(&fixture.view(), 400);

        let labels: Vec<_> = catalog.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["beta", "orphan", "zeta"]);
    }
}
