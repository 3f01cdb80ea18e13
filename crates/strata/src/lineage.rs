//! Upstream and downstream lineage of a node.
//!
//! Upstream is the transitive closure over incoming edges (everything the
//! node depends on), downstream the closure over outgoing edges (everything
//! that depends on it). Both honor the visibility overlay: hidden edges are
//! not followed and hidden nodes are never reported.

use std::collections::{HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::GraphView;
use crate::types::{NodeId, NodeRef, label_order};

/// Upstream and downstream closure of a node, optionally clipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lineage {
    /// Size of the full upstream set
    pub upstream_count: usize,
    /// Size of the full downstream set
    pub downstream_count: usize,
    /// Upstream nodes, sorted by label, clipped to the limit
    pub upstream_nodes: Vec<NodeRef>,
    /// Downstream nodes, sorted by label, clipped to the limit
    pub downstream_nodes: Vec<NodeRef>,
    /// Whether the upstream set was clipped
    pub upstream_has_more: bool,
    /// Whether the downstream set was clipped
    pub downstream_has_more: bool,
}

/// Collect the lineage of `node_id`.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `node_id` is not in the index.
pub fn collect_lineage(view: &GraphView<'_>, node_id: &str, limit: Option<usize>) -> Result<Lineage> {
    let start = view
        .index()
        .lookup(node_id)
        .ok_or_else(|| Error::NodeNotFound(NodeId::new(node_id)))?;

    let upstream = closure(view, start, Direction::Incoming);
    let downstream = closure(view, start, Direction::Outgoing);

    let upstream_count = upstream.len();
    let downstream_count = downstream.len();
    let (upstream_nodes, upstream_has_more) = clip(upstream, limit);
    let (downstream_nodes, downstream_has_more) = clip(downstream, limit);

    debug!(
        node = node_id,
        upstream = upstream_count,
        downstream = downstream_count,
        "Collected lineage"
    );

    Ok(Lineage {
        upstream_count,
        downstream_count,
        upstream_nodes,
        downstream_nodes,
        upstream_has_more,
        downstream_has_more,
    })
}

/// Visible nodes reachable from `start` over enabled edges, sorted by label.
fn closure(view: &GraphView<'_>, start: NodeIndex, direction: Direction) -> Vec<NodeRef> {
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut found = Vec::new();

    while let Some(current) = queue.pop_front() {
        for adj in view.enabled_edges(current, direction) {
            if !view.is_node_visible(adj.neighbor) || !visited.insert(adj.neighbor) {
                continue;
            }
            found.push(view.node(adj.neighbor).to_ref());
            queue.push_back(adj.neighbor);
        }
    }

    found.sort_by(label_order);
    found
}

fn clip(mut nodes: Vec<NodeRef>, limit: Option<usize>) -> (Vec<NodeRef>, bool) {
    match limit {
        Some(limit) if nodes.len() > limit => {
            nodes.truncate(limit);
            (nodes, true)
        }
        _ => (nodes, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use crate::types::{EdgeType, NodeType};

    /// ```text
    /// raw_orders -> orders -> v_daily -> q_report
    ///                  \
    ///                   -> v_weekly
    /// ```
    fn fixture() -> Fixture {
        Fixture::new(
            &[
                ("raw_orders", NodeType::Table),
                ("orders", NodeType::Table),
                ("v_daily", NodeType::View),
                ("v_weekly", NodeType::View),
                ("q_report", NodeType::Query),
            ],
            &[
                ("raw_orders", "orders", EdgeType::Insert),
                ("orders", "v_daily", EdgeType::Select),
                ("orders", "v_weekly", EdgeType::Select),
                ("v_daily", "q_report", EdgeType::Select),
            ],
        )
    }

    fn labels(nodes: &[NodeRef]) -> Vec<&str> {
        nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn collects_transitive_closure_in_both_directions() {
        let fixture = fixture();
        let lineage = collect_lineage(&fixture.view(), "orders", None).expect("orders exists");

        assert_eq!(labels(&lineage.upstream_nodes), vec!["raw_orders"]);
        assert_eq!(
            labels(&lineage.downstream_nodes),
            vec!["q_report", "v_daily", "v_weekly"]
        );
        assert_eq!(lineage.downstream_count, 3);
        assert!(!lineage.downstream_has_more);
    }

    #[test]
    fn limit_clips_lists_but_not_counts() {
        let fixture = fixture();
        let lineage = collect_lineage(&fixture.view(), "orders", Some(2)).expect("orders exists");

        assert_eq!(lineage.downstream_count, 3);
        assert_eq!(labels(&lineage.downstream_nodes), vec!["q_report", "v_daily"]);
        assert!(lineage.downstream_has_more);
        assert!(!lineage.upstream_has_more);
    }

    #[test]
    fn limit_equal_to_set_size_has_no_more() {
        let fixture = fixture();
        let lineage = collect_lineage(&fixture.view(), "q_report", Some(3)).expect("exists");

        assert_eq!(lineage.upstream_count, 3);
        assert_eq!(lineage.upstream_nodes.len(), 3);
        assert!(!lineage.upstream_has_more);
    }

    #[test]
    fn hidden_edges_cut_the_closure() {
        let mut fixture = fixture();
        fixture.disable(EdgeType::Select);
        let lineage = collect_lineage(&fixture.view(), "orders", None).expect("orders exists");

        assert!(lineage.downstream_nodes.is_empty());
        assert_eq!(labels(&lineage.upstream_nodes), vec!["raw_orders"]);
    }

    #[test]
    fn node_is_not_part_of_its_own_lineage_on_cycles() {
        let fixture = Fixture::new(
            &[("a", NodeType::View), ("b", NodeType::View)],
            &[("a", "b", EdgeType::Select), ("b", "a", EdgeType::Select)],
        );
        let lineage = collect_lineage(&fixture.view(), "a", None).expect("a exists");

        assert_eq!(labels(&lineage.upstream_nodes), vec!["b"]);
        assert_eq!(labels(&lineage.downstream_nodes), vec!["b"]);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let fixture = fixture();
        let err = collect_lineage(&fixture.view(), "missing", None).unwrap_err();

        assert!(matches!(err, Error::NodeNotFound(id) if id.as_str() == "missing"));
    }
}
