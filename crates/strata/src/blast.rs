//! Blast radius: weighted impact of a change to one node.
//!
//! Starting from the source, a breadth-first walk follows enabled outgoing
//! edges up to the distance cutoff. Every node reached is scored:
//!
//! | Component | Formula | Range |
//! |-----------|---------|-------|
//! | distance | `52 - (distance - 1) * 11`, floored at 0 | 0–52 |
//! | fan-out | `enabled outgoing edges * 4` | 0–24 |
//! | dependency | `enabled incoming edges * 2` | 0–16 |
//! | type | table 24, view 14, procedure/function 10, other 8 | 8–24 |
//! | quality risk | `(100 - quality) * 0.2`, rounded; 8 when unknown | 0–24 |
//!
//! The sum is the criticality score; 78 and above is high severity, 52 and
//! above medium, anything lower is low.

use std::collections::{HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use crate::config::{MAX_DISTANCE_CUTOFF, MAX_PREVIEW_LIMIT, MIN_DISTANCE_CUTOFF};
use crate::filter::GraphView;
use crate::types::{NodeId, NodeType};

/// Minimum score of a high-severity node.
pub const HIGH_SEVERITY_SCORE: u32 = 78;

/// Minimum score of a medium-severity node.
pub const MEDIUM_SEVERITY_SCORE: u32 = 52;

/// Severity band of an impacted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Score below 52
    Low,
    /// Score from 52 up to 77
    Medium,
    /// Score of 78 or more
    High,
}

impl Severity {
    /// Classify a criticality score.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_SEVERITY_SCORE {
            Self::High
        } else if score >= MEDIUM_SEVERITY_SCORE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node inside the blast radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedNode {
    /// Node identifier
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Object kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Hops from the source at first discovery
    pub distance: usize,
    /// Enabled outgoing edges of this node
    pub downstream_fanout: usize,
    /// Enabled incoming edges of this node
    pub dependency_degree: usize,
    /// Quality score, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Weighted criticality
    pub criticality_score: u32,
    /// Severity band derived from the score
    pub severity: Severity,
}

/// Result of a blast radius computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastRadius {
    /// Node the impact was computed from
    pub source: NodeId,
    /// Number of impacted nodes before truncation
    pub total_impacted: usize,
    /// Highest-scoring impacted nodes, at most `preview_limit`
    pub critical_nodes: Vec<ImpactedNode>,
    /// Whether `critical_nodes` was truncated
    pub has_more: bool,
    /// Effective preview limit after clamping
    pub preview_limit: usize,
    /// Effective distance cutoff after clamping
    pub distance_cutoff: usize,
    /// Highest score among all impacted nodes, 0 when there are none
    pub top_score: u32,
}

impl BlastRadius {
    fn empty(source: &str, preview_limit: usize, distance_cutoff: usize) -> Self {
        Self {
            source: NodeId::new(source),
            total_impacted: 0,
            critical_nodes: Vec::new(),
            has_more: false,
            preview_limit,
            distance_cutoff,
            top_score: 0,
        }
    }

    /// Whether the source impacts nothing (or does not exist).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_impacted == 0
    }
}

/// Compute the blast radius of `source_id`.
///
/// `preview_limit` is clamped to `0..=120` and `distance_cutoff` to `1..=12`.
/// An unknown source yields an empty result rather than an error.
#[must_use]
pub fn compute_blast_radius(
    view: &GraphView<'_>,
    source_id: &str,
    preview_limit: usize,
    distance_cutoff: usize,
) -> BlastRadius {
    let preview_limit = preview_limit.min(MAX_PREVIEW_LIMIT);
    let distance_cutoff = distance_cutoff.clamp(MIN_DISTANCE_CUTOFF, MAX_DISTANCE_CUTOFF);

    let Some(source) = view.index().lookup(source_id) else {
        debug!(source = source_id, "Blast radius requested for unknown node");
        return BlastRadius::empty(source_id, preview_limit, distance_cutoff);
    };

    let mut impacted: Vec<ImpactedNode> = discover(view, source, distance_cutoff)
        .into_iter()
        .map(|(node, distance)| score_node(view, node, distance))
        .collect();

    impacted.sort_by(|a, b| {
        b.criticality_score
            .cmp(&a.criticality_score)
            .then_with(|| a.distance.cmp(&b.distance))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.id.cmp(&b.id))
    });

    let total_impacted = impacted.len();
    let top_score = impacted.first().map_or(0, |node| node.criticality_score);
    let has_more = total_impacted > preview_limit;
    impacted.truncate(preview_limit);

    debug!(
        source = source_id,
        total_impacted,
        top_score,
        distance_cutoff,
        "Computed blast radius"
    );

    BlastRadius {
        source: NodeId::new(source_id),
        total_impacted,
        critical_nodes: impacted,
        has_more,
        preview_limit,
        distance_cutoff,
        top_score,
    }
}

/// Breadth-first discovery of `(node, distance)` pairs, source excluded.
fn discover(view: &GraphView<'_>, source: NodeIndex, cutoff: usize) -> Vec<(NodeIndex, usize)> {
    let mut visited = HashSet::from([source]);
    let mut queue = VecDeque::from([(source, 0_usize)]);
    let mut discovered = Vec::new();

    while let Some((current, distance)) = queue.pop_front() {
        if distance >= cutoff {
            continue;
        }
        for adj in view.enabled_edges(current, Direction::Outgoing) {
            if visited.insert(adj.neighbor) {
                discovered.push((adj.neighbor, distance + 1));
                queue.push_back((adj.neighbor, distance + 1));
            }
        }
    }

    discovered
}

fn score_node(view: &GraphView<'_>, node: NodeIndex, distance: usize) -> ImpactedNode {
    let data = view.node(node);
    let downstream_fanout = view.enabled_degree(node, Direction::Outgoing);
    let dependency_degree = view.enabled_degree(node, Direction::Incoming);
    let quality_score = data.quality();

    let criticality_score = distance_weight(distance)
        + fanout_weight(downstream_fanout)
        + dependency_weight(dependency_degree)
        + type_weight(data.node_type)
        + quality_risk_weight(quality_score);

    ImpactedNode {
        id: data.id.clone(),
        label: data.display_label().to_string(),
        node_type: data.node_type,
        distance,
        downstream_fanout,
        dependency_degree,
        quality_score,
        criticality_score,
        severity: Severity::from_score(criticality_score),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn distance_weight(distance: usize) -> u32 {
    52_u32.saturating_sub(saturating_u32(distance.saturating_sub(1)).saturating_mul(11))
}

fn fanout_weight(fanout: usize) -> u32 {
    saturating_u32(fanout).saturating_mul(4).min(24)
}

fn dependency_weight(degree: usize) -> u32 {
    saturating_u32(degree).saturating_mul(2).min(16)
}

fn type_weight(node_type: NodeType) -> u32 {
    match node_type {
        NodeType::Table => 24,
        NodeType::View => 14,
        NodeType::Procedure | NodeType::Function => 10,
        NodeType::Query | NodeType::Column | NodeType::Unknown => 8,
    }
}

// Clamped to 0..=24 before the cast, so truncation and sign loss cannot occur.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quality_risk_weight(quality: Option<f64>) -> u32 {
    match quality {
        Some(score) if !score.is_nan() => ((100.0 - score) * 0.2).round().clamp(0.0, 24.0) as u32,
        _ => 8,
    }
}
