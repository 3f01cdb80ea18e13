//! Domain types for the lineage graph.
//!
//! These types represent the core domain model:
//! - **Identifiers**: `NodeId`
//! - **Entities**: `Node`, `Edge` (supplied by the schema/lineage backend)
//! - **Projections**: `NodeRef` (compact node view used in every result list)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Node/edge type | Enum not String | Exhaustive matching in scoring and filtering |
//! | Unrecognized type | `Unknown` variant | Newer backends must not break loading |
//! | Type parsing | Case and separator insensitive | Backends disagree on `FOREIGN_KEY` vs `foreignKey` |
//! | Quality score | `Option<f64>` | Absent and NaN both mean "unknown" |

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a graph node.
///
/// Ids are opaque to the engine; the backend typically uses schema-qualified
/// object names (e.g., `"public.orders"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Lowercase a type label and drop separators so `FOREIGN_KEY`,
/// `foreign-key` and `ForeignKey` compare equal.
fn normalize_type_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Kind of database object a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum NodeType {
    /// Base table
    Table,
    /// View (plain or materialized)
    View,
    /// Stored procedure
    Procedure,
    /// User-defined function
    Function,
    /// Ad hoc query mined from history
    Query,
    /// Single column of a table or view
    Column,
    /// Anything the backend reports that we don't recognize
    Unknown,
}

impl NodeType {
    /// Parse a backend type label, falling back to `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize_type_label(raw).as_str() {
            "table" | "basetable" => Self::Table,
            "view" | "materializedview" => Self::View,
            "procedure" | "proc" | "storedprocedure" => Self::Procedure,
            "function" | "func" => Self::Function,
            "query" => Self::Query,
            "column" => Self::Column,
            _ => Self::Unknown,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Procedure => "procedure",
            Self::Function => "function",
            Self::Query => "query",
            Self::Column => "column",
            Self::Unknown => "unknown",
        }
    }
}

impl From<Option<String>> for NodeType {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map_or(Self::Unknown, Self::parse)
    }
}

impl From<NodeType> for &'static str {
    fn from(node_type: NodeType) -> Self {
        node_type.as_str()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship carried by an edge.
///
/// `ForeignKey` through `Delete` are *filterable*: the user can switch them off
/// and the visibility overlay follows. `Call` and `Unknown` are always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum EdgeType {
    /// Foreign key constraint between tables
    ForeignKey,
    /// Read dependency (view definition, query)
    Select,
    /// Write dependency via INSERT
    Insert,
    /// Write dependency via UPDATE
    Update,
    /// Write dependency via DELETE
    Delete,
    /// Procedure or function invocation
    Call,
    /// Anything the backend reports that we don't recognize
    Unknown,
}

impl EdgeType {
    /// Edge types the visibility filter can switch off, in display order.
    pub const FILTERABLE: [EdgeType; 5] = [
        EdgeType::ForeignKey,
        EdgeType::Select,
        EdgeType::Insert,
        EdgeType::Update,
        EdgeType::Delete,
    ];

    /// Parse a backend type label, falling back to `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize_type_label(raw).as_str() {
            "foreignkey" | "fk" => Self::ForeignKey,
            "select" | "read" => Self::Select,
            "insert" => Self::Insert,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "call" | "exec" | "execute" => Self::Call,
            _ => Self::Unknown,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForeignKey => "foreign_key",
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Call => "call",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the edge type participates in visibility filtering.
    #[must_use]
    pub fn is_filterable(&self) -> bool {
        Self::FILTERABLE.contains(self)
    }
}

impl From<Option<String>> for EdgeType {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map_or(Self::Unknown, Self::parse)
    }
}

impl From<EdgeType> for &'static str {
    fn from(edge_type: EdgeType) -> Self {
        edge_type.as_str()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Core Entities
// ============================================================================

/// A database object in the lineage graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Display name, schema-qualified outside the default schema
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    /// Object kind
    #[serde(rename = "type", default = "unknown_node_type")]
    pub node_type: NodeType,
    /// Data quality score in `0..=100`, if the backend computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

fn unknown_node_type() -> NodeType {
    NodeType::Unknown
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Node {
    /// Create a node without a quality score.
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            quality_score: None,
        }
    }

    /// Attach a quality score.
    #[must_use]
    pub fn with_quality_score(mut self, score: f64) -> Self {
        self.quality_score = Some(score);
        self
    }

    /// Label used for display and search; falls back to the id when empty.
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }

    /// Quality score, treating NaN as unknown.
    #[must_use]
    pub fn quality(&self) -> Option<f64> {
        self.quality_score.filter(|score| !score.is_nan())
    }

    /// Compact projection of this node.
    #[must_use]
    pub fn to_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id.clone(),
            label: self.display_label().to_string(),
            node_type: self.node_type,
        }
    }
}

/// A directed dependency between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Id of the node the edge starts at
    pub source: NodeId,
    /// Id of the node the edge points to
    pub target: NodeId,
    /// Relationship kind
    #[serde(rename = "type", default = "unknown_edge_type")]
    pub edge_type: EdgeType,
}

fn unknown_edge_type() -> EdgeType {
    EdgeType::Unknown
}

impl Edge {
    /// Create a new edge.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

// ============================================================================
// Projections
// ============================================================================

/// Compact `{id, label, type}` view of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeRef {
    /// Node identifier
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Object kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

/// Case-insensitive label ordering with id as the tie-break.
///
/// Every list the engine returns uses this order so results are stable for
/// identical input graphs regardless of insertion order.
pub(crate) fn label_order(a: &NodeRef, b: &NodeRef) -> std::cmp::Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("FOREIGN_KEY", EdgeType::ForeignKey)]
    #[case("foreign-key", EdgeType::ForeignKey)]
    #[case("ForeignKey", EdgeType::ForeignKey)]
    #[case("fk", EdgeType::ForeignKey)]
    #[case("SELECT", EdgeType::Select)]
    #[case("insert", EdgeType::Insert)]
    #[case("Update", EdgeType::Update)]
    #[case("delete", EdgeType::Delete)]
    #[case("call", EdgeType::Call)]
    #[case("MERGE", EdgeType::Unknown)]
    #[case("", EdgeType::Unknown)]
    fn edge_type_parse_is_lenient(#[case] raw: &str, #[case] expected: EdgeType) {
        assert_eq!(EdgeType::parse(raw), expected);
    }

    #[rstest]
    #[case("TABLE", NodeType::Table)]
    #[case("Materialized View", NodeType::View)]
    #[case("stored_procedure", NodeType::Procedure)]
    #[case("function", NodeType::Function)]
    #[case("query", NodeType::Query)]
    #[case("column", NodeType::Column)]
    #[case("sequence", NodeType::Unknown)]
    fn node_type_parse_is_lenient(#[case] raw: &str, #[case] expected: NodeType) {
        assert_eq!(NodeType::parse(raw), expected);
    }

    #[test]
    fn only_dml_and_fk_edges_are_filterable() {
        assert!(EdgeType::ForeignKey.is_filterable());
        assert!(EdgeType::Delete.is_filterable());
        assert!(!EdgeType::Call.is_filterable());
        assert!(!EdgeType::Unknown.is_filterable());
    }

    #[test]
    fn node_deserializes_backend_shape() {
        let json = r#"{"id":"public.orders","label":"orders","type":"TABLE","qualityScore":87.5}"#;
        let node: Node = serde_json::from_str(json).expect("node should parse");

        assert_eq!(node.id, NodeId::new("public.orders"));
        assert_eq!(node.node_type, NodeType::Table);
        assert_eq!(node.quality(), Some(87.5));
    }

    #[test]
    fn unrecognized_types_deserialize_as_unknown() {
        let json = r#"{"source":"a","target":"b","type":"trigger"}"#;
        let edge: Edge = serde_json::from_str(json).expect("edge should parse");

        assert_eq!(edge.edge_type, EdgeType::Unknown);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let node: Node = serde_json::from_str(r#"{"id":"a","label":null,"type":null}"#)
            .expect("node should parse");
        assert_eq!(node.node_type, NodeType::Unknown);
        assert_eq!(node.display_label(), "a");

        let edge: Edge = serde_json::from_str(r#"{"source":"a","target":"b","type":null}"#)
            .expect("edge should parse");
        assert_eq!(edge.edge_type, EdgeType::Unknown);
    }

    #[test]
    fn edge_type_serializes_snake_case() {
        let json = serde_json::to_string(&EdgeType::ForeignKey).expect("serialize");
        assert_eq!(json, "\"foreign_key\"");
    }

    #[test]
    fn nan_quality_score_is_unknown() {
        let node = Node::new("a", "a", NodeType::Table).with_quality_score(f64::NAN);
        assert_eq!(node.quality(), None);
    }

    #[test]
    fn empty_label_falls_back_to_id() {
        let node = Node::new("public.orders", "", NodeType::Table);
        assert_eq!(node.display_label(), "public.orders");
        assert_eq!(node.to_ref().label, "public.orders");
    }
}
