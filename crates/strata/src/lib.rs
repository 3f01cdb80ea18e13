//! # Strata: Dependency and Lineage Graph Analytics
//!
//! Strata answers impact questions over a database's dependency graph: what
//! feeds this table, what breaks if this view changes, how is this query
//! connected to that procedure. It is an in-memory engine over a snapshot
//! supplied by a schema/lineage backend, designed to sit behind an
//! interactive client.
//!
//! ## Design Philosophy
//!
//! - **Snapshot in, values out** - No I/O, no persistence, no callbacks; every
//!   query returns a plain value
//! - **Filters are first-class** - Switching off an edge category hides edges
//!   and cascades to nodes; every query honors it
//! - **Bounded by construction** - Every traversal has a distance, hop or size
//!   cap, so no query can run away on a pathological graph
//! - **Failure is data** - A missing path is a reason to show, not an error
//!
//! ## Quick Start
//!
//! ```
//! use strata::{Edge, EdgeType, Engine, GraphSnapshot, Node, NodeType};
//!
//! let snapshot = GraphSnapshot::new(
//!     vec![
//!         Node::new("orders", "orders", NodeType::Table),
//!         Node::new("order_items", "order_items", NodeType::Table),
//!         Node::new("v_order_summary", "v_order_summary", NodeType::View),
//!     ],
//!     vec![
//!         Edge::new("order_items", "orders", EdgeType::ForeignKey),
//!         Edge::new("orders", "v_order_summary", EdgeType::Select),
//!     ],
//! );
//! let mut engine = Engine::new(snapshot);
//!
//! let path = engine.find_path("order_items", "v_order_summary", Some(5));
//! assert_eq!(path.path().map(|p| p.hops), Some(2));
//!
//! engine.toggle_edge_type(EdgeType::Select);
//! let path = engine.find_path("order_items", "v_order_summary", Some(5));
//! assert!(!path.is_found());
//!
//! let blast = engine.blast_radius("order_items", None, None);
//! assert_eq!(blast.total_impacted, 1);
//! ```

mod blast;
mod catalog;
mod config;
mod error;
mod filter;
mod graph;
mod lineage;
mod path;
mod search;
mod snapshot;
mod types;

#[cfg(test)]
mod test_support;

pub use blast::{BlastRadius, HIGH_SEVERITY_SCORE, ImpactedNode, MEDIUM_SEVERITY_SCORE, Severity};
pub use catalog::{GraphSummary, NodeCatalog, SelectionDetail};
pub use config::{
    EngineConfig, MAX_CATALOG_LIMIT, MAX_DISTANCE_CUTOFF, MAX_HOPS_LIMIT, MAX_PREVIEW_LIMIT,
    MIN_DISTANCE_CUTOFF, MIN_HOPS_LIMIT, filterable_names, parse_edge_type_list,
};
pub use error::{Error, Result};
pub use filter::{EdgeTypeFilter, GraphView, VisibilityOverlay};
pub use graph::{Adjacent, BuildStats, GraphIndex};
pub use lineage::Lineage;
pub use path::{ImpactPath, PathFailure, PathResult};
pub use search::SearchIndex;
pub use snapshot::GraphSnapshot;
pub use types::{Edge, EdgeType, Node, NodeId, NodeRef, NodeType};

use std::collections::BTreeSet;

use tracing::{debug, info};

/// Lineage analytics over one graph snapshot.
///
/// `Engine` owns the graph index, the edge type filter, the visibility
/// overlay derived from it and the search index over visible labels. Filter
/// changes take `&mut self` and recompute the overlay and search index before
/// returning, so every read sees a consistent state.
///
/// Loading a different graph means building a new `Engine`.
#[derive(Debug, Clone)]
pub struct Engine {
    index: GraphIndex,
    filter: EdgeTypeFilter,
    overlay: VisibilityOverlay,
    search: SearchIndex,
    config: EngineConfig,
    cycles: Vec<Vec<NodeId>>,
}

impl Engine {
    /// Build an engine with the default configuration.
    #[must_use]
    pub fn new(snapshot: GraphSnapshot) -> Self {
        Self::with_config(snapshot, EngineConfig::default())
    }

    /// Build an engine with an explicit configuration.
    ///
    /// Edge types listed in `disabled_edge_types` start switched off.
    #[must_use]
    pub fn with_config(snapshot: GraphSnapshot, config: EngineConfig) -> Self {
        let GraphSnapshot {
            nodes,
            edges,
            cycles,
        } = snapshot;
        let index = GraphIndex::build(nodes, edges);

        let mut filter = EdgeTypeFilter::new();
        if !config.disabled_edge_types.is_empty() {
            filter.set_active(
                EdgeType::FILTERABLE
                    .into_iter()
                    .filter(|edge_type| !config.disabled_edge_types.contains(edge_type)),
            );
        }

        let overlay = filter.recompute(&index);
        let search = SearchIndex::build(&GraphView::new(&index, &overlay));
        let stats = index.stats();
        info!(
            nodes = stats.nodes,
            edges = stats.edges,
            dropped_edges = stats.dropped_edges,
            visible_nodes = overlay.visible_node_count(),
            "Loaded lineage graph"
        );

        Self {
            index,
            filter,
            overlay,
            search,
            config,
            cycles: cycles.unwrap_or_default(),
        }
    }

    // === Accessors ===

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The graph index, ignoring visibility.
    #[must_use]
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// The current visibility overlay.
    #[must_use]
    pub fn overlay(&self) -> &VisibilityOverlay {
        &self.overlay
    }

    /// The graph seen through the current overlay.
    #[must_use]
    pub fn view(&self) -> GraphView<'_> {
        GraphView::new(&self.index, &self.overlay)
    }

    /// Cycles reported by the backend, unchanged.
    #[must_use]
    pub fn cycles(&self) -> &[Vec<NodeId>] {
        &self.cycles
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.node_by_id(id)
    }

    /// Whether the node survives the active filters; `None` if it does not exist.
    #[must_use]
    pub fn is_node_visible(&self, id: &str) -> Option<bool> {
        self.index
            .lookup(id)
            .map(|node| !self.overlay.is_node_hidden(node))
    }

    // === Filtering ===

    /// Filterable edge types currently switched on.
    #[must_use]
    pub fn active_edge_types(&self) -> Vec<EdgeType> {
        self.filter.active_types()
    }

    /// Whether a filterable edge type is switched on.
    #[must_use]
    pub fn is_edge_type_active(&self, edge_type: EdgeType) -> bool {
        self.filter.is_active(edge_type)
    }

    /// Whether edges of this type are currently shown.
    #[must_use]
    pub fn is_edge_enabled(&self, edge_type: EdgeType) -> bool {
        self.filter.is_edge_enabled(edge_type)
    }

    /// Replace the set of active filterable edge types.
    pub fn set_active_edge_types<I>(&mut self, types: I)
    where
        I: IntoIterator<Item = EdgeType>,
    {
        self.filter.set_active(types);
        self.refresh();
    }

    /// Switch one filterable edge type on or off.
    ///
    /// Returns `false` without touching the overlay for non-filterable types.
    pub fn toggle_edge_type(&mut self, edge_type: EdgeType) -> bool {
        if !self.filter.toggle(edge_type) {
            debug!(%edge_type, "Ignoring toggle of non-filterable edge type");
            return false;
        }
        self.refresh();
        true
    }

    /// Switch off the given filterable edge types, keeping the others as they are.
    pub fn disable_edge_types<I>(&mut self, types: I)
    where
        I: IntoIterator<Item = EdgeType>,
    {
        let disabled: Vec<EdgeType> = types.into_iter().collect();
        let remaining: Vec<EdgeType> = self
            .filter
            .active_types()
            .into_iter()
            .filter(|edge_type| !disabled.contains(edge_type))
            .collect();
        self.set_active_edge_types(remaining);
    }

    fn refresh(&mut self) {
        self.overlay = self.filter.recompute(&self.index);
        self.search = SearchIndex::build(&GraphView::new(&self.index, &self.overlay));
    }

    // === Queries ===

    /// Upstream and downstream lineage of a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `id` is not in the graph.
    pub fn lineage(&self, id: &str, limit: Option<usize>) -> Result<Lineage> {
        lineage::collect_lineage(&self.view(), id, limit)
    }

    /// Blast radius of a node.
    ///
    /// Missing arguments fall back to the configured preview limit and the
    /// size-dependent default cutoff. Unknown nodes yield an empty result.
    #[must_use]
    pub fn blast_radius(
        &self,
        id: &str,
        preview_limit: Option<usize>,
        distance_cutoff: Option<usize>,
    ) -> BlastRadius {
        blast::compute_blast_radius(
            &self.view(),
            id,
            preview_limit.unwrap_or(self.config.preview_limit),
            distance_cutoff.unwrap_or_else(|| self.default_distance_cutoff()),
        )
    }

    /// Blast radius cutoff used when the caller gives none.
    ///
    /// Dense graphs get a smaller cutoff to keep the result readable.
    #[must_use]
    pub fn default_distance_cutoff(&self) -> usize {
        self.config
            .default_distance_cutoff(self.index.node_count(), self.index.edge_count())
    }

    /// Shortest impact path from `source_id` to the node matching `target_query`.
    #[must_use]
    pub fn find_path(&self, source_id: &str, target_query: &str, max_hops: Option<usize>) -> PathResult {
        path::find_path(
            &self.view(),
            source_id,
            target_query,
            max_hops.unwrap_or(self.config.max_hops),
        )
    }

    /// Ids of visible nodes whose label contains `term`, ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> BTreeSet<NodeId> {
        self.search.search(term)
    }

    /// Visible nodes whose label contains `term`, sorted by label.
    #[must_use]
    pub fn search_nodes(&self, term: &str, limit: usize) -> Vec<NodeRef> {
        let mut nodes: Vec<NodeRef> = self
            .search
            .matching_nodes(term)
            .map(|node| self.index.node(node).to_ref())
            .collect();
        nodes.sort_by(types::label_order);
        nodes.truncate(limit);
        nodes
    }

    /// Visible nodes sorted by label, capped to `limit` or the configured default.
    #[must_use]
    pub fn catalog(&self, limit: Option<usize>) -> NodeCatalog {
        catalog::build_catalog(&self.view(), limit.unwrap_or(self.config.catalog_limit))
    }

    /// Lineage and blast radius of a node, as shown when it is selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `id` is not in the graph.
    pub fn selection_detail(&self, id: &str) -> Result<SelectionDetail> {
        let node = self
            .index
            .node_by_id(id)
            .ok_or_else(|| Error::NodeNotFound(NodeId::new(id)))?;
        let lineage = self.lineage(id, Some(self.config.detail_lineage_limit))?;
        let blast_radius = self.blast_radius(id, None, None);
        Ok(SelectionDetail::new(node, lineage, blast_radius))
    }

    /// Size and filter state of the loaded graph.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        let stats = self.index.stats();
        GraphSummary {
            node_count: stats.nodes,
            edge_count: stats.edges,
            visible_node_count: self.overlay.visible_node_count(),
            visible_edge_count: self.overlay.visible_edge_count(),
            dropped_edges: stats.dropped_edges,
            duplicate_nodes: stats.duplicate_nodes,
            active_edge_types: self.filter.active_types(),
            dense: self.config.is_dense(stats.nodes, stats.edges),
            cycles: self.cycles.clone(),
        }
    }
}
