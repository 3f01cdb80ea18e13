//! Case-insensitive label search over visible nodes.
//!
//! The index holds lowercased labels of the nodes visible when it was built.
//! It must be rebuilt whenever the visibility overlay changes; the
//! [`Engine`](crate::Engine) does this on every filter change, so hidden
//! nodes can never match.
//!
//! Debouncing keystrokes is left to the caller.

use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;

use crate::filter::GraphView;
use crate::types::NodeId;

#[derive(Debug, Clone)]
struct SearchEntry {
    label: String,
    id: NodeId,
    node: NodeIndex,
}

/// Lowercased labels of the currently visible nodes.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Index the labels of every visible node in `view`.
    #[must_use]
    pub fn build(view: &GraphView<'_>) -> Self {
        let entries = view
            .visible_nodes()
            .map(|node| {
                let data = view.node(node);
                SearchEntry {
                    label: data.display_label().to_lowercase(),
                    id: data.id.clone(),
                    node,
                }
            })
            .collect();
        Self { entries }
    }

    /// Ids of nodes whose label contains `term`, ignoring case.
    ///
    /// An empty or whitespace-only term matches nothing.
    #[must_use]
    pub fn search(&self, term: &str) -> BTreeSet<NodeId> {
        self.matching(term).map(|entry| entry.id.clone()).collect()
    }

    /// Graph indices of nodes whose label contains `term`, in registration order.
    pub fn matching_nodes(&self, term: &str) -> impl Iterator<Item = NodeIndex> + '_ {
        self.matching(term).map(|entry| entry.node)
    }

    /// Number of indexed (visible) nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no node is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matching(&self, term: &str) -> impl Iterator<Item = &SearchEntry> + '_ {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| !needle.is_empty() && entry.label.contains(&needle))
    }
}
