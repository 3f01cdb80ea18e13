//! Engine configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! is a valid configuration:
//!
//! ```yaml
//! preview-limit: 24
//! distance-cutoff: 6
//! dense-distance-cutoff: 4
//! dense-node-threshold: 300
//! dense-edge-threshold: 900
//! max-hops: 8
//! catalog-limit: 400
//! detail-lineage-limit: 50
//! disabled-edge-types: [select]
//! ```
//!
//! Values loaded from a file are validated against the bounds below. Values
//! passed directly to an operation are clamped instead.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::EdgeType;

/// Largest blast radius preview.
pub const MAX_PREVIEW_LIMIT: usize = 120;

/// Smallest blast radius distance cutoff.
pub const MIN_DISTANCE_CUTOFF: usize = 1;

/// Largest blast radius distance cutoff.
pub const MAX_DISTANCE_CUTOFF: usize = 12;

/// Smallest path search hop bound.
pub const MIN_HOPS_LIMIT: usize = 1;

/// Largest path search hop bound.
pub const MAX_HOPS_LIMIT: usize = 20;

/// Largest node catalog page.
pub const MAX_CATALOG_LIMIT: usize = 2000;

/// Default blast radius preview size.
pub const DEFAULT_PREVIEW_LIMIT: usize = 24;

/// Default blast radius cutoff for regular graphs.
pub const DEFAULT_DISTANCE_CUTOFF: usize = 6;

/// Default blast radius cutoff for dense graphs.
pub const DEFAULT_DENSE_DISTANCE_CUTOFF: usize = 4;

/// Node count above which a graph counts as dense.
pub const DEFAULT_DENSE_NODE_THRESHOLD: usize = 300;

/// Edge count above which a graph counts as dense.
pub const DEFAULT_DENSE_EDGE_THRESHOLD: usize = 900;

/// Default path search hop bound.
pub const DEFAULT_MAX_HOPS: usize = 8;

/// Default node catalog page size.
pub const DEFAULT_CATALOG_LIMIT: usize = 400;

/// Default lineage list size in selection details.
pub const DEFAULT_DETAIL_LINEAGE_LIMIT: usize = 50;

/// Tunables for the analytics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Blast radius preview size when the caller gives none
    pub preview_limit: usize,
    /// Blast radius cutoff for regular graphs
    pub distance_cutoff: usize,
    /// Blast radius cutoff for dense graphs
    pub dense_distance_cutoff: usize,
    /// Node count above which a graph is dense
    pub dense_node_threshold: usize,
    /// Edge count above which a graph is dense
    pub dense_edge_threshold: usize,
    /// Path search hop bound when the caller gives none
    pub max_hops: usize,
    /// Node catalog page size when the caller gives none
    pub catalog_limit: usize,
    /// Lineage list size in selection details
    pub detail_lineage_limit: usize,
    /// Filterable edge types switched off when the engine starts
    pub disabled_edge_types: Vec<EdgeType>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            distance_cutoff: DEFAULT_DISTANCE_CUTOFF,
            dense_distance_cutoff: DEFAULT_DENSE_DISTANCE_CUTOFF,
            dense_node_threshold: DEFAULT_DENSE_NODE_THRESHOLD,
            dense_edge_threshold: DEFAULT_DENSE_EDGE_THRESHOLD,
            max_hops: DEFAULT_MAX_HOPS,
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            detail_lineage_limit: DEFAULT_DETAIL_LINEAGE_LIMIT,
            disabled_edge_types: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is malformed or a value is out of
    /// bounds.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, which we treat as all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        debug!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    /// Check every value against its documented bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        check_range("preview-limit", self.preview_limit, 0, MAX_PREVIEW_LIMIT)?;
        check_range(
            "distance-cutoff",
            self.distance_cutoff,
            MIN_DISTANCE_CUTOFF,
            MAX_DISTANCE_CUTOFF,
        )?;
        check_range(
            "dense-distance-cutoff",
            self.dense_distance_cutoff,
            MIN_DISTANCE_CUTOFF,
            MAX_DISTANCE_CUTOFF,
        )?;
        check_range("dense-node-threshold", self.dense_node_threshold, 1, usize::MAX)?;
        check_range("dense-edge-threshold", self.dense_edge_threshold, 1, usize::MAX)?;
        check_range("max-hops", self.max_hops, MIN_HOPS_LIMIT, MAX_HOPS_LIMIT)?;
        check_range("catalog-limit", self.catalog_limit, 1, MAX_CATALOG_LIMIT)?;
        check_range("detail-lineage-limit", self.detail_lineage_limit, 1, usize::MAX)?;

        if let Some(edge_type) = self
            .disabled_edge_types
            .iter()
            .find(|edge_type| !edge_type.is_filterable())
        {
            return Err(Error::Config(format!(
                "disabled-edge-types: unrecognized or non-filterable edge type '{edge_type}' (filterable: {})",
                filterable_names()
            )));
        }

        Ok(())
    }

    /// Whether a graph of this size should use the dense cutoff.
    #[must_use]
    pub fn is_dense(&self, node_count: usize, edge_count: usize) -> bool {
        node_count > self.dense_node_threshold || edge_count > self.dense_edge_threshold
    }

    /// Default blast radius cutoff for a graph of this size.
    #[must_use]
    pub fn default_distance_cutoff(&self, node_count: usize, edge_count: usize) -> usize {
        if self.is_dense(node_count, edge_count) {
            self.dense_distance_cutoff
        } else {
            self.distance_cutoff
        }
    }
}

fn check_range(key: &str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        let bounds = if max == usize::MAX {
            format!("at least {min}")
        } else {
            format!("between {min} and {max}")
        };
        return Err(Error::Config(format!("{key} must be {bounds}, got {value}")));
    }
    Ok(())
}

/// Comma-separated canonical names of the filterable edge types.
#[must_use]
pub fn filterable_names() -> String {
    EdgeType::FILTERABLE
        .iter()
        .map(EdgeType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a comma-separated list of filterable edge types.
///
/// # Errors
///
/// Returns [`Error::Config`] for entries that are not filterable edge types.
pub fn parse_edge_type_list(list: &str) -> Result<Vec<EdgeType>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let edge_type = EdgeType::parse(item);
            if edge_type.is_filterable() {
                Ok(edge_type)
            } else {
                Err(Error::Config(format!(
                    "unknown edge type '{item}'. Valid types: {}",
                    filterable_names()
                )))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_yaml("").expect("empty is valid");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = EngineConfig::from_yaml("max-hops: 12\ndisabled-edge-types: [select, DELETE]\n")
            .expect("valid config");

        assert_eq!(config.max_hops, 12);
        assert_eq!(
            config.disabled_edge_types,
            vec![EdgeType::Select, EdgeType::Delete]
        );
        assert_eq!(config.preview_limit, DEFAULT_PREVIEW_LIMIT);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = EngineConfig::from_yaml("distance-cutoff: 13").unwrap_err();
        assert!(err.to_string().contains("distance-cutoff must be between 1 and 12"));

        let err = EngineConfig::from_yaml("catalog-limit: 0").unwrap_err();
        assert!(err.to_string().contains("catalog-limit"));
    }

    #[test]
    fn non_filterable_disabled_types_are_rejected() {
        let err = EngineConfig::from_yaml("disabled-edge-types: [call]").unwrap_err();
        assert!(
            err.to_string()
                .contains("unrecognized or non-filterable edge type 'call'")
        );
    }

    #[test]
    fn unrecognized_disabled_types_are_rejected() {
        let err = EngineConfig::from_yaml("disabled-edge-types: [select, merge]").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unrecognized or non-filterable edge type"));
        assert!(message.contains("filterable: "));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = EngineConfig::from_yaml("max-hops: [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn yaml_round_trip_preserves_values() {
        let config = EngineConfig {
            disabled_edge_types: vec![EdgeType::Insert],
            ..EngineConfig::default()
        };
        let yaml = config.to_yaml().expect("serialize");

        assert!(yaml.contains("disabled-edge-types"));
        assert_eq!(EngineConfig::from_yaml(&yaml).expect("parse"), config);
    }

    #[test]
    fn density_selects_cutoff() {
        let config = EngineConfig::default();

        assert_eq!(config.default_distance_cutoff(10, 20), DEFAULT_DISTANCE_CUTOFF);
        assert_eq!(config.default_distance_cutoff(301, 20), DEFAULT_DENSE_DISTANCE_CUTOFF);
        assert_eq!(config.default_distance_cutoff(10, 901), DEFAULT_DENSE_DISTANCE_CUTOFF);
    }

    #[test]
    fn parses_edge_type_lists() {
        assert_eq!(
            parse_edge_type_list("select, foreign_key,,INSERT").expect("valid list"),
            vec![EdgeType::Select, EdgeType::ForeignKey, EdgeType::Insert]
        );
        let err = parse_edge_type_list("select,merge").unwrap_err();
        assert!(err.to_string().contains("unknown edge type 'merge'"));
    }
}
