//! CLI command implementations.

mod display;

pub mod blast;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod lineage;
pub mod path;
pub mod search;
pub mod stats;

use std::path::PathBuf;

use serde::Serialize;
use strata::{EdgeType, Engine, EngineConfig, GraphSnapshot};

/// Global options shared by every command.
pub struct Options {
    /// Snapshot file
    pub graph: Option<PathBuf>,
    /// Configuration file
    pub config: Option<PathBuf>,
    /// Comma-separated edge types to switch off
    pub disable: Option<String>,
    /// Emit JSON instead of colored text
    pub json: bool,
}

impl Options {
    /// Load the configuration file, or defaults when none was given.
    pub fn load_config(&self) -> Result<EngineConfig, strata::Error> {
        match &self.config {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }

    /// Edge types switched off on the command line.
    pub fn disabled_edge_types(&self) -> Result<Vec<EdgeType>, strata::Error> {
        self.disable
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), strata::parse_edge_type_list)
    }

    /// Load the snapshot and build an engine with the requested filters applied.
    pub fn load_engine(&self) -> Result<Engine, strata::Error> {
        let Some(graph) = &self.graph else {
            return Err(strata::Error::Config(
                "no graph snapshot given (use --graph <file>)".to_string(),
            ));
        };

        let config = self.load_config()?;
        let disabled = self.disabled_edge_types()?;
        let snapshot = GraphSnapshot::from_path(graph)?;

        let mut engine = Engine::with_config(snapshot, config);
        if !disabled.is_empty() {
            engine.disable_edge_types(disabled);
        }
        Ok(engine)
    }
}

/// Print a result object as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), strata::Error> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
