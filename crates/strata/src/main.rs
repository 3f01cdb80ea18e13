//! Strata CLI - Lineage and impact analysis from the command line.
//!
//! Strata loads a dependency graph snapshot exported by a schema/lineage
//! backend and answers lineage, blast radius and impact path queries over it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Strata: dependency and lineage graph analytics.
#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Graph snapshot to load (JSON with `nodes`, `edges` and optional `cycles`)
    #[arg(short, long, global = true)]
    graph: Option<PathBuf>,

    /// Engine configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Edge types to switch off, comma-separated (e.g. "select,delete")
    #[arg(short, long, global = true)]
    disable: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show graph size, filter state and reported cycles
    Stats,

    /// Show everything upstream and downstream of a node
    Lineage {
        /// Node id
        node: String,

        /// Maximum number of nodes listed per direction
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Rank the nodes affected by a change to a node
    Blast {
        /// Node id
        node: String,

        /// Maximum number of ranked nodes (0-120)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Maximum distance from the node (1-12)
        #[arg(long)]
        cutoff: Option<usize>,
    },

    /// Find the shortest impact path between two nodes
    Path {
        /// Source node id
        source: String,

        /// Target node id or label fragment
        target: String,

        /// Maximum path length (1-20)
        #[arg(short, long)]
        max_hops: Option<usize>,
    },

    /// Search visible nodes by label
    Search {
        /// Label fragment (case-insensitive)
        term: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List visible nodes sorted by label
    Catalog {
        /// Maximum number of nodes (0-2000)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show lineage and blast radius of a node
    Detail {
        /// Node id
        node: String,
    },

    /// Print the effective engine configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = cli::Options {
        graph: cli.graph,
        config: cli.config,
        disable: cli.disable,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Stats => cli::stats::run(&options),
        Commands::Lineage { node, limit } => cli::lineage::run(&options, &node, limit),
        Commands::Blast {
            node,
            limit,
            cutoff,
        } => cli::blast::run(&options, &node, limit, cutoff),
        Commands::Path {
            source,
            target,
            max_hops,
        } => cli::path::run(&options, &source, &target, max_hops),
        Commands::Search { term, limit } => cli::search::run(&options, &term, limit),
        Commands::Catalog { limit } => cli::catalog::run(&options, limit),
        Commands::Detail { node } => cli::detail::run(&options, &node),
        Commands::Config => cli::config::run(&options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
