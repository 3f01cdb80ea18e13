//! `strata stats` command implementation.

use colored::Colorize;
use strata::{EdgeType, NodeId};

use super::{Options, print_json};

/// Run the stats command.
pub fn run(options: &Options) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    let summary = engine.summary();

    if options.json {
        return print_json(&summary);
    }

    println!("{}", "Strata Graph Statistics".cyan().bold());
    println!();

    println!(
        "  {}: {} total, {} visible",
        "Nodes".white().bold(),
        summary.node_count.to_string().green(),
        summary.visible_node_count.to_string().green()
    );
    println!(
        "  {}: {} total, {} visible",
        "Edges".white().bold(),
        summary.edge_count.to_string().green(),
        summary.visible_edge_count.to_string().green()
    );

    let active: Vec<&str> = summary
        .active_edge_types
        .iter()
        .map(EdgeType::as_str)
        .collect();
    println!(
        "  {}: {}",
        "Active edge types".white().bold(),
        if active.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            active.join(", ")
        }
    );
    println!(
        "  {}: {}{}",
        "Blast radius cutoff".white().bold(),
        engine.default_distance_cutoff(),
        if summary.dense {
            " (dense graph)".dimmed().to_string()
        } else {
            String::new()
        }
    );

    if summary.dropped_edges > 0 || summary.duplicate_nodes > 0 {
        println!();
        println!(
            "  {}: Snapshot contains inconsistent entries",
            "Warning".yellow().bold()
        );
        if summary.dropped_edges > 0 {
            println!(
                "    {} edges referencing unknown nodes were dropped",
                summary.dropped_edges.to_string().yellow()
            );
        }
        if summary.duplicate_nodes > 0 {
            println!(
                "    {} nodes with a repeated id were ignored",
                summary.duplicate_nodes.to_string().yellow()
            );
        }
    }

    if !summary.cycles.is_empty() {
        println!();
        println!(
            "  {} ({}):",
            "Reported cycles".white().bold(),
            summary.cycles.len().to_string().yellow()
        );
        for cycle in &summary.cycles {
            let members: Vec<&str> = cycle.iter().map(NodeId::as_str).collect();
            println!("    {} {}", "•".dimmed(), members.join(" -> "));
        }
    }

    Ok(())
}
