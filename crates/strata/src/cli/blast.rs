//! `strata blast` command implementation.

use colored::Colorize;
use strata::BlastRadius;

use super::display::{format_quality, severity_label, type_tag};
use super::{Options, print_json};

/// Run the blast command.
pub fn run(
    options: &Options,
    node: &str,
    limit: Option<usize>,
    cutoff: Option<usize>,
) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    if engine.node(node).is_none() {
        tracing::warn!(node, "Blast radius requested for unknown node");
    }
    let blast = engine.blast_radius(node, limit, cutoff);

    if options.json {
        return print_json(&blast);
    }

    println!(
        "Blast radius of {} (within {} hops):",
        node.cyan().bold(),
        blast.distance_cutoff
    );
    println!();
    print_blast_radius(&blast);

    Ok(())
}

/// Display a ranked blast radius.
pub fn print_blast_radius(blast: &BlastRadius) {
    if blast.is_empty() {
        println!("    {}", "(nothing downstream)".dimmed());
        return;
    }

    println!(
        "  {}: {}, top score {}",
        "Impacted".white().bold(),
        blast.total_impacted.to_string().yellow(),
        blast.top_score.to_string().yellow()
    );
    println!();

    for node in &blast.critical_nodes {
        println!(
            "    {:>3} {:<6} {} {} {}",
            node.criticality_score.to_string().bold(),
            severity_label(node.severity),
            node.label.white().bold(),
            type_tag(node.node_type),
            format!(
                "distance {}, fanout {}, degree {}, quality {}",
                node.distance,
                node.downstream_fanout,
                node.dependency_degree,
                format_quality(node.quality_score)
            )
            .dimmed()
        );
    }

    if blast.has_more {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            blast.total_impacted - blast.critical_nodes.len()
        );
    }
}
