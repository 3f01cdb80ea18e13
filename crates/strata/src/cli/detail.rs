//! `strata detail` command implementation.

use colored::Colorize;

use super::blast::print_blast_radius;
use super::display::{format_quality, print_nodes, type_tag};
use super::{Options, print_json};

/// Run the detail command.
pub fn run(options: &Options, node: &str) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    let detail = engine.selection_detail(node)?;

    if options.json {
        return print_json(&detail);
    }

    println!(
        "{} {}",
        detail.name.cyan().bold(),
        type_tag(detail.node_type)
    );
    if engine.is_node_visible(node) == Some(false) {
        println!("  {}", "hidden by the active filters".yellow());
    }
    println!(
        "  {}: {}",
        "Quality".white().bold(),
        format_quality(detail.quality_score)
    );
    println!();

    println!(
        "  {} ({} nodes):",
        "Upstream".white().bold(),
        detail.upstream_count.to_string().green()
    );
    print_nodes(&detail.upstream_nodes, detail.upstream_count, "(none)");
    println!();

    println!(
        "  {} ({} nodes):",
        "Downstream".white().bold(),
        detail.downstream_count.to_string().yellow()
    );
    print_nodes(&detail.downstream_nodes, detail.downstream_count, "(none)");
    println!();

    println!(
        "  {} (within {} hops):",
        "Blast radius".white().bold(),
        detail.blast_radius.distance_cutoff
    );
    print_blast_radius(&detail.blast_radius);

    Ok(())
}
