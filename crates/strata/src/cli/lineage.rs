//! `strata lineage` command implementation.

use colored::Colorize;

use super::display::print_nodes;
use super::{Options, print_json};

/// Run the lineage command.
pub fn run(options: &Options, node: &str, limit: Option<usize>) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    let lineage = engine.lineage(node, limit)?;

    if options.json {
        return print_json(&lineage);
    }

    println!("Lineage of {}:", node.cyan().bold());
    println!();

    println!(
        "  {} ({} nodes):",
        "Upstream".white().bold(),
        lineage.upstream_count.to_string().green()
    );
    print_nodes(&lineage.upstream_nodes, lineage.upstream_count, "(none)");

    println!();

    println!(
        "  {} ({} nodes):",
        "Downstream".white().bold(),
        lineage.downstream_count.to_string().yellow()
    );
    print_nodes(
        &lineage.downstream_nodes,
        lineage.downstream_count,
        "(none)",
    );

    Ok(())
}
