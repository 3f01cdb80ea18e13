//! `strata catalog` command implementation.

use colored::Colorize;

use super::display::format_node;
use super::{Options, print_json};

/// Run the catalog command.
pub fn run(options: &Options, limit: Option<usize>) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    let catalog = engine.catalog(limit);

    if options.json {
        return print_json(&catalog);
    }

    println!(
        "{} ({} visible):",
        "Node Catalog".cyan().bold(),
        catalog.total_visible.to_string().green()
    );
    println!();

    for node in &catalog.nodes {
        println!("  {}", format_node(node));
    }

    if catalog.truncated {
        println!();
        println!(
            "  {}",
            format!(
                "showing the first {} of {} nodes",
                catalog.nodes.len(),
                catalog.total_visible
            )
            .dimmed()
        );
    }

    Ok(())
}
