//! `strata search` command implementation.

use colored::Colorize;

use super::display::format_node;
use super::{Options, print_json};

/// Run the search command.
pub fn run(options: &Options, term: &str, limit: usize) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    let total = engine.search(term).len();
    let nodes = engine.search_nodes(term, limit);

    if options.json {
        return print_json(&nodes);
    }

    if nodes.is_empty() {
        println!("No visible nodes matching \"{}\"", term.cyan());
        return Ok(());
    }

    println!(
        "Found {} nodes matching \"{}\":",
        total.to_string().green(),
        term.cyan().bold()
    );
    println!();

    for node in &nodes {
        println!("  {}", format_node(node));
    }

    if total > nodes.len() {
        println!();
        println!(
            "  {}",
            format!("... and {} more (use --limit to show more)", total - nodes.len()).dimmed()
        );
    }

    Ok(())
}
