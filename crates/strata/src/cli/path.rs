//! `strata path` command implementation.

use colored::Colorize;

use super::display::format_node;
use super::{Options, print_json};

/// Run the path command.
///
/// A missing path is reported as a result, not an error.
pub fn run(
    options: &Options,
    source: &str,
    target: &str,
    max_hops: Option<usize>,
) -> Result<(), strata::Error> {
    let engine = options.load_engine()?;
    let result = engine.find_path(source, target, max_hops);

    if options.json {
        return print_json(&result);
    }

    println!(
        "Impact path from {} to {}:",
        source.cyan().bold(),
        target.cyan().bold()
    );
    println!();

    match result.path() {
        Some(path) => {
            let hops = if path.hops == 1 { "hop" } else { "hops" };
            println!(
                "  {} ({} {hops}, {} nodes visited):",
                "Found".green().bold(),
                path.hops,
                path.visited_count
            );
            if let Some((first, rest)) = path.path.split_first() {
                println!("    {}", format_node(first));
                for (node, edge_type) in rest.iter().zip(&path.edge_types) {
                    println!("      {} {}", "│".dimmed(), edge_type.as_str().dimmed());
                    println!("    {}", format_node(node));
                }
            }
        }
        None => {
            let reason = result.reason().unwrap_or_default();
            println!("  {}: {reason}", "No path".yellow().bold());
        }
    }

    Ok(())
}
