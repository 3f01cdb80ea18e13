//! Common display utilities for CLI commands.

use colored::{ColoredString, Colorize};
use strata::{NodeRef, NodeType, Severity};

/// Print a list of nodes, noting when the list was clipped.
pub fn print_nodes(nodes: &[NodeRef], total: usize, empty_message: &str) {
    if nodes.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for node in nodes {
        println!("    {} {}", "•".dimmed(), format_node(node));
    }

    if total > nodes.len() {
        println!("    {} ... and {} more", "•".dimmed(), total - nodes.len());
    }
}

/// `label (type)`, with the id appended when it differs from the label.
pub fn format_node(node: &NodeRef) -> String {
    let mut text = format!("{} {}", node.label.white().bold(), type_tag(node.node_type));
    if node.label != node.id.as_str() {
        text.push_str(&format!(" {}", format!("[{}]", node.id).dimmed()));
    }
    text
}

/// Node type as a dimmed `(type)` tag.
pub fn type_tag(node_type: NodeType) -> ColoredString {
    format!("({node_type})").dimmed()
}

/// Severity colored by level.
pub fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::High => severity.as_str().red().bold(),
        Severity::Medium => severity.as_str().yellow(),
        Severity::Low => severity.as_str().green(),
    }
}

/// Quality score out of 100, or a dash when unknown.
pub fn format_quality(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |score| format!("{score:.0}/100"))
}
