//! One-shot layout dump: builds a small run snapshot and prints the grid.
//!
//! Run with: `cargo run --example layout_dump`

use flowsight::layout::layout;
use flowsight::snapshot::{EdgeKind, EdgeRecord, NodeRecord};
use flowsight::types::NodeStatus;

fn main() {
    let nodes = vec![
        NodeRecord::new("trigger", "Webhook trigger", NodeStatus::Completed),
        NodeRecord::new("fetch", "Fetch documents", NodeStatus::Completed),
        NodeRecord::new("classify", "Classify", NodeStatus::Running),
        NodeRecord::new("summarize", "Summarize", NodeStatus::Running),
        NodeRecord::new("review", "Human review", NodeStatus::Pending),
        NodeRecord::new("publish", "Publish", NodeStatus::Pending),
    ];
    let edges = vec![
        EdgeRecord::new("trigger", "fetch"),
        EdgeRecord::new("fetch", "classify"),
        EdgeRecord::new("fetch", "summarize"),
        EdgeRecord::new("classify", "review").with_kind(EdgeKind::Conditional),
        EdgeRecord::new("summarize", "review"),
        EdgeRecord::new("review", "publish"),
        // Dangling on purpose; the engine filters it.
        EdgeRecord::new("review", "archive"),
    ];

    let view = layout(&nodes, &edges);

    println!("{:<12} {:>5} {:>4} {:>8} {:>8}  status", "node", "layer", "slot", "x", "y");
    for node in &view.nodes {
        println!(
            "{:<12} {:>5} {:>4} {:>8.1} {:>8.1}  {}",
            node.id().as_str(),
            node.layer,
            node.slot,
            node.position.x,
            node.position.y,
            node.record.status,
        );
    }

    println!("\nedges ({} kept of {}):", view.edges.len(), edges.len());
    for edge in &view.edges {
        println!("  {} -> {}", edge.source, edge.target);
    }
}
