//! Optional petgraph compatibility layer.
//!
//! Converts snapshot node/edge lists into petgraph's `DiGraph`, enabling
//! petgraph's algorithm library for analysis and DOT export for debugging a
//! layout by eye.
//!
//! # Feature Gate
//!
//! Only available with the `petgraph-compat` feature:
//!
//! ```toml
//! [dependencies]
//! flowsight = { version = "0.1", features = ["petgraph-compat"] }
//! ```

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::snapshot::{EdgeKind, EdgeRecord, NodeRecord};
use crate::types::NodeId;

/// A petgraph-compatible directed graph over snapshot records.
///
/// Node weights are node ids, edge weights are the connection classifier.
pub type FlowDiGraph = DiGraph<NodeId, EdgeKind>;

/// Mapping from node id to petgraph `NodeIndex`.
pub type NodeIndexMap = FxHashMap<NodeId, NodeIndex>;

/// Result of converting snapshot records to petgraph form.
#[derive(Debug, Clone)]
pub struct PetgraphConversion {
    /// The petgraph directed graph.
    pub graph: FlowDiGraph,
    /// Mapping from node id to petgraph index.
    pub index_map: NodeIndexMap,
}

impl PetgraphConversion {
    /// Look up the petgraph index for a node id.
    #[must_use]
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index_map.get(id).copied()
    }

    /// Get the node id at a petgraph index.
    #[must_use]
    pub fn node_at(&self, index: NodeIndex) -> Option<&NodeId> {
        self.graph.node_weight(index)
    }
}

/// Convert snapshot records to a petgraph `DiGraph`.
///
/// Node indices follow input order, so the conversion is deterministic for
/// identical snapshots. Edges with missing endpoints are skipped, matching
/// the layout engine's validity filter.
#[must_use]
pub fn to_petgraph(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> PetgraphConversion {
    let mut graph = DiGraph::new();
    let mut index_map: NodeIndexMap = FxHashMap::default();

    for record in nodes {
        if !index_map.contains_key(&record.id) {
            let idx = graph.add_node(record.id.clone());
            index_map.insert(record.id.clone(), idx);
        }
    }

    for edge in edges {
        let (Some(&source), Some(&target)) =
            (index_map.get(&edge.source), index_map.get(&edge.target))
        else {
            continue;
        };
        graph.add_edge(source, target, edge.kind);
    }

    PetgraphConversion { graph, index_map }
}

/// Export snapshot records to DOT format for Graphviz rendering.
///
/// # Examples
///
/// ```ignore
/// let dot = to_dot(&snapshot.nodes, &snapshot.edges);
/// std::fs::write("run.dot", dot)?;
/// // Then: dot -Tpng run.dot -o run.png
/// ```
#[must_use]
pub fn to_dot(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> String {
    use std::fmt::Write;

    let conversion = to_petgraph(nodes, edges);
    let labels: FxHashMap<&NodeId, &str> = nodes
        .iter()
        .map(|record| (&record.id, record.name.as_str()))
        .collect();

    let mut output = String::new();
    writeln!(output, "digraph {{").unwrap();
    writeln!(output, "    rankdir=TB;").unwrap();
    writeln!(output, "    node [shape=box, style=rounded];").unwrap();

    for idx in conversion.graph.node_indices() {
        let id = &conversion.graph[idx];
        let label = labels.get(id).copied().unwrap_or(id.as_str());
        writeln!(output, "    {} [ label=\"{}\" ];", idx.index(), label).unwrap();
    }

    writeln!(output).unwrap();

    for edge in conversion.graph.edge_indices() {
        let (from, to) = conversion
            .graph
            .edge_endpoints(edge)
            .expect("edge index from the same graph");
        let style = match conversion.graph[edge] {
            EdgeKind::Normal => "",
            EdgeKind::Conditional => " [style=dashed]",
        };
        writeln!(output, "    {} -> {}{};", from.index(), to.index(), style).unwrap();
    }

    writeln!(output, "}}").unwrap();
    output
}

/// Check for cycles using petgraph's algorithm.
///
/// Cross-verification aid for the layout engine's synthetic-layer fallback:
/// a snapshot reporting `true` here is exactly one that exercises it.
#[must_use]
pub fn is_cyclic(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> bool {
    let conversion = to_petgraph(nodes, edges);
    petgraph::algo::is_cyclic_directed(&conversion.graph)
}
