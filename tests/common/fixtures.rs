//! Shared builders for snapshot fixtures.

use flowsight::snapshot::{EdgeRecord, InstanceSnapshot, NodeRecord};
use flowsight::types::NodeStatus;

/// A pending node with a display name derived from its id.
pub fn node(id: &str) -> NodeRecord {
    NodeRecord::new(id, id.to_uppercase(), NodeStatus::Pending)
}

/// A node with an explicit status.
pub fn node_with_status(id: &str, status: NodeStatus) -> NodeRecord {
    NodeRecord::new(id, id.to_uppercase(), status)
}

/// A normal, unlabeled edge.
pub fn edge(from: &str, to: &str) -> EdgeRecord {
    EdgeRecord::new(from, to)
}

/// A snapshot of pending nodes plus edges, all for run `run`.
pub fn snapshot(run: &str, node_ids: &[&str], edge_pairs: &[(&str, &str)]) -> InstanceSnapshot {
    let mut snap = InstanceSnapshot::new(run);
    for id in node_ids {
        snap = snap.with_node(node(id));
    }
    for (from, to) in edge_pairs {
        snap = snap.with_edge(edge(from, to));
    }
    snap
}

/// Like [`snapshot`], but with per-node statuses.
pub fn snapshot_with_statuses(
    run: &str,
    nodes: &[(&str, NodeStatus)],
    edge_pairs: &[(&str, &str)],
) -> InstanceSnapshot {
    let mut snap = InstanceSnapshot::new(run);
    for (id, status) in nodes {
        snap = snap.with_node(node_with_status(id, *status));
    }
    for (from, to) in edge_pairs {
        snap = snap.with_edge(edge(from, to));
    }
    snap
}
