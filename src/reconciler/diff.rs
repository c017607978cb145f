//! Snapshot change detection.
//!
//! The reconciler re-runs layout only when the node/edge identity sets of a
//! deduplicated snapshot differ from the previous one. Pure status or
//! metadata changes patch records into the existing positioned view, so a
//! node never moves on screen merely because its status advanced.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::layout::{GraphView, filter_edges};
use crate::snapshot::InstanceSnapshot;
use crate::types::NodeId;

/// Node and edge identities of one deduplicated snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IdentitySets {
    nodes: FxHashSet<NodeId>,
    edges: FxHashSet<(NodeId, NodeId)>,
}

impl IdentitySets {
    pub(crate) fn of(snapshot: &InstanceSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes.iter().map(|n| n.id.clone()).collect(),
            edges: snapshot
                .edges
                .iter()
                .map(|e| (e.source.clone(), e.target.clone()))
                .collect(),
        }
    }
}

/// What a fresh snapshot means for the published view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SnapshotDelta {
    /// Same identities, same record contents: publish nothing.
    Unchanged,
    /// Same identities, different record contents: patch statuses in place.
    Refreshed,
    /// Membership changed (or this is the first snapshot): re-run layout.
    Restructured,
}

/// Classifies a deduplicated snapshot against the previous one.
pub(crate) fn classify(
    prev_seen: Option<&IdentitySets>,
    prev_view: Option<&GraphView>,
    snapshot: &InstanceSnapshot,
    next: &IdentitySets,
) -> SnapshotDelta {
    let (Some(prev_seen), Some(prev_view)) = (prev_seen, prev_view) else {
        return SnapshotDelta::Restructured;
    };
    if prev_seen != next {
        return SnapshotDelta::Restructured;
    }

    let previous: FxHashMap<&NodeId, _> = prev_view
        .nodes
        .iter()
        .map(|node| (&node.record.id, &node.record))
        .collect();
    let records_changed = snapshot
        .nodes
        .iter()
        .any(|record| previous.get(&record.id).is_none_or(|prev| **prev != *record));
    if records_changed {
        return SnapshotDelta::Refreshed;
    }

    let previous_edges: FxHashMap<(&NodeId, &NodeId), _> = prev_view
        .edges
        .iter()
        .map(|edge| ((&edge.source, &edge.target), edge))
        .collect();
    let edges_changed = snapshot.edges.iter().any(|edge| {
        previous_edges
            .get(&(&edge.source, &edge.target))
            // A snapshot edge absent from the view was dangling before and
            // still is (identities are unchanged); only kept edges count.
            .is_some_and(|prev| **prev != *edge)
    });
    if edges_changed {
        return SnapshotDelta::Refreshed;
    }

    SnapshotDelta::Unchanged
}

/// Rebuilds a view from fresh records while keeping every coordinate.
///
/// Only valid when `classify` returned [`SnapshotDelta::Refreshed`]: the
/// node identity set must equal the view's. Records missing from the
/// snapshot (impossible under that precondition) keep their old contents.
pub(crate) fn patch(prev: &GraphView, snapshot: &InstanceSnapshot) -> GraphView {
    let fresh: FxHashMap<&NodeId, _> = snapshot
        .nodes
        .iter()
        .map(|record| (&record.id, record))
        .collect();

    let nodes = prev
        .nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if let Some(record) = fresh.get(&node.record.id) {
                node.record = (*record).clone();
            }
            node
        })
        .collect();

    GraphView {
        nodes,
        edges: filter_edges(&snapshot.nodes, &snapshot.edges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::snapshot::{EdgeRecord, NodeRecord};
    use crate::types::NodeStatus;

    fn snapshot(statuses: &[(&str, NodeStatus)], edges: &[(&str, &str)]) -> InstanceSnapshot {
        let mut snap = InstanceSnapshot::new("r");
        for (id, status) in statuses {
            snap = snap.with_node(NodeRecord::new(*id, id.to_uppercase(), *status));
        }
        for (from, to) in edges {
            snap = snap.with_edge(EdgeRecord::new(*from, *to));
        }
        snap
    }

    #[test]
    fn first_snapshot_restructures() {
        let snap = snapshot(&[("a", NodeStatus::Pending)], &[]);
        let next = IdentitySets::of(&snap);
        assert_eq!(classify(None, None, &snap, &next), SnapshotDelta::Restructured);
    }

    #[test]
    fn added_node_restructures() {
        let first = snapshot(&[("a", NodeStatus::Pending)], &[]);
        let seen = IdentitySets::of(&first);
        let view = layout(&first.nodes, &first.edges);

        let second = snapshot(&[("a", NodeStatus::Pending), ("b", NodeStatus::Pending)], &[]);
        let next = IdentitySets::of(&second);
        assert_eq!(
            classify(Some(&seen), Some(&view), &second, &next),
            SnapshotDelta::Restructured
        );
    }

    #[test]
    fn status_change_refreshes() {
        let first = snapshot(&[("a", NodeStatus::Pending)], &[]);
        let seen = IdentitySets::of(&first);
        let view = layout(&first.nodes, &first.edges);

        let second = snapshot(&[("a", NodeStatus::Running)], &[]);
        let next = IdentitySets::of(&second);
        assert_eq!(
            classify(Some(&seen), Some(&view), &second, &next),
            SnapshotDelta::Refreshed
        );
    }

    #[test]
    fn identical_snapshot_is_unchanged() {
        let first = snapshot(&[("a", NodeStatus::Pending), ("b", NodeStatus::Running)], &[("a", "b")]);
        let seen = IdentitySets::of(&first);
        let view = layout(&first.nodes, &first.edges);

        let next = IdentitySets::of(&first);
        assert_eq!(
            classify(Some(&seen), Some(&view), &first, &next),
            SnapshotDelta::Unchanged
        );
    }

    #[test]
    fn patch_keeps_positions_and_updates_records() {
        let first = snapshot(
            &[("a", NodeStatus::Running), ("b", NodeStatus::Pending)],
            &[("a", "b")],
        );
        let view = layout(&first.nodes, &first.edges);

        let second = snapshot(
            &[("a", NodeStatus::Completed), ("b", NodeStatus::Running)],
            &[("a", "b")],
        );
        let patched = patch(&view, &second);

        for (old, new) in view.nodes.iter().zip(&patched.nodes) {
            assert_eq!(old.position, new.position);
            assert_eq!(old.layer, new.layer);
        }
        assert_eq!(patched.node(&"a".into()).unwrap().record.status, NodeStatus::Completed);
    }

    #[test]
    fn edge_label_change_refreshes() {
        let first = snapshot(&[("a", NodeStatus::Pending), ("b", NodeStatus::Pending)], &[("a", "b")]);
        let seen = IdentitySets::of(&first);
        let view = layout(&first.nodes, &first.edges);

        let mut second = first.clone();
        second.edges[0] = EdgeRecord::new("a", "b").with_label("retry");
        let next = IdentitySets::of(&second);
        assert_eq!(
            classify(Some(&seen), Some(&view), &second, &next),
            SnapshotDelta::Refreshed
        );
    }
}
