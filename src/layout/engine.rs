//! Coordinate assignment over a [`LayerAssignment`].
//!
//! The engine is a total function: any node/edge input, however degenerate,
//! produces a deterministic view with finite coordinates and no two nodes at
//! the same `(layer, slot)`.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::layers::assign_layers;
use crate::snapshot::{EdgeRecord, NodeRecord};
use crate::types::NodeId;

/// Spacing parameters for coordinate assignment.
///
/// Layer index maps to the vertical axis, slot index to the horizontal axis,
/// and each layer is centered by half its total width so wide layers do not
/// drift away from the visual center.
///
/// # Examples
///
/// ```rust
/// use flowsight::layout::LayoutConfig;
///
/// let config = LayoutConfig::default();
/// assert_eq!(config.layer_spacing, LayoutConfig::DEFAULT_LAYER_SPACING);
///
/// // Non-finite or non-positive spacings fall back to the defaults.
/// let config = LayoutConfig::new(f64::NAN, -3.0);
/// assert_eq!(config.layer_spacing, LayoutConfig::DEFAULT_LAYER_SPACING);
/// assert_eq!(config.slot_spacing, LayoutConfig::DEFAULT_SLOT_SPACING);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Vertical distance between consecutive layers.
    pub layer_spacing: f64,
    /// Horizontal distance between consecutive slots within a layer.
    pub slot_spacing: f64,
}

impl LayoutConfig {
    /// Default vertical distance between layers.
    pub const DEFAULT_LAYER_SPACING: f64 = 110.0;
    /// Default horizontal distance between slots.
    pub const DEFAULT_SLOT_SPACING: f64 = 220.0;

    /// Creates a config, replacing non-finite or non-positive spacings with
    /// the defaults so downstream coordinates stay finite.
    #[must_use]
    pub fn new(layer_spacing: f64, slot_spacing: f64) -> Self {
        Self {
            layer_spacing: Self::sanitize(layer_spacing, Self::DEFAULT_LAYER_SPACING),
            slot_spacing: Self::sanitize(slot_spacing, Self::DEFAULT_SLOT_SPACING),
        }
    }

    fn sanitize(value: f64, fallback: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            fallback
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_spacing: Self::DEFAULT_LAYER_SPACING,
            slot_spacing: Self::DEFAULT_SLOT_SPACING,
        }
    }
}

/// A 2D coordinate produced by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node record plus the coordinate and grid cell assigned to it.
///
/// Positioned nodes are owned by layout output; the reconciler replaces
/// whole positioned sets and never edits coordinates in place.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionedNode {
    /// The underlying record, carried through unchanged.
    pub record: NodeRecord,
    /// Assigned coordinate.
    pub position: Position,
    /// Layer index, 0 at the top.
    pub layer: usize,
    /// Slot index within the layer, 0 at the left.
    pub slot: usize,
}

impl PositionedNode {
    /// Convenience accessor for the record's id.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.record.id
    }
}

/// The renderable result of a layout pass: positioned nodes plus the edges
/// that survived endpoint validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphView {
    /// Positioned nodes, ordered layer by layer, left to right.
    pub nodes: Vec<PositionedNode>,
    /// Validated edges, in input order.
    pub edges: Vec<EdgeRecord>,
}

impl GraphView {
    /// Looks up a positioned node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// The layer a node was assigned to, if present.
    #[must_use]
    pub fn layer_of(&self, id: &NodeId) -> Option<usize> {
        self.node(id).map(|node| node.layer)
    }

    /// Returns `true` when the view holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lays out nodes and edges with the default [`LayoutConfig`].
///
/// Pure and synchronous: no I/O, no clock, no state between calls, so it can
/// be invoked freely from any number of watches at once. See [`layout_with`]
/// for the full contract.
///
/// # Examples
///
/// ```rust
/// use flowsight::layout::layout;
/// use flowsight::snapshot::{EdgeRecord, NodeRecord};
/// use flowsight::types::NodeStatus;
///
/// let nodes = vec![
///     NodeRecord::new("s", "Start", NodeStatus::Completed),
///     NodeRecord::new("a", "Work", NodeStatus::Running),
/// ];
/// let edges = vec![
///     EdgeRecord::new("s", "a"),
///     EdgeRecord::new("a", "ghost"), // dangling: filtered, not an error
/// ];
///
/// let view = layout(&nodes, &edges);
/// assert_eq!(view.nodes.len(), 2);
/// assert_eq!(view.edges.len(), 1);
/// ```
#[must_use]
pub fn layout(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> GraphView {
    layout_with(&LayoutConfig::default(), nodes, edges)
}

/// Lays out nodes and edges with explicit spacing.
///
/// The engine never fails: duplicate node ids collapse first-seen-wins,
/// edges with missing endpoints are dropped, cycles fall back to synthetic
/// layers, and an empty node list yields an empty view. Identical inputs
/// always produce identical output.
#[must_use]
pub fn layout_with(config: &LayoutConfig, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> GraphView {
    let unique = collapse_duplicate_ids(nodes);
    let valid = filter_edges(&unique, edges);
    let assignment = assign_layers(&unique, &valid);

    let mut by_id: FxHashMap<NodeId, NodeRecord> = unique
        .into_iter()
        .map(|record| (record.id.clone(), record))
        .collect();

    let mut positioned = Vec::with_capacity(by_id.len());
    for (layer_idx, layer) in assignment.layers().iter().enumerate() {
        let width = layer.len();
        let y = layer_idx as f64 * config.layer_spacing;
        // Center the layer: shift left by half of its total span.
        let x_offset = (width.saturating_sub(1)) as f64 * config.slot_spacing / 2.0;
        for (slot, id) in layer.iter().enumerate() {
            let Some(record) = by_id.remove(id) else {
                continue;
            };
            positioned.push(PositionedNode {
                record,
                position: Position {
                    x: slot as f64 * config.slot_spacing - x_offset,
                    y,
                },
                layer: layer_idx,
                slot,
            });
        }
    }

    GraphView {
        nodes: positioned,
        edges: valid,
    }
}

/// Drops edges whose endpoints are missing from the node set.
///
/// Shared with the reconciler's in-place status patching so a patched view
/// carries exactly the edges a fresh layout pass would have kept.
pub(crate) fn filter_edges(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Vec<EdgeRecord> {
    let ids: FxHashSet<&NodeId> = nodes.iter().map(|record| &record.id).collect();
    let mut valid = Vec::with_capacity(edges.len());
    for edge in edges {
        if ids.contains(&edge.source) && ids.contains(&edge.target) {
            valid.push(edge.clone());
        } else {
            tracing::debug!(
                source = %edge.source,
                target = %edge.target,
                "dropping edge with missing endpoint"
            );
        }
    }
    valid
}

fn collapse_duplicate_ids(nodes: &[NodeRecord]) -> Vec<NodeRecord> {
    let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
    let mut unique = Vec::with_capacity(nodes.len());
    for record in nodes {
        if seen.insert(&record.id) {
            unique.push(record.clone());
        } else {
            tracing::debug!(node = %record.id, "collapsing duplicate node id during layout");
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeStatus;

    fn record(id: &str) -> NodeRecord {
        NodeRecord::new(id, id.to_uppercase(), NodeStatus::Pending)
    }

    #[test]
    fn single_node_sits_at_the_origin() {
        let view = layout(&[record("only")], &[]);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].position, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn layers_are_centered_horizontally() {
        let nodes = vec![record("s"), record("a"), record("b"), record("e")];
        let edges = vec![
            EdgeRecord::new("s", "a"),
            EdgeRecord::new("s", "b"),
            EdgeRecord::new("a", "e"),
            EdgeRecord::new("b", "e"),
        ];

        let view = layout(&nodes, &edges);
        let a = view.node(&"a".into()).unwrap();
        let b = view.node(&"b".into()).unwrap();
        let s = view.node(&"s".into()).unwrap();

        // The two-wide layer straddles the single-node layer's x.
        assert_eq!(s.position.x, 0.0);
        assert_eq!(a.position.x, -b.position.x);
        assert_eq!(a.position.y, b.position.y);
    }

    #[test]
    fn spacing_config_is_respected() {
        let config = LayoutConfig::new(50.0, 10.0);
        let nodes = vec![record("s"), record("a")];
        let edges = vec![EdgeRecord::new("s", "a")];

        let view = layout_with(&config, &nodes, &edges);
        assert_eq!(view.node(&"a".into()).unwrap().position.y, 50.0);
    }

    #[test]
    fn duplicate_ids_collapse_to_first_record() {
        let nodes = vec![
            record("a"),
            NodeRecord::new("a", "shadow", NodeStatus::Failed),
        ];
        let view = layout(&nodes, &[]);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].record.name, "A");
    }

    #[test]
    fn empty_input_is_an_empty_view() {
        let view = layout(&[], &[EdgeRecord::new("a", "b")]);
        assert!(view.is_empty());
        assert!(view.edges.is_empty());
    }
}
