//! Layer assignment: Kahn's algorithm drained in full generations.
//!
//! Each generation of the processing queue becomes one layer, so a node is
//! always placed strictly below every predecessor that was processed before
//! it. Any nodes a cycle keeps unreachable are collected into one final
//! synthetic layer, in input order; a graph with no source node at all lands
//! there wholesale. No node is ever dropped.

use rustc_hash::FxHashMap;

use crate::snapshot::{EdgeRecord, NodeRecord};
use crate::types::NodeId;

/// Derived, ephemeral mapping from node id to `(layer, slot)`.
///
/// Recomputed on every layout pass and never persisted. Layer indices start
/// at 0 at the top of the graph; slots index nodes left-to-right within a
/// layer in enqueue order.
///
/// # Examples
///
/// ```rust
/// use flowsight::layout::assign_layers;
/// use flowsight::snapshot::{EdgeRecord, NodeRecord};
/// use flowsight::types::NodeStatus;
///
/// let nodes = vec![
///     NodeRecord::new("s", "S", NodeStatus::Completed),
///     NodeRecord::new("a", "A", NodeStatus::Running),
/// ];
/// let edges = vec![EdgeRecord::new("s", "a")];
///
/// let layers = assign_layers(&nodes, &edges);
/// assert_eq!(layers.layer_of(&"s".into()), Some(0));
/// assert_eq!(layers.layer_of(&"a".into()), Some(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerAssignment {
    layers: Vec<Vec<NodeId>>,
    index: FxHashMap<NodeId, (usize, usize)>,
}

impl LayerAssignment {
    /// The layers, top to bottom; each layer lists node ids left to right.
    #[must_use]
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` when no nodes were assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The layer index a node was assigned to.
    #[must_use]
    pub fn layer_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).map(|&(layer, _)| layer)
    }

    /// The `(layer, slot)` pair a node was assigned to.
    #[must_use]
    pub fn position_of(&self, id: &NodeId) -> Option<(usize, usize)> {
        self.index.get(id).copied()
    }

    fn from_layers(layers: Vec<Vec<NodeId>>) -> Self {
        let mut index = FxHashMap::default();
        for (layer_idx, layer) in layers.iter().enumerate() {
            for (slot, id) in layer.iter().enumerate() {
                index.insert(id.clone(), (layer_idx, slot));
            }
        }
        Self { layers, index }
    }
}

/// Assigns every node a layer, tolerating cycles and disconnected nodes.
///
/// Expects node ids to be unique and edges to reference existing endpoints;
/// [`layout`](crate::layout::layout) establishes both before calling in.
/// Edges that still reference unknown ids are ignored rather than trusted.
///
/// Ordering within a layer is enqueue order: generation 0 is input order,
/// and later generations order nodes by when their last unresolved
/// predecessor was processed. This keeps the result deterministic and biased
/// toward input order without any map-iteration dependence.
#[must_use]
pub fn assign_layers(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> LayerAssignment {
    if nodes.is_empty() {
        return LayerAssignment::default();
    }

    let index_of: FxHashMap<&NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, record)| (&record.id, idx))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree: Vec<usize> = vec![0; nodes.len()];
    for edge in edges {
        let (Some(&source), Some(&target)) =
            (index_of.get(&edge.source), index_of.get(&edge.target))
        else {
            continue;
        };
        successors[source].push(target);
        in_degree[target] += 1;
    }

    // Generation 0: every source node, in input order. A graph with no
    // source at all (a pure cycle) has nothing to drain; every node then
    // falls through to the synthetic layer below, keeping the whole cycle
    // in one rank.
    let mut generation: Vec<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();

    let mut visited = vec![false; nodes.len()];
    for &idx in &generation {
        visited[idx] = true;
    }

    let mut layers: Vec<Vec<NodeId>> = Vec::new();
    while !generation.is_empty() {
        let mut next = Vec::new();
        for &idx in &generation {
            for &succ in &successors[idx] {
                if visited[succ] {
                    continue;
                }
                in_degree[succ] = in_degree[succ].saturating_sub(1);
                if in_degree[succ] == 0 {
                    visited[succ] = true;
                    next.push(succ);
                }
            }
        }
        layers.push(generation.iter().map(|&idx| nodes[idx].id.clone()).collect());
        generation = next;
    }

    // Cycle members unreachable from any source end up here, in input order.
    let leftovers: Vec<NodeId> = (0..nodes.len())
        .filter(|&idx| !visited[idx])
        .map(|idx| nodes[idx].id.clone())
        .collect();
    if !leftovers.is_empty() {
        tracing::debug!(
            count = leftovers.len(),
            "placing cycle remainder in synthetic final layer"
        );
        layers.push(leftovers);
    }

    LayerAssignment::from_layers(layers)
}
