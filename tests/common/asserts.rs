//! Shared assertions over layout output.

use rustc_hash::FxHashSet;

use flowsight::layout::GraphView;

/// Asserts that no two nodes share a `(layer, slot)` cell and every
/// coordinate is finite.
pub fn assert_grid_is_sound(view: &GraphView) {
    let mut cells: FxHashSet<(usize, usize)> = FxHashSet::default();
    for node in &view.nodes {
        assert!(
            cells.insert((node.layer, node.slot)),
            "two nodes share cell ({}, {})",
            node.layer,
            node.slot
        );
        assert!(
            node.position.x.is_finite() && node.position.y.is_finite(),
            "non-finite coordinate for {}",
            node.id()
        );
    }
}

/// Asserts that every edge in the view references positioned nodes.
pub fn assert_edges_are_valid(view: &GraphView) {
    let ids: FxHashSet<_> = view.nodes.iter().map(|node| node.id().clone()).collect();
    for edge in &view.edges {
        assert!(
            ids.contains(&edge.source) && ids.contains(&edge.target),
            "edge {} -> {} references a missing node",
            edge.source,
            edge.target
        );
    }
}
