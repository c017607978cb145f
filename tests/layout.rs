mod common;

use common::*;
use flowsight::layout::{LayoutConfig, layout, layout_with};
use flowsight::snapshot::NodeRecord;
use flowsight::types::NodeStatus;

#[test]
fn linear_chain_places_one_node_per_layer() {
    let nodes = [node("s"), node("a"), node("b"), node("e")];
    let edges = [edge("s", "a"), edge("a", "b"), edge("b", "e")];

    let view = layout(&nodes, &edges);

    assert_eq!(view.nodes.len(), 4);
    assert_eq!(view.layer_of(&"s".into()), Some(0));
    assert_eq!(view.layer_of(&"a".into()), Some(1));
    assert_eq!(view.layer_of(&"b".into()), Some(2));
    assert_eq!(view.layer_of(&"e".into()), Some(3));
    assert_grid_is_sound(&view);
}

#[test]
fn diamond_shares_the_middle_layer() {
    let nodes = [node("s"), node("a"), node("b"), node("e")];
    let edges = [edge("s", "a"), edge("s", "b"), edge("a", "e"), edge("b", "e")];

    let view = layout(&nodes, &edges);

    assert_eq!(view.layer_of(&"s".into()), Some(0));
    assert_eq!(view.layer_of(&"a".into()), Some(1));
    assert_eq!(view.layer_of(&"b".into()), Some(1));
    assert_eq!(view.layer_of(&"e".into()), Some(2));

    // Two horizontal slots in the shared layer.
    let a = view.node(&"a".into()).unwrap();
    let b = view.node(&"b".into()).unwrap();
    assert_ne!(a.slot, b.slot);
    assert_ne!(a.position.x, b.position.x);
    assert_grid_is_sound(&view);
}

#[test]
fn orphan_node_shares_layer_zero_with_the_source() {
    let nodes = [node("s"), node("a"), node("x")];
    let edges = [edge("s", "a")];

    let view = layout(&nodes, &edges);

    assert_eq!(view.layer_of(&"s".into()), Some(0));
    assert_eq!(view.layer_of(&"x".into()), Some(0));
    assert_eq!(view.layer_of(&"a".into()), Some(1));
    assert_grid_is_sound(&view);
}

#[test]
fn full_cycle_terminates_and_keeps_every_node_and_edge() {
    let nodes = [node("a"), node("b"), node("c")];
    let edges = [edge("a", "b"), edge("b", "c"), edge("c", "a")];

    let view = layout(&nodes, &edges);

    assert_eq!(view.nodes.len(), 3);
    assert_eq!(view.edges.len(), 3);
    // The whole cycle shares one synthetic layer.
    let layers: Vec<usize> = view.nodes.iter().map(|n| n.layer).collect();
    assert_eq!(layers, vec![0, 0, 0]);
    assert_grid_is_sound(&view);
    assert_edges_are_valid(&view);
}

#[test]
fn detached_cycle_lands_in_one_synthetic_layer() {
    let nodes = [node("s"), node("a"), node("x"), node("y"), node("z")];
    let edges = [
        edge("s", "a"),
        edge("x", "y"),
        edge("y", "z"),
        edge("z", "x"),
    ];

    let view = layout(&nodes, &edges);

    let x = view.layer_of(&"x".into()).unwrap();
    assert_eq!(view.layer_of(&"y".into()), Some(x));
    assert_eq!(view.layer_of(&"z".into()), Some(x));
    assert!(x > view.layer_of(&"a".into()).unwrap());
    assert_grid_is_sound(&view);
}

#[test]
fn dangling_edges_are_filtered_not_fatal() {
    let nodes = [node("s"), node("a")];
    let edges = [edge("s", "a"), edge("s", "ghost"), edge("phantom", "a")];

    let view = layout(&nodes, &edges);

    assert_eq!(view.nodes.len(), 2);
    assert_eq!(view.edges.len(), 1);
    assert_edges_are_valid(&view);
}

#[test]
fn node_disconnected_by_filtering_still_gets_a_position() {
    // "a"'s only edge references a missing node; after filtering it is fully
    // disconnected and must land in the first generation.
    let nodes = [node("s"), node("a")];
    let edges = [edge("ghost", "a")];

    let view = layout(&nodes, &edges);

    assert_eq!(view.layer_of(&"a".into()), Some(0));
    assert_eq!(view.layer_of(&"s".into()), Some(0));
}

#[test]
fn empty_inputs_produce_an_empty_view() {
    let view = layout(&[], &[]);
    assert!(view.is_empty());
    assert!(view.edges.is_empty());
}

#[test]
fn layout_is_deterministic_across_calls() {
    let nodes: Vec<NodeRecord> = ["s", "a", "b", "c", "d", "e"].iter().map(|id| node(id)).collect();
    let edges = [
        edge("s", "a"),
        edge("s", "b"),
        edge("a", "c"),
        edge("b", "c"),
        edge("c", "d"),
        edge("c", "e"),
    ];

    let first = layout(&nodes, &edges);
    let second = layout(&nodes, &edges);
    assert_eq!(first, second);
}

#[test]
fn within_layer_order_follows_input_order() {
    // Three sources, no edges: generation 0 must mirror input order exactly.
    let nodes = [node("m"), node("a"), node("z")];
    let view = layout(&nodes, &[]);

    let slots: Vec<(&str, usize)> = view
        .nodes
        .iter()
        .map(|n| (n.id().as_str(), n.slot))
        .collect();
    assert_eq!(slots, vec![("m", 0), ("a", 1), ("z", 2)]);
}

#[test]
fn wide_layers_are_centered_around_the_spine() {
    let nodes = [node("s"), node("a"), node("b"), node("c")];
    let edges = [edge("s", "a"), edge("s", "b"), edge("s", "c")];

    let view = layout(&nodes, &edges);

    let xs: Vec<f64> = ["a", "b", "c"]
        .iter()
        .map(|id| view.node(&(*id).into()).unwrap().position.x)
        .collect();
    // Symmetric around the single-node layer above.
    assert_eq!(xs[0], -xs[2]);
    assert_eq!(xs[1], 0.0);
    assert_eq!(view.node(&"s".into()).unwrap().position.x, 0.0);
}

#[test]
fn custom_spacing_scales_coordinates() {
    let nodes = [node("s"), node("a")];
    let edges = [edge("s", "a")];

    let view = layout_with(&LayoutConfig::new(40.0, 15.0), &nodes, &edges);
    assert_eq!(view.node(&"a".into()).unwrap().position.y, 40.0);
    assert_eq!(view.node(&"s".into()).unwrap().position.y, 0.0);
}

#[test]
fn statuses_ride_along_unchanged() {
    let nodes = [
        node_with_status("s", NodeStatus::Completed),
        node_with_status("a", NodeStatus::Failed),
    ];
    let edges = [edge("s", "a")];

    let view = layout(&nodes, &edges);
    assert_eq!(
        view.node(&"a".into()).unwrap().record.status,
        NodeStatus::Failed
    );
}
