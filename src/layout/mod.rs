//! Deterministic layered layout for execution graphs.
//!
//! The layout engine is the pure half of flowsight: it takes a flat node
//! list and an explicit edge list and produces a positioned, layer-ordered
//! view ready for a rendering surface. It has no I/O, no clock, and no state
//! between calls.
//!
//! # Algorithm
//!
//! 1. Duplicate node ids collapse first-seen-wins and edges referencing
//!    missing endpoints are dropped, with a diagnostic each.
//! 2. Kahn's algorithm runs over the validated edge set, drained in full
//!    generations: each generation becomes one layer, so every node lands
//!    strictly below the predecessors processed before it.
//! 3. Nodes a cycle keeps unreachable are collected into a final synthetic
//!    layer; a graph with no source node at all (a pure cycle) lands there
//!    wholesale. No node is ever dropped.
//! 4. Layer index maps to y, slot index to x, with each layer horizontally
//!    centered by half its own width.
//!
//! Ties within a layer resolve by enqueue order, which is input-order biased
//! and fully deterministic: the same input always produces the same view.
//!
//! # Quick Start
//!
//! ```rust
//! use flowsight::layout::layout;
//! use flowsight::snapshot::{EdgeRecord, NodeRecord};
//! use flowsight::types::NodeStatus;
//!
//! let nodes = vec![
//!     NodeRecord::new("fetch", "Fetch", NodeStatus::Completed),
//!     NodeRecord::new("parse", "Parse", NodeStatus::Running),
//!     NodeRecord::new("store", "Store", NodeStatus::Pending),
//! ];
//! let edges = vec![
//!     EdgeRecord::new("fetch", "parse"),
//!     EdgeRecord::new("parse", "store"),
//! ];
//!
//! let view = layout(&nodes, &edges);
//! assert_eq!(view.layer_of(&"fetch".into()), Some(0));
//! assert_eq!(view.layer_of(&"store".into()), Some(2));
//! ```

mod engine;
mod layers;

#[cfg(feature = "petgraph-compat")]
mod petgraph_compat;

pub use engine::{GraphView, LayoutConfig, Position, PositionedNode, layout, layout_with};
pub use layers::{LayerAssignment, assign_layers};

#[cfg(feature = "petgraph-compat")]
pub use petgraph_compat::{FlowDiGraph, NodeIndexMap, PetgraphConversion, is_cyclic, to_dot, to_petgraph};

pub(crate) use engine::filter_edges;
