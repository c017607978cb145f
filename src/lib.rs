//! # Flowsight: Execution-Graph Synthesis for Workflow Run Views
//!
//! Flowsight turns a flat list of workflow-node execution records plus their
//! explicit edge list into a renderable, non-overlapping, layer-ordered
//! directed graph, and keeps that derived graph consistent with a live,
//! polled execution-status feed without duplicate or stale visual state.
//!
//! Two cooperating components form the core:
//!
//! - **Layout engine** ([`layout`]) — a pure function from raw node and edge
//!   records to a positioned view. No I/O, no clock, no state between calls.
//! - **Reconciler** ([`reconciler`]) — a stateful component owning a polling
//!   loop per watched run: it deduplicates incoming records, re-runs layout
//!   only when graph membership actually changed, and exposes cancellation
//!   so a consumer never leaks timers or receives updates after teardown.
//!
//! Rendering is somebody else's job: flowsight hands its consumer positioned
//! node arrays, validated edge arrays, and per-node status, nothing more.
//!
//! ## Laying out a graph
//!
//! ```rust
//! use flowsight::layout::layout;
//! use flowsight::snapshot::{EdgeRecord, NodeRecord};
//! use flowsight::types::NodeStatus;
//!
//! let nodes = vec![
//!     NodeRecord::new("s", "Seed", NodeStatus::Completed),
//!     NodeRecord::new("a", "Branch A", NodeStatus::Running),
//!     NodeRecord::new("b", "Branch B", NodeStatus::Running),
//!     NodeRecord::new("e", "Join", NodeStatus::Pending),
//! ];
//! let edges = vec![
//!     EdgeRecord::new("s", "a"),
//!     EdgeRecord::new("s", "b"),
//!     EdgeRecord::new("a", "e"),
//!     EdgeRecord::new("b", "e"),
//! ];
//!
//! let view = layout(&nodes, &edges);
//! assert_eq!(view.nodes.len(), 4);
//! assert_eq!(view.layer_of(&"a".into()), view.layer_of(&"b".into()));
//! ```
//!
//! The engine never fails: dangling edges are filtered, duplicate ids
//! collapse first-seen-wins, and cycles fall back to synthetic layers so no
//! node is ever silently dropped.
//!
//! ## Watching a run live
//!
//! ```rust,no_run
//! use flowsight::reconciler::Reconciler;
//! # use async_trait::async_trait;
//! # use flowsight::snapshot::InstanceSnapshot;
//! # use flowsight::source::{SnapshotSource, SourceError};
//! # use flowsight::types::RunId;
//! # struct Backend;
//! # #[async_trait]
//! # impl SnapshotSource for Backend {
//! #     async fn fetch_snapshot(&self, run: &RunId) -> Result<InstanceSnapshot, SourceError> {
//! #         Ok(InstanceSnapshot::new(run.clone()))
//! #     }
//! # }
//!
//! # async fn example() {
//! let reconciler = Reconciler::new(Backend);
//! let watch = reconciler.watch("run-42");
//!
//! while let Some(event) = watch.events().recv().await {
//!     match event {
//!         // Hand the positioned arrays to the rendering surface.
//!         flowsight::events::GraphEvent::Updated(update) => {
//!             println!("render {} nodes", update.nodes.len());
//!         }
//!         // Passive indicator only; the last good graph stays on screen.
//!         flowsight::events::GraphEvent::FetchFailed(failure) => {
//!             eprintln!("poll failed: {}", failure.error);
//!         }
//!     }
//! }
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Run/node identities and the status enumeration
//! - [`snapshot`] - Wire-facing records and identity deduplication
//! - [`layout`] - Deterministic layered layout (the pure half)
//! - [`reconciler`] - Polling loop, change detection, watch lifecycle
//! - [`events`] - Events a watch publishes and the stream they arrive on
//! - [`source`] - The execution-status provider seam

pub mod events;
pub mod layout;
pub mod reconciler;
pub mod snapshot;
pub mod source;
pub mod types;

pub use layout::{GraphView, layout, layout_with};
pub use reconciler::{Reconciler, WatchHandle};
