//! The live graph reconciler: polling, dedup, change detection, lifecycle.
//!
//! A [`Reconciler`] keeps a rendered execution graph consistent with a
//! remote, polled status source while shielding both the layout engine and
//! the rendering surface from duplicate, stale, or overlapping updates.
//!
//! # Lifecycle
//!
//! Each [`Reconciler::watch`] call creates a fresh [`PollSession`] and
//! spawns one polling task. The session moves `Idle → Fetching` on the
//! initial mount, a timer tick, or an explicit [`WatchHandle::refresh`];
//! back to `Idle` when the response lands; and to terminal `Disabled` on
//! [`WatchHandle::stop`] or handle drop. At most one fetch is in flight per
//! session: ticks that elapse mid-fetch are skipped, not queued, so a stale
//! response can never overwrite a newer snapshot.
//!
//! # Consistency
//!
//! Fetched snapshots are deduplicated first-seen-wins, then classified
//! against the previous one. Only a membership change re-runs the layout
//! engine; a pure status change patches records into the existing positioned
//! view, so nodes never jump merely because their status advanced. A failed
//! poll keeps the last good view and polling continues on schedule.
//!
//! # Quick Start
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
//! if let Some(event) = watch.events().recv().await {
//!     println!("first event for {}", event.run());
//! }
//!
//! watch.stop(); // idempotent; also implied by dropping the handle
//! # }
//! ```

mod diff;
mod session;
mod watch;

pub use session::{PollSession, SessionPhase};
pub use watch::{Reconciler, ReconcilerConfig, WatchHandle};
