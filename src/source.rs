//! The execution-status provider seam.
//!
//! The reconciler never talks to a transport directly; it pulls snapshots
//! through [`SnapshotSource`]. Production implementations wrap an HTTP
//! client, tests use scripted in-memory sources, and the reconciler cannot
//! tell the difference.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::snapshot::InstanceSnapshot;
use crate::types::RunId;

/// Provides point-in-time snapshots of a run's execution state.
///
/// Implementations should be cheap to call repeatedly: the reconciler polls
/// on a fixed interval and issues at most one fetch at a time per watch.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use flowsight::snapshot::InstanceSnapshot;
/// use flowsight::source::{SnapshotSource, SourceError};
/// use flowsight::types::RunId;
///
/// struct StaticSource;
///
/// #[async_trait]
/// impl SnapshotSource for StaticSource {
///     async fn fetch_snapshot(&self, run: &RunId) -> Result<InstanceSnapshot, SourceError> {
///         Ok(InstanceSnapshot::new(run.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the current snapshot for a run.
    async fn fetch_snapshot(&self, run: &RunId) -> Result<InstanceSnapshot, SourceError>;
}

#[async_trait]
impl<S: SnapshotSource + ?Sized> SnapshotSource for Arc<S> {
    async fn fetch_snapshot(&self, run: &RunId) -> Result<InstanceSnapshot, SourceError> {
        (**self).fetch_snapshot(run).await
    }
}

/// Errors a snapshot source can report.
///
/// Transport failures are expected steady-state events: the reconciler
/// surfaces them to consumers and keeps polling with the last good view on
/// screen.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The transport failed (connection refused, timeout, 5xx, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend does not know this run.
    #[error("run {0} not found")]
    NotFound(RunId),

    /// The response arrived but could not be decoded.
    #[error("malformed snapshot payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    /// Convenience constructor for transport-level failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
