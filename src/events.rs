//! Events published by a watch, and the stream consumers read them from.
//!
//! A watch talks to its consumer over a single channel of [`GraphEvent`]s:
//! a graph update carrying fresh positioned arrays, or a fetch failure the
//! consumer may surface as a passive indicator. The reconciler performs no
//! rendering itself.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, Stream};

use crate::layout::PositionedNode;
use crate::snapshot::EdgeRecord;
use crate::types::RunId;

/// One message from a watch to its consumer.
#[derive(Clone, Debug)]
pub enum GraphEvent {
    /// The positioned graph changed; replace what is on screen.
    Updated(GraphUpdate),
    /// A poll failed; the previous graph is still valid and still shown.
    FetchFailed(FetchFailure),
}

impl GraphEvent {
    /// The run this event belongs to.
    #[must_use]
    pub fn run(&self) -> &RunId {
        match self {
            GraphEvent::Updated(update) => &update.run,
            GraphEvent::FetchFailed(failure) => &failure.run,
        }
    }

    /// Returns the update payload, if this is an update.
    #[must_use]
    pub fn as_update(&self) -> Option<&GraphUpdate> {
        match self {
            GraphEvent::Updated(update) => Some(update),
            GraphEvent::FetchFailed(_) => None,
        }
    }

    /// Returns the failure payload, if this is a failure.
    #[must_use]
    pub fn as_failure(&self) -> Option<&FetchFailure> {
        match self {
            GraphEvent::Updated(_) => None,
            GraphEvent::FetchFailed(failure) => Some(failure),
        }
    }
}

/// A fresh positioned graph for one run.
#[derive(Clone, Debug)]
pub struct GraphUpdate {
    /// The run the graph belongs to.
    pub run: RunId,
    /// Positioned nodes, layer by layer.
    pub nodes: Vec<PositionedNode>,
    /// Validated edges.
    pub edges: Vec<EdgeRecord>,
    /// When the reconciler published this update.
    pub at: DateTime<Utc>,
}

/// A failed poll attempt.
///
/// Deliberately does not carry a graph: failures never clear what is on
/// screen.
#[derive(Clone, Debug)]
pub struct FetchFailure {
    /// The run whose poll failed.
    pub run: RunId,
    /// Human-readable error description.
    pub error: String,
    /// When the failure was observed.
    pub at: DateTime<Utc>,
}

/// Consumer side of a watch's event channel.
///
/// All receive methods take `&self`, so a stream can be polled from a
/// consumer that also holds the watch handle. Cloning shares the underlying
/// queue: each event is delivered to exactly one receiver, not broadcast.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example(stream: &flowsight::events::UpdateStream) {
/// while let Some(event) = stream.recv().await {
///     match event {
///         flowsight::events::GraphEvent::Updated(update) => {
///             println!("{} nodes", update.nodes.len());
///         }
///         flowsight::events::GraphEvent::FetchFailed(failure) => {
///             eprintln!("poll failed: {}", failure.error);
///         }
///     }
/// }
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct UpdateStream {
    receiver: flume::Receiver<GraphEvent>,
}

impl UpdateStream {
    pub(crate) fn new(receiver: flume::Receiver<GraphEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event. Returns `None` once the watch has shut
    /// down and the channel is drained.
    pub async fn recv(&self) -> Option<GraphEvent> {
        self.receiver.recv_async().await.ok()
    }

    /// Returns an already-queued event without waiting.
    #[must_use]
    pub fn try_recv(&self) -> Option<GraphEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next event, giving up after `duration`.
    pub async fn next_timeout(&self, duration: Duration) -> Option<GraphEvent> {
        tokio::time::timeout(duration, self.recv()).await.ok().flatten()
    }

    /// Converts the stream into a `futures` [`Stream`] of events.
    pub fn into_async_stream(self) -> impl Stream<Item = GraphEvent> {
        stream::unfold(self, |updates| async move {
            updates.recv().await.map(|event| (event, updates))
        })
    }

    /// Number of events queued and not yet received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` when no events are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
