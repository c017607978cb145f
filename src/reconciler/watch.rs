//! Watch lifecycle: the polling loop, tick coalescing, and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use super::diff::{self, IdentitySets, SnapshotDelta};
use super::session::{PollSession, SessionPhase};
use crate::events::{FetchFailure, GraphEvent, GraphUpdate, UpdateStream};
use crate::layout::{LayoutConfig, layout_with};
use crate::snapshot::InstanceSnapshot;
use crate::source::SnapshotSource;
use crate::types::RunId;

/// Configuration for a [`Reconciler`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use flowsight::layout::LayoutConfig;
/// use flowsight::reconciler::ReconcilerConfig;
///
/// // Defaults: 3000 ms polls (or FLOWSIGHT_POLL_INTERVAL_MS), default spacing.
/// let config = ReconcilerConfig::default();
///
/// let fast = ReconcilerConfig::new(Some(Duration::from_millis(500)), LayoutConfig::default());
/// assert_eq!(fast.poll_interval, Duration::from_millis(500));
/// ```
#[derive(Clone, Debug)]
pub struct ReconcilerConfig {
    /// Fixed interval between polls while a watch is enabled.
    pub poll_interval: Duration,
    /// Spacing handed to every layout pass.
    pub layout: LayoutConfig,
}

impl ReconcilerConfig {
    /// Default poll interval when neither a value nor the environment
    /// overrides it.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

    /// Creates a config; a `None` interval resolves through the
    /// `FLOWSIGHT_POLL_INTERVAL_MS` environment variable, then the default.
    #[must_use]
    pub fn new(poll_interval: Option<Duration>, layout: LayoutConfig) -> Self {
        Self {
            poll_interval: Self::resolve_poll_interval(poll_interval),
            layout,
        }
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Overrides the layout spacing.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    fn resolve_poll_interval(provided: Option<Duration>) -> Duration {
        if let Some(interval) = provided {
            return interval;
        }
        dotenvy::dotenv().ok();
        std::env::var("FLOWSIGHT_POLL_INTERVAL_MS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(Self::DEFAULT_POLL_INTERVAL)
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new(None, LayoutConfig::default())
    }
}

/// Keeps rendered graphs consistent with a polled execution-status source.
///
/// A reconciler owns a [`SnapshotSource`] and a config; every
/// [`watch`](Self::watch) call spawns an independent polling loop with its
/// own [`PollSession`]. Watches of the same run do not share sessions or
/// coalesce requests across each other.
///
/// # Examples
///
/// ```rust,no_run
/// use flowsight::reconciler::Reconciler;
/// # use async_trait::async_trait;
/// # use flowsight::snapshot::InstanceSnapshot;
/// # use flowsight::source::{SnapshotSource, SourceError};
/// # use flowsight::types::RunId;
/// # struct Backend;
/// # #[async_trait]
/// # impl SnapshotSource for Backend {
/// #     async fn fetch_snapshot(&self, run: &RunId) -> Result<InstanceSnapshot, SourceError> {
/// #         Ok(InstanceSnapshot::new(run.clone()))
/// #     }
/// # }
///
/// # async fn example() {
/// let reconciler = Reconciler::new(Backend);
/// let watch = reconciler.watch("run-42");
///
/// while let Some(event) = watch.events().recv().await {
///     if let Some(update) = event.as_update() {
///         println!("{} nodes positioned", update.nodes.len());
///     }
/// }
/// watch.stop();
/// # }
/// ```
pub struct Reconciler<S> {
    source: Arc<S>,
    config: ReconcilerConfig,
}

impl<S: SnapshotSource + 'static> Reconciler<S> {
    /// Creates a reconciler with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReconcilerConfig::default())
    }

    /// Creates a reconciler with an explicit configuration.
    pub fn with_config(source: S, config: ReconcilerConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Starts a live watch on a run.
    ///
    /// The first fetch is issued immediately; subsequent fetches follow the
    /// configured interval. Must be called within a tokio runtime: the
    /// polling loop runs as a spawned task until [`WatchHandle::stop`] is
    /// called or the handle is dropped.
    pub fn watch(&self, run: impl Into<RunId>) -> WatchHandle {
        self.spawn_watch(run.into(), self.config.clone())
    }

    /// Starts a live watch with a poll interval overriding the configured
    /// one, for consumers that need a different cadence per run.
    pub fn watch_with_interval(&self, run: impl Into<RunId>, poll_interval: Duration) -> WatchHandle {
        self.spawn_watch(run.into(), self.config.clone().with_poll_interval(poll_interval))
    }

    fn spawn_watch(&self, run: RunId, config: ReconcilerConfig) -> WatchHandle {
        let session = Arc::new(Mutex::new(PollSession::new(run.clone())));
        let enabled = Arc::new(AtomicBool::new(true));
        let refresh = Arc::new(Notify::new());
        let (event_tx, event_rx) = flume::unbounded();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tracing::debug!(
            run = %run,
            session = %session.lock().id(),
            interval_ms = config.poll_interval.as_millis() as u64,
            "starting watch"
        );

        tokio::spawn(poll_loop(
            Arc::clone(&self.source),
            config,
            Arc::clone(&session),
            Arc::clone(&enabled),
            Arc::clone(&refresh),
            event_tx,
            shutdown_rx,
        ));

        WatchHandle {
            session,
            enabled,
            refresh,
            shutdown: Mutex::new(Some(shutdown_tx)),
            events: UpdateStream::new(event_rx),
        }
    }
}

/// Handle to one live watch.
///
/// Dropping the handle stops the watch: the poll timer is cancelled and any
/// in-flight fetch result is discarded instead of published. A leaked timer
/// is a correctness bug, not just a performance one, so teardown is not
/// optional.
pub struct WatchHandle {
    session: Arc<Mutex<PollSession>>,
    enabled: Arc<AtomicBool>,
    refresh: Arc<Notify>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    events: UpdateStream,
}

impl WatchHandle {
    /// The run this watch polls.
    #[must_use]
    pub fn run(&self) -> RunId {
        self.session.lock().run().clone()
    }

    /// Unique id of the underlying session.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session.lock().id()
    }

    /// Current lifecycle phase of the underlying session.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.lock().phase()
    }

    /// Returns `true` once the watch has been stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        !self.enabled.load(Ordering::SeqCst)
    }

    /// The event stream this watch publishes to.
    #[must_use]
    pub fn events(&self) -> &UpdateStream {
        &self.events
    }

    /// Requests an immediate poll, outside the fixed schedule.
    ///
    /// Coalesces with an in-flight fetch: at most one follow-up poll is
    /// pending at a time. No-op on a stopped watch.
    pub fn refresh(&self) {
        if self.enabled.load(Ordering::SeqCst) {
            self.refresh.notify_one();
        }
    }

    /// Stops the watch.
    ///
    /// Synchronously cancels the poll timer and disables the session, so no
    /// further fetch is issued and an in-flight fetch's result is discarded
    /// before publishing. Idempotent: stopping twice is a no-op.
    pub fn stop(&self) {
        if !self.enabled.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut session = self.session.lock();
        session.disable();
        tracing::debug!(run = %session.run(), session = %session.id(), "watch stopped");
        drop(session);
        if let Some(shutdown) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<S: SnapshotSource>(
    source: Arc<S>,
    config: ReconcilerConfig,
    session: Arc<Mutex<PollSession>>,
    enabled: Arc<AtomicBool>,
    refresh: Arc<Notify>,
    events: flume::Sender<GraphEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    // Ticks that elapse while a fetch is in flight are coalesced, not queued.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = refresh.notified() => {
                if !poll_once(&source, &config, &session, &enabled, &events).await {
                    break;
                }
            }
            _ = ticker.tick() => {
                if !poll_once(&source, &config, &session, &enabled, &events).await {
                    break;
                }
            }
        }
    }
}

/// Runs one fetch-and-apply cycle. Returns `false` when the loop should end.
async fn poll_once<S: SnapshotSource>(
    source: &Arc<S>,
    config: &ReconcilerConfig,
    session: &Mutex<PollSession>,
    enabled: &AtomicBool,
    events: &flume::Sender<GraphEvent>,
) -> bool {
    if !enabled.load(Ordering::SeqCst) {
        return false;
    }

    let (run, seq) = {
        let mut session = session.lock();
        let seq = session.begin_fetch();
        (session.run().clone(), seq)
    };
    tracing::trace!(run = %run, seq, "fetching snapshot");

    let outcome = source.fetch_snapshot(&run).await;
    session.lock().finish_fetch();

    // Liveness check: a stop() issued while the fetch was in flight wins.
    if !enabled.load(Ordering::SeqCst) {
        tracing::debug!(run = %run, seq, "discarding fetch result for disabled session");
        return false;
    }

    let event = match outcome {
        Ok(snapshot) => apply_snapshot(config, session, snapshot),
        Err(error) => {
            tracing::warn!(
                run = %run,
                seq,
                error = %error,
                "snapshot fetch failed; keeping last good view"
            );
            Some(GraphEvent::FetchFailed(FetchFailure {
                run: run.clone(),
                error: error.to_string(),
                at: Utc::now(),
            }))
        }
    };

    if let Some(event) = event
        && events.send(event).is_err()
    {
        // Every receiver is gone; polling for nobody would leak the timer.
        tracing::debug!(run = %run, "all event receivers dropped; stopping watch");
        enabled.store(false, Ordering::SeqCst);
        session.lock().disable();
        return false;
    }

    true
}

/// Applies a fetched snapshot to the session, returning the event to
/// publish, if any.
fn apply_snapshot(
    config: &ReconcilerConfig,
    session: &Mutex<PollSession>,
    snapshot: InstanceSnapshot,
) -> Option<GraphEvent> {
    let snapshot = snapshot.deduplicated();
    let next = IdentitySets::of(&snapshot);

    let mut session = session.lock();
    let delta = diff::classify(session.seen.as_ref(), session.view.as_ref(), &snapshot, &next);

    let view = match (delta, session.view.as_ref()) {
        (SnapshotDelta::Unchanged, _) => {
            tracing::trace!(run = %snapshot.run_id, "snapshot unchanged; nothing to publish");
            return None;
        }
        (SnapshotDelta::Refreshed, Some(prev)) => diff::patch(prev, &snapshot),
        // First snapshot or membership change: full layout pass.
        _ => layout_with(&config.layout, &snapshot.nodes, &snapshot.edges),
    };

    session.seen = Some(next);
    session.view = Some(view.clone());
    drop(session);

    tracing::debug!(
        run = %snapshot.run_id,
        nodes = view.nodes.len(),
        edges = view.edges.len(),
        "publishing graph update"
    );
    Some(GraphEvent::Updated(GraphUpdate {
        run: snapshot.run_id,
        nodes: view.nodes,
        edges: view.edges,
        at: Utc::now(),
    }))
}
