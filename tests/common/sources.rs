//! Scripted snapshot sources for reconciler tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use flowsight::snapshot::InstanceSnapshot;
use flowsight::source::{SnapshotSource, SourceError};
use flowsight::types::RunId;

/// One scripted response.
#[derive(Clone, Debug)]
pub enum Scripted {
    Snapshot(InstanceSnapshot),
    Fail(String),
}

/// Replays a fixed script of responses; once exhausted, the final entry
/// repeats forever. Counts every fetch.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Scripted {
        if let Some(entry) = self.script.lock().pop_front() {
            *self.last.lock() = Some(entry.clone());
            return entry;
        }
        self.last
            .lock()
            .clone()
            .expect("scripted source polled with an empty script")
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshot(&self, _run: &RunId) -> Result<InstanceSnapshot, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next() {
            Scripted::Snapshot(snapshot) => Ok(snapshot),
            Scripted::Fail(message) => Err(SourceError::transport(message)),
        }
    }
}

/// Counts fetches and then never resolves.
pub struct PendingSource {
    calls: AtomicUsize,
}

impl PendingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for PendingSource {
    async fn fetch_snapshot(&self, _run: &RunId) -> Result<InstanceSnapshot, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures_util::future::pending::<()>().await;
        unreachable!("pending source never resolves");
    }
}

/// Blocks every fetch until released, then returns the configured snapshot.
///
/// Lets a test hold a fetch in flight, act (e.g. stop the watch), and only
/// then let the response land.
pub struct GatedSource {
    snapshot: InstanceSnapshot,
    gate: Notify,
    entered: Notify,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn new(snapshot: InstanceSnapshot) -> Arc<Self> {
        Arc::new(Self {
            snapshot,
            gate: Notify::new(),
            entered: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    /// Lets the currently blocked fetch (or the next one) proceed.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Waits until a fetch has started and is blocked on the gate.
    pub async fn wait_for_fetch(&self) {
        self.entered.notified().await;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for GatedSource {
    async fn fetch_snapshot(&self, _run: &RunId) -> Result<InstanceSnapshot, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(self.snapshot.clone())
    }
}
