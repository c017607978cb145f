//! Live watch demo: polls a scripted in-memory source and logs each event.
//!
//! Run with: `RUST_LOG=debug cargo run --example live_watch`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use flowsight::events::GraphEvent;
use flowsight::layout::LayoutConfig;
use flowsight::reconciler::{Reconciler, ReconcilerConfig};
use flowsight::snapshot::{EdgeRecord, InstanceSnapshot, NodeRecord};
use flowsight::source::{SnapshotSource, SourceError};
use flowsight::types::{NodeStatus, RunId};

/// Simulates a backend whose run advances one node per poll.
struct AdvancingBackend {
    polls: AtomicUsize,
}

impl AdvancingBackend {
    const STAGES: [&'static str; 4] = ["fetch", "parse", "embed", "store"];
}

#[async_trait]
impl SnapshotSource for AdvancingBackend {
    async fn fetch_snapshot(&self, run: &RunId) -> Result<InstanceSnapshot, SourceError> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst);
        if poll == 2 {
            // One transient failure to show the error path.
            return Err(SourceError::transport("simulated 502"));
        }

        let done = poll.min(Self::STAGES.len());
        let mut snapshot = InstanceSnapshot::new(run.clone());
        for (idx, stage) in Self::STAGES.iter().enumerate() {
            let status = if idx < done {
                NodeStatus::Completed
            } else if idx == done {
                NodeStatus::Running
            } else {
                NodeStatus::Pending
            };
            snapshot = snapshot.with_node(NodeRecord::new(*stage, *stage, status));
        }
        for pair in Self::STAGES.windows(2) {
            snapshot = snapshot.with_edge(EdgeRecord::new(pair[0], pair[1]));
        }
        Ok(snapshot)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .init();

    let backend = AdvancingBackend {
        polls: AtomicUsize::new(0),
    };
    let config = ReconcilerConfig::new(Some(Duration::from_millis(500)), LayoutConfig::default());
    let reconciler = Reconciler::with_config(backend, config);

    let watch = reconciler.watch("demo-run");
    tracing::info!(session = %watch.session_id(), "watching demo-run");

    let mut updates = 0;
    while let Some(event) = watch.events().recv().await {
        match event {
            GraphEvent::Updated(update) => {
                updates += 1;
                let running: Vec<&str> = update
                    .nodes
                    .iter()
                    .filter(|n| n.record.status == NodeStatus::Running)
                    .map(|n| n.id().as_str())
                    .collect();
                tracing::info!(
                    nodes = update.nodes.len(),
                    edges = update.edges.len(),
                    running = ?running,
                    "graph update"
                );
            }
            GraphEvent::FetchFailed(failure) => {
                tracing::warn!(error = %failure.error, "poll failed; keeping last view");
            }
        }
        if updates >= 5 {
            break;
        }
    }

    watch.stop();
    tracing::info!("watch stopped");
}
