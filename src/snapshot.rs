//! Wire-facing snapshot records and identity-based deduplication.
//!
//! An [`InstanceSnapshot`] is one fetched, point-in-time view of a run: a
//! flat list of [`NodeRecord`]s plus an explicit [`EdgeRecord`] list.
//! Snapshots are versionless; the only consistency mechanism is identity.
//! Backends occasionally surface pagination or replication artifacts as
//! repeated records, so every snapshot passes through
//! [`InstanceSnapshot::deduplicated`] before anything downstream sees it.
//!
//! Records are immutable once received: a new snapshot replaces the previous
//! one wholesale, it is never merged field-by-field.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{NodeId, NodeStatus, RunId};

/// Ownership-free bag of execution metadata attached to a node record.
///
/// Everything here is informational: the layout engine never reads it, and
/// the reconciler only carries it through to consumers. Fields the backend
/// omits decode to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeMeta {
    /// When the node started executing, if it has.
    pub started_at: Option<DateTime<Utc>>,
    /// When the node reached a terminal status, if it has.
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of retry attempts consumed so far.
    pub retries: u32,
    /// Input payload handed to the node, verbatim.
    pub input: Option<Value>,
    /// Output payload produced by the node, verbatim.
    pub output: Option<Value>,
    /// Identifiers of spawned sub-tasks, in backend order.
    pub subtasks: Vec<String>,
}

/// One node of a run snapshot.
///
/// # Examples
///
/// ```rust
/// use flowsight::snapshot::NodeRecord;
/// use flowsight::types::NodeStatus;
///
/// let record = NodeRecord::new("extract", "Extract documents", NodeStatus::Running);
/// assert_eq!(record.id.as_str(), "extract");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Opaque identity, unique within a deduplicated snapshot.
    pub id: NodeId,
    /// Human-readable display name.
    pub name: String,
    /// Current execution status.
    pub status: NodeStatus,
    /// Execution metadata; see [`NodeMeta`].
    #[serde(default)]
    pub meta: NodeMeta,
}

impl NodeRecord {
    /// Creates a record with empty metadata.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, status: NodeStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            meta: NodeMeta::default(),
        }
    }

    /// Attaches execution metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: NodeMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Replaces the status, keeping everything else.
    #[must_use]
    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }
}

/// Classifies how a connection was produced by the workflow definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Unconditional structural connection.
    #[default]
    Normal,
    /// Connection taken only when a routing predicate selected it.
    Conditional,
}

/// A directed connection between two nodes of a snapshot.
///
/// An edge is invalid, and is dropped during layout, if either endpoint id
/// does not exist in the snapshot's node set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Connection classifier; defaults to [`EdgeKind::Normal`].
    #[serde(default)]
    pub kind: EdgeKind,
    /// Optional display label (e.g. a branch condition).
    #[serde(default)]
    pub label: Option<String>,
}

impl EdgeRecord {
    /// Creates a normal, unlabeled edge.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Normal,
            label: None,
        }
    }

    /// Sets the connection classifier.
    #[must_use]
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The `(source, target)` pair that defines this edge's identity.
    #[must_use]
    pub fn identity(&self) -> (&NodeId, &NodeId) {
        (&self.source, &self.target)
    }
}

/// A point-in-time view of one run: nodes, edges, and the run they belong to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    /// The execution run these records belong to.
    pub run_id: RunId,
    /// Flat node list, in backend response order.
    pub nodes: Vec<NodeRecord>,
    /// Explicit edge list, in backend response order.
    pub edges: Vec<EdgeRecord>,
}

impl InstanceSnapshot {
    /// Creates an empty snapshot for a run.
    pub fn new(run_id: impl Into<RunId>) -> Self {
        Self {
            run_id: run_id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node record.
    #[must_use]
    pub fn with_node(mut self, node: NodeRecord) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge record.
    #[must_use]
    pub fn with_edge(mut self, edge: EdgeRecord) -> Self {
        self.edges.push(edge);
        self
    }

    /// Collapses duplicate node and edge identities, first-seen wins.
    ///
    /// Nodes are keyed by id, edges by `(source, target)`. Each collapsed
    /// record emits a `tracing` warning so replication artifacts stay
    /// visible in logs without ever failing a refresh. Response order of the
    /// surviving records is preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flowsight::snapshot::{InstanceSnapshot, NodeRecord};
    /// use flowsight::types::NodeStatus;
    ///
    /// let snapshot = InstanceSnapshot::new("run-1")
    ///     .with_node(NodeRecord::new("a", "first copy", NodeStatus::Running))
    ///     .with_node(NodeRecord::new("a", "second copy", NodeStatus::Failed))
    ///     .deduplicated();
    ///
    /// assert_eq!(snapshot.nodes.len(), 1);
    /// assert_eq!(snapshot.nodes[0].name, "first copy");
    /// ```
    #[must_use]
    pub fn deduplicated(self) -> Self {
        let mut seen_nodes: FxHashSet<NodeId> = FxHashSet::default();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for record in self.nodes {
            if seen_nodes.insert(record.id.clone()) {
                nodes.push(record);
            } else {
                tracing::warn!(
                    run = %self.run_id,
                    node = %record.id,
                    "dropping duplicate node record (first-seen wins)"
                );
            }
        }

        let mut seen_edges: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
        let mut edges = Vec::with_capacity(self.edges.len());
        for edge in self.edges {
            if seen_edges.insert((edge.source.clone(), edge.target.clone())) {
                edges.push(edge);
            } else {
                tracing::warn!(
                    run = %self.run_id,
                    source = %edge.source,
                    target = %edge.target,
                    "dropping duplicate edge record (first-seen wins)"
                );
            }
        }

        Self {
            run_id: self.run_id,
            nodes,
            edges,
        }
    }
}
