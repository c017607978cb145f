//! Core identity and status types for execution graphs.
//!
//! This module defines the fundamental types used throughout flowsight for
//! identifying runs and nodes and for describing per-node execution status.
//! These are the core domain concepts that define what a run view *is*.
//!
//! # Key Types
//!
//! - [`RunId`]: Identifies one workflow execution run
//! - [`NodeId`]: Identifies a node within a run's snapshot
//! - [`NodeStatus`]: Fixed enumeration of per-node execution states
//!
//! # Examples
//!
//! ```rust
//! use flowsight::types::{NodeId, NodeStatus, RunId};
//!
//! let run: RunId = "run-42".into();
//! let node = NodeId::new("extract");
//!
//! // Wire statuses decode leniently; unknown strings never fail.
//! assert_eq!(NodeStatus::parse("running"), NodeStatus::Running);
//! assert_eq!(NodeStatus::parse("???"), NodeStatus::Unknown);
//!
//! println!("{run}/{node}");
//! ```

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one workflow execution run.
///
/// `RunId` is an opaque string handed out by the execution backend. It is
/// never parsed; flowsight only compares, clones, and displays it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Creates a run id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifies a node within one snapshot of a run.
///
/// Uniqueness is only guaranteed within a single deduplicated snapshot;
/// duplicate ids arriving from the backend are collapsed first-seen-wins by
/// [`InstanceSnapshot::deduplicated`](crate::snapshot::InstanceSnapshot::deduplicated).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Execution status of a single node within a run.
///
/// The set is closed on purpose: anything the backend reports outside the
/// five concrete states decodes to [`Unknown`](Self::Unknown) rather than
/// failing the whole snapshot. Status changes on their own never move a node
/// on screen; see the reconciler's change detection.
///
/// # Examples
///
/// ```rust
/// use flowsight::types::NodeStatus;
///
/// assert_eq!(NodeStatus::parse("completed"), NodeStatus::Completed);
/// assert_eq!(NodeStatus::Completed.as_str(), "completed");
/// assert!(NodeStatus::Failed.is_terminal());
/// assert!(!NodeStatus::Running.is_terminal());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    /// Queued, not yet picked up by a worker.
    #[default]
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Stopped before completion by an operator or a parent run.
    Cancelled,
    /// Reported by the backend but not recognized by this client.
    Unknown,
}

impl NodeStatus {
    /// Canonical wire form of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "pending",
            NodeStatus::Running => "running",
            NodeStatus::Completed => "completed",
            NodeStatus::Failed => "failed",
            NodeStatus::Cancelled => "cancelled",
            NodeStatus::Unknown => "unknown",
        }
    }

    /// Decode a wire status string.
    ///
    /// Unrecognized values fall back to [`Unknown`](Self::Unknown) for
    /// forward compatibility; a snapshot is never rejected over a status
    /// string this client has not seen before.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => NodeStatus::Pending,
            "running" => NodeStatus::Running,
            "completed" => NodeStatus::Completed,
            "failed" => NodeStatus::Failed,
            "cancelled" => NodeStatus::Cancelled,
            _ => NodeStatus::Unknown,
        }
    }

    /// Returns `true` once the node can no longer change state on its own.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeStatus::Completed | NodeStatus::Failed | NodeStatus::Cancelled
        )
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for NodeStatus {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for NodeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
