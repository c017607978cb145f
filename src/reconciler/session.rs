//! Per-watch session state.
//!
//! A [`PollSession`] is the process-local record of one live watch: its
//! lifecycle phase, a fetch sequence counter for diagnostics, the identity
//! sets used for change detection, and the last published view. Each
//! `watch()` call creates a fresh session; `Disabled` is terminal.

use uuid::Uuid;

use super::diff::IdentitySets;
use crate::layout::GraphView;
use crate::types::RunId;

/// Lifecycle phase of a poll session.
///
/// Transitions: `Idle → Fetching` on a tick, refresh request, or initial
/// mount; `Fetching → Idle` when the response lands; `→ Disabled` when the
/// consumer stops watching. No transition leaves `Disabled`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Between polls; the timer is armed.
    #[default]
    Idle,
    /// A fetch is in flight. At most one per session.
    Fetching,
    /// Terminal: the consumer stopped watching and the timer is cancelled.
    Disabled,
}

/// Process-local state for one watched run.
#[derive(Debug)]
pub struct PollSession {
    id: Uuid,
    run: RunId,
    phase: SessionPhase,
    fetch_seq: u64,
    /// Identity sets of the last applied snapshot, used for diffing.
    pub(crate) seen: Option<IdentitySets>,
    /// Last published positioned view, kept across failed polls.
    pub(crate) view: Option<GraphView>,
}

impl PollSession {
    pub(crate) fn new(run: RunId) -> Self {
        Self {
            id: Uuid::new_v4(),
            run,
            phase: SessionPhase::default(),
            fetch_seq: 0,
            seen: None,
            view: None,
        }
    }

    /// Unique id of this session, fresh per `watch()` call.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The run this session polls.
    #[must_use]
    pub fn run(&self) -> &RunId {
        &self.run
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns `true` once the session has been stopped.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.phase == SessionPhase::Disabled
    }

    /// Marks a fetch as started and returns its sequence number.
    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.phase = SessionPhase::Fetching;
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Marks the in-flight fetch as finished.
    ///
    /// A session disabled mid-fetch stays disabled.
    pub(crate) fn finish_fetch(&mut self) {
        if self.phase == SessionPhase::Fetching {
            self.phase = SessionPhase::Idle;
        }
    }

    /// Moves the session to its terminal phase.
    pub(crate) fn disable(&mut self) {
        self.phase = SessionPhase::Disabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_sequence_increments_per_begin() {
        let mut session = PollSession::new("r".into());
        assert_eq!(session.begin_fetch(), 1);
        session.finish_fetch();
        assert_eq!(session.begin_fetch(), 2);
    }

    #[test]
    fn disabled_is_terminal_across_fetch_completion() {
        let mut session = PollSession::new("r".into());
        session.begin_fetch();
        session.disable();
        session.finish_fetch();
        assert!(session.is_disabled());
    }
}
