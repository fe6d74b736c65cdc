//! Poll orchestration: fetch, parse, project.
//!
//! Each call to [`Poller::poll`] walks `Idle -> Fetching -> Parsing ->
//! Projecting -> Idle` while holding the metric store lock, so concurrent
//! scrapes are serialized and readers never see a half-applied report.

use crate::metrics::{MetricState, MetricStore};
use crate::protocol::ReportSource;
use crate::report::{apply, parse};
use std::fmt;
use std::sync::Arc;

/// Report text used when the NIS could not be reached.
pub const COMM_LOST_REPORT: &str = "STATUS: COMMLOST";

/// Stage of a poll in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// No poll running.
    Idle,
    /// Waiting on the report source.
    Fetching,
    /// Splitting report text into fields.
    Parsing,
    /// Converting fields into metric values.
    Projecting,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollPhase::Idle => "idle",
            PollPhase::Fetching => "fetching",
            PollPhase::Parsing => "parsing",
            PollPhase::Projecting => "projecting",
        };
        f.write_str(name)
    }
}

/// Summary of one completed poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// True if no data came back and a COMMLOST report was substituted.
    pub comm_lost: bool,
    /// Report lines accepted as `KEY : VALUE` pairs.
    pub lines_accepted: usize,
    /// Pairs whose key is an exported field.
    pub fields_applied: usize,
}

/// Drives one report source into a shared metric store.
pub struct Poller<S> {
    source: S,
    store: Arc<MetricStore>,
}

impl<S: ReportSource> Poller<S> {
    /// Creates a poller writing into `store`.
    pub fn new(source: S, store: Arc<MetricStore>) -> Self {
        Self { source, store }
    }

    /// Runs one poll cycle.
    pub fn poll(&self) -> PollOutcome {
        self.poll_then(|_, _| ()).0
    }

    /// Runs one poll cycle, then calls `f` on the projected state before
    /// the store lock is released.
    pub fn poll_then<R>(
        &self,
        f: impl FnOnce(&MetricState, &PollOutcome) -> R,
    ) -> (PollOutcome, R) {
        let mut state = self.store.lock();
        let mut outcome = PollOutcome::default();

        enter(PollPhase::Fetching);
        let mut text = self.source.fetch_report();
        if text.is_empty() {
            tracing::warn!("no data from NIS, reporting communication lost");
            text = COMM_LOST_REPORT.to_owned();
            outcome.comm_lost = true;
        }

        enter(PollPhase::Parsing);
        let report = parse(&text);
        outcome.lines_accepted = report.len();

        enter(PollPhase::Projecting);
        let projection = apply(&report, &mut state);
        outcome.fields_applied = projection.applied;

        enter(PollPhase::Idle);
        tracing::debug!(
            comm_lost = outcome.comm_lost,
            lines = outcome.lines_accepted,
            applied = projection.applied,
            defaulted = projection.defaulted,
            ignored = projection.ignored,
            "poll complete"
        );

        let result = f(&*state, &outcome);
        (outcome, result)
    }
}

fn enter(phase: PollPhase) {
    tracing::trace!(%phase, "poll phase");
}
