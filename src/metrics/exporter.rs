//! One scrape: poll the NIS, then publish and encode.

use super::{MetricsError, MetricsRegistry};
use crate::poll::{PollOutcome, Poller};
use crate::protocol::ReportSource;

/// Couples a [`Poller`] with the registry it publishes to.
pub struct Exporter<S> {
    poller: Poller<S>,
    registry: MetricsRegistry,
}

impl<S: ReportSource> Exporter<S> {
    /// Creates an exporter.
    pub fn new(poller: Poller<S>, registry: MetricsRegistry) -> Self {
        Self { poller, registry }
    }

    /// Polls once and publishes the resulting state under the same lock.
    pub fn refresh(&self) -> Result<PollOutcome, MetricsError> {
        let (outcome, published) = self.poller.poll_then(|state, outcome| {
            self.registry.record_poll(outcome);
            self.registry.publish(state)
        });
        published?;
        Ok(outcome)
    }

    /// Polls once and returns the text exposition.
    pub fn scrape(&self) -> Result<String, MetricsError> {
        self.refresh()?;
        self.registry.encode()
    }

    /// Returns the registry.
    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }
}
