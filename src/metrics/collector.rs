//! Prometheus registry fed from the metric state.

use super::MetricState;
use crate::poll::PollOutcome;
use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus registry mirroring a [`MetricState`].
///
/// UPS gauges are registered lazily the first time they are published.
/// The exporter's own counters are registered up front.
pub struct MetricsRegistry {
    registry: Registry,
    gauges: Mutex<HashMap<String, Gauge>>,

    // Exporter self-metrics
    polls_total: IntCounter,
    nis_failures_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a registry with the exporter counters registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let polls_total = IntCounter::new(
            "apcupsd_exporter_polls_total",
            "Total number of NIS polls performed",
        )?;
        let nis_failures_total = IntCounter::new(
            "apcupsd_exporter_nis_failures_total",
            "Total number of polls that got no data from the NIS",
        )?;

        registry.register(Box::new(polls_total.clone()))?;
        registry.register(Box::new(nis_failures_total.clone()))?;

        Ok(Self {
            registry,
            gauges: Mutex::new(HashMap::new()),
            polls_total,
            nis_failures_total,
        })
    }

    /// Counts a finished poll.
    pub fn record_poll(&self, outcome: &PollOutcome) {
        self.polls_total.inc();
        if outcome.comm_lost {
            self.nis_failures_total.inc();
        }
    }

    /// Copies every metric in `state` into its gauge, registering new ones.
    pub fn publish(&self, state: &MetricState) -> Result<(), MetricsError> {
        let mut gauges = self.gauges.lock().unwrap_or_else(PoisonError::into_inner);

        for (name, entry) in state.iter() {
            if let Some(gauge) = gauges.get(name) {
                gauge.set(entry.value);
                continue;
            }

            let gauge = Gauge::new(name, entry.help.as_str())?;
            self.registry.register(Box::new(gauge.clone()))?;
            gauge.set(entry.value);
            tracing::debug!(metric = name, "registered gauge");
            gauges.insert(name.to_owned(), gauge);
        }

        Ok(())
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(entries: &[(&str, f64)]) -> MetricState {
        let mut state = MetricState::new();
        for &(name, value) in entries {
            state.get_or_create(name, "test help").value = value;
        }
        state
    }

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();
        assert!(output.contains("apcupsd_exporter_polls_total 0"));
        assert!(!output.contains("apcupsd_ups_"));
    }

    #[test]
    fn test_publish_registers_lazily() {
        let registry = MetricsRegistry::new().unwrap();
        registry
            .publish(&state_with(&[("apcupsd_ups_linev", 230.1)]))
            .unwrap();

        let output = registry.encode().unwrap();
        assert!(output.contains("# HELP apcupsd_ups_linev test help"));
        assert!(output.contains("apcupsd_ups_linev 230.1"));
        assert!(!output.contains("apcupsd_ups_bcharge"));
    }

    #[test]
    fn test_republish_updates_value() {
        let registry = MetricsRegistry::new().unwrap();
        registry
            .publish(&state_with(&[("apcupsd_ups_bcharge", 100.0)]))
            .unwrap();
        registry
            .publish(&state_with(&[("apcupsd_ups_bcharge", 87.5)]))
            .unwrap();

        let output = registry.encode().unwrap();
        assert!(output.contains("apcupsd_ups_bcharge 87.5"));
        assert!(!output.contains("apcupsd_ups_bcharge 100"));
    }

    #[test]
    fn test_record_poll_counts_failures() {
        let registry = MetricsRegistry::new().unwrap();
        registry.record_poll(&PollOutcome::default());
        registry.record_poll(&PollOutcome {
            comm_lost: true,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("apcupsd_exporter_polls_total 2"));
        assert!(output.contains("apcupsd_exporter_nis_failures_total 1"));
    }
}
