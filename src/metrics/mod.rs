//! Metric state and Prometheus exposition.
//!
//! [`MetricState`] is the exporter's memory: the last value seen for every
//! UPS field, kept across polls. [`MetricsRegistry`] mirrors that state into
//! Prometheus gauges, and [`Exporter`] ties a poll to a publish.
//!
//! # Metrics Exposed
//!
//! ## UPS Metrics
//! One gauge per report field in [`FIELDS`](crate::report::FIELDS), named
//! `apcupsd_ups_<key>`, created the first time the field is seen.
//!
//! ## Exporter Metrics
//! - `apcupsd_exporter_polls_total` - Total NIS polls performed
//! - `apcupsd_exporter_nis_failures_total` - Polls that got no data
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use apcupsd_exporter::metrics::{Exporter, MetricStore, MetricsRegistry};
//! use apcupsd_exporter::poll::Poller;
//! use apcupsd_exporter::protocol::StaticSource;
//!
//! let poller = Poller::new(
//!     StaticSource::new("STATUS : ONLINE\nBCHARGE : 100.0 Percent\n"),
//!     Arc::new(MetricStore::new()),
//! );
//! let exporter = Exporter::new(poller, MetricsRegistry::new().expect("registry"));
//!
//! let text = exporter.scrape().expect("scrape");
//! assert!(text.contains("apcupsd_ups_bcharge 100"));
//! ```

mod collector;
mod exporter;
#[cfg(feature = "metrics")]
mod server;
mod state;

pub use collector::{MetricsError, MetricsRegistry};
pub use exporter::Exporter;
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
pub use state::{MetricEntry, MetricState, MetricStore};
