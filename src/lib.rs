//! apcupsd Exporter Library
//!
//! Polls an apcupsd Network Information Server (NIS) over its
//! length-prefixed TCP protocol, parses the free-text status report, and
//! turns the interesting fields into numeric Prometheus gauges.
//!
//! # Architecture
//!
//! Every scrape drives one poll through the pipeline:
//!
//! ```text
//! protocol (frames → text) → report (text → fields) → convert (field → f64)
//!                                         ↓
//!                               metrics (state → gauges)
//! ```
//!
//! # Design Principles
//!
//! - **Never fail a scrape**: an unreachable NIS becomes a `COMMLOST` status
//! - **Last value wins**: a field missing from one report keeps its old value
//! - **Unparseable is zero**: conversion failures read as `0`, not errors
//! - **One lock**: poll, projection and publishing are serialized
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use apcupsd_exporter::{MetricStore, NisClient, Poller};
//!
//! let store = Arc::new(MetricStore::new());
//! let poller = Poller::new(
//!     NisClient::new("localhost:3551", Duration::from_secs(30)),
//!     Arc::clone(&store),
//! );
//!
//! let outcome = poller.poll();
//! if !outcome.comm_lost {
//!     for (name, entry) in store.snapshot().iter() {
//!         println!("{name} = {}", entry.value);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod convert;
pub mod metrics;
pub mod poll;
pub mod protocol;
pub mod report;

// Re-export commonly used types at crate root
pub use config::{ConfigError, ExporterConfig};
pub use convert::Conversion;
pub use metrics::{Exporter, MetricState, MetricStore, MetricsRegistry};
pub use poll::{PollOutcome, PollPhase, Poller};
pub use protocol::{NisClient, ReportSource, StaticSource};
pub use report::{FieldDefinition, RawReport, FIELDS};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
