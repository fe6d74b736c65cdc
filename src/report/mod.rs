//! Status report parsing and projection onto metrics.
//!
//! A report is the text dump returned by one NIS `status` request:
//!
//! ```text
//! APC      : 001,036,0869
//! STATUS   : ONLINE
//! LINEV    : 230.1 Volts
//! LOADPCT  : 12.0 Percent
//! ```
//!
//! [`parse`] splits it into key/value pairs, [`FIELDS`] says which keys are
//! interesting and how to convert them, and [`apply`] merges the converted
//! values into a [`MetricState`](crate::metrics::MetricState).

mod fields;
mod parser;
mod projection;

pub use fields::{field, FieldDefinition, FIELDS, METRIC_PREFIX};
pub use parser::{parse, RawReport};
pub use projection::{apply, Projection};
