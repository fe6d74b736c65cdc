//! Conversion of raw report values into numeric metric values.
//!
//! The NIS reports values as free text: numbers with trailing units,
//! space-separated status flags, and a few fixed phrases. Each converter
//! here maps one of those shapes to an `f64`.
//!
//! Unparseable input is never an error. It collapses to `0.0`, but the
//! [`Conversion`] result records whether the value was actually understood.

mod alarm;
mod numeric;
mod status;

pub use alarm::{convert_alarm_delay, ALARM_DELAYS};
pub use numeric::{convert_numeric, strip_unit, UNIT_SUFFIXES};
pub use status::{convert_status, status_bit, STATUS_BITS, STATUS_ONLINE};

/// Signature shared by all field converters.
pub type Converter = fn(&str) -> Conversion;

/// Outcome of converting one raw value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// The raw value was recognized and produced this number.
    Parsed(f64),
    /// The raw value was not understood; the metric reads as zero.
    Defaulted,
}

impl Conversion {
    /// Returns the numeric value exposed for this conversion.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Conversion::Parsed(v) => v,
            Conversion::Defaulted => 0.0,
        }
    }

    /// Returns true if the raw value was recognized.
    #[inline]
    pub fn is_parsed(self) -> bool {
        matches!(self, Conversion::Parsed(_))
    }
}
