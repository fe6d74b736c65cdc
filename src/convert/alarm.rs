//! ALARMDEL: the configured delay before the UPS sounds its alarm.

use super::Conversion;

/// Known ALARMDEL phrases and their ordinals. Anything else reads as 0.
pub const ALARM_DELAYS: &[(&str, f64)] = &[
    ("30 Seconds", 1.0),
    ("Low Battery", 2.0),
    ("No alarm", 3.0),
    ("5 Seconds", 4.0),
    ("Always", 5.0),
];

/// Maps an exact ALARMDEL phrase to its ordinal.
pub fn convert_alarm_delay(raw: &str) -> Conversion {
    ALARM_DELAYS
        .iter()
        .find(|(phrase, _)| *phrase == raw)
        .map_or(Conversion::Defaulted, |&(_, ordinal)| Conversion::Parsed(ordinal))
}
