//! Numeric values with optional unit suffixes.

use super::Conversion;

/// Unit suffixes stripped before parsing, checked in order.
pub const UNIT_SUFFIXES: &[&str] = &[
    " Minutes", " Seconds", " Percent", " Volts", " Watts", " Hz", " C",
];

/// Removes the first matching unit suffix, at most once.
pub fn strip_unit(value: &str) -> &str {
    UNIT_SUFFIXES
        .iter()
        .find_map(|unit| value.strip_suffix(unit))
        .unwrap_or(value)
}

/// Parses a number such as `"230.1 Volts"` or `"12 Percent"`.
///
/// Non-numeric values like `"N/A"` convert to [`Conversion::Defaulted`].
pub fn convert_numeric(raw: &str) -> Conversion {
    match strip_unit(raw.trim()).trim().parse::<f64>() {
        Ok(v) => Conversion::Parsed(v),
        Err(_) => Conversion::Defaulted,
    }
}
