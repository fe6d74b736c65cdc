//! Line-oriented `KEY : VALUE` report parser.

/// Key/value pairs extracted from one report, in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReport {
    pairs: Vec<(String, String)>,
}

impl RawReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair. Duplicate keys are kept.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Iterates over `(key, value)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the value of the first pair with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Number of accepted lines.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no line was accepted.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Splits report text into key/value pairs.
///
/// A line is a field only if it contains exactly one colon. Lines with no
/// colon, or with several (e.g. `DATE : 2024-01-01 12:00:00`), are dropped.
pub fn parse(text: &str) -> RawReport {
    let mut report = RawReport::new();

    for line in text.lines() {
        let line = line.trim();
        let mut parts = line.split(':');
        if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
            report.push(key.trim(), value.trim());
        } else {
            tracing::trace!(line, "skipping non-field line");
        }
    }

    report
}
