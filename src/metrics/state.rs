//! Process-wide metric values kept between polls.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Current value and help text of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    /// Last successfully converted value.
    pub value: f64,
    /// Help text recorded when the metric was created.
    pub help: String,
}

/// Metric name to last known value.
///
/// Entries are created on first observation and never removed. A key
/// missing from a later report keeps its previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricState {
    entries: BTreeMap<String, MetricEntry>,
}

impl MetricState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, creating it with `help` and a zero value
    /// if absent. Help text of an existing entry is left alone.
    pub fn get_or_create(&mut self, name: &str, help: &str) -> &mut MetricEntry {
        if !self.entries.contains_key(name) {
            tracing::debug!(metric = name, "creating metric");
        }
        self.entries
            .entry(name.to_owned())
            .or_insert_with(|| MetricEntry {
                value: 0.0,
                help: help.to_owned(),
            })
    }

    /// Sets the value of an existing metric. Returns false if it does not exist.
    pub fn update(&mut self, name: &str, value: f64) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.value = value;
                true
            }
            None => false,
        }
    }

    /// Returns the entry for `name`.
    pub fn get(&self, name: &str) -> Option<&MetricEntry> {
        self.entries.get(name)
    }

    /// Returns the current value of `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.entries.get(name).map(|e| e.value)
    }

    /// Iterates over all metrics, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of metrics created so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no metric was created yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A [`MetricState`] behind a single lock.
///
/// Writers and readers both go through the lock, so a poll's projection is
/// never observed half-applied.
#[derive(Debug, Default)]
pub struct MetricStore {
    inner: Mutex<MetricState>,
}

impl MetricStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state for reading or writing.
    pub fn lock(&self) -> MutexGuard<'_, MetricState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with shared access to the state.
    pub fn read<R>(&self, f: impl FnOnce(&MetricState) -> R) -> R {
        f(&self.lock())
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> MetricState {
        self.lock().clone()
    }
}
