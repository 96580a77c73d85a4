use std::collections::{HashMap, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tracing::debug;

use crate::sample::{MetricKey, MetricSample};
use super::config::StoreConfig;
use super::error::RejectedSample;

/// Trailing time interval, half-open on the left: `(start, end]`.
///
/// A sample stamped exactly at `start` belongs to the previous window,
/// so consecutive windows never double-count a boundary sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: SystemTime,
    pub end: SystemTime,
}

impl TimeRange {
    /// Window of `duration` ending at `now`
    pub fn trailing(now: SystemTime, duration: Duration) -> Self {
        Self {
            start: now.checked_sub(duration).unwrap_or(UNIX_EPOCH),
            end: now,
        }
    }

    /// Whether `at` falls inside the window
    pub fn contains(&self, at: SystemTime) -> bool {
        at > self.start && at <= self.end
    }
}

/// In-memory time series, one bounded ring buffer per metric key.
///
/// Writers hold the write lock only for the duration of a single ingest
/// step; readers always observe a fully committed state.
pub struct SeriesStore {
    config: StoreConfig,
    series: RwLock<HashMap<MetricKey, VecDeque<MetricSample>>>,
}

impl SeriesStore {
    /// Create a store with the given retention settings
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            series: RwLock::new(HashMap::new()),
        }
    }

    /// Append a sample to its key's series.
    ///
    /// Rejects out-of-order and invalid observations without touching
    /// stored state. On success `latest(key)` reflects the new sample
    /// atomically with the series mutation.
    pub fn ingest(&self, sample: MetricSample) -> Result<(), RejectedSample> {
        if !sample.value.is_finite() {
            return Err(RejectedSample::InvalidValue {
                key: sample.key,
                value: sample.value,
                reason: "value is not finite",
            });
        }
        if sample.value < 0.0 && sample.key.is_non_negative() {
            return Err(RejectedSample::InvalidValue {
                key: sample.key,
                value: sample.value,
                reason: "negative value for a non-negative key",
            });
        }

        let mut series = self.series.write();
        let buf = series.entry(sample.key).or_default();

        if let Some(last) = buf.back() {
            if sample.observed_at < last.observed_at {
                return Err(RejectedSample::OutOfOrder {
                    key: sample.key,
                    observed_at: sample.observed_at,
                    latest: last.observed_at,
                });
            }
        }

        buf.push_back(sample);
        while buf.len() > self.config.retention {
            let evicted = buf.pop_front();
            debug!(key = %sample.key, ?evicted, "evicted oldest sample");
        }

        Ok(())
    }

    /// Most recent sample for a key, if any
    pub fn latest(&self, key: MetricKey) -> Option<MetricSample> {
        self.series.read().get(&key).and_then(|buf| buf.back().copied())
    }

    /// Samples for a key within `range`, ordered by observation time
    pub fn query(&self, key: MetricKey, range: TimeRange) -> Vec<MetricSample> {
        self.series
            .read()
            .get(&key)
            .map(|buf| {
                buf.iter()
                    .filter(|s| range.contains(s.observed_at))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All stored samples for a key, ordered by observation time
    pub fn all(&self, key: MetricKey) -> Vec<MetricSample> {
        self.series
            .read()
            .get(&key)
            .map(|buf| buf.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of retained samples for a key
    pub fn len(&self, key: MetricKey) -> usize {
        self.series.read().get(&key).map(VecDeque::len).unwrap_or(0)
    }

    /// Whether no samples are retained for a key
    pub fn is_empty(&self, key: MetricKey) -> bool {
        self.len(key) == 0
    }

    /// Keys with at least one retained sample
    pub fn keys(&self) -> Vec<MetricKey> {
        let series = self.series.read();
        MetricKey::ALL
            .iter()
            .filter(|key| series.get(key).map(|b| !b.is_empty()).unwrap_or(false))
            .copied()
            .collect()
    }

    /// Configured retention cap per key
    pub fn retention(&self) -> usize {
        self.config.retention
    }
}
