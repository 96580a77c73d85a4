use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::sample::MetricKey;
use crate::store::{SeriesStore, TimeRange};

/// Trailing window over which an aggregate is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Window length; the window is `(now - duration, now]`
    pub duration: Duration,
}

impl WindowSpec {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

/// Kinds of derived statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    /// Per-second rate: delta of a cumulative counter across the window,
    /// or sample count for gauge keys, divided by the window seconds
    Rate,
    /// Percentage of expected heartbeats for which the key strictly
    /// advanced within the window
    UptimePct,
    /// Sum of sample values in the window (moving volume)
    Sum,
    /// Arithmetic mean of sample values in the window
    Mean,
    /// Seconds since the key last strictly increased
    StaleSecs,
}

/// A windowed statistic together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub kind: AggregateKind,
    pub window: WindowSpec,
}

impl AggregateSpec {
    pub fn new(kind: AggregateKind, window: WindowSpec) -> Self {
        Self { kind, window }
    }
}

/// Result of an aggregate computation.
///
/// `Undefined` distinguishes "no data in the window" from a measured
/// zero; consumers render it as a gap rather than a zero point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Value(f64),
    Undefined,
}

impl AggregateValue {
    pub fn is_defined(&self) -> bool {
        matches!(self, AggregateValue::Value(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AggregateValue::Value(v) => Some(*v),
            AggregateValue::Undefined => None,
        }
    }
}

/// Computed window-scoped value for chart and table consumption
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedAggregate {
    pub key: MetricKey,
    pub kind: AggregateKind,
    pub window: WindowSpec,
    pub value: AggregateValue,
    pub computed_at: SystemTime,
}

/// Derives windowed statistics from the series store.
///
/// `heartbeat` is the expected sampling interval, used to size the
/// divisor of uptime percentages. Windows are time-based, so sparse or
/// irregular sampling changes the numerator, never the divisor.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<SeriesStore>,
    heartbeat: Duration,
}

impl Aggregator {
    pub fn new(store: Arc<SeriesStore>, heartbeat: Duration) -> Self {
        Self { store, heartbeat }
    }

    /// Compute one aggregate over the store's current contents
    pub fn compute(&self, key: MetricKey, spec: &AggregateSpec, now: SystemTime) -> DerivedAggregate {
        let value = match spec.kind {
            AggregateKind::Rate => self.rate(key, spec.window, now),
            AggregateKind::UptimePct => self.uptime_pct(key, spec.window, now),
            AggregateKind::Sum => self.sum(key, spec.window, now),
            AggregateKind::Mean => self.mean(key, spec.window, now),
            AggregateKind::StaleSecs => self.stale_secs(key, now),
        };

        DerivedAggregate {
            key,
            kind: spec.kind,
            window: spec.window,
            value,
            computed_at: now,
        }
    }

    fn rate(&self, key: MetricKey, window: WindowSpec, now: SystemTime) -> AggregateValue {
        let secs = window.duration.as_secs_f64();
        if secs <= 0.0 {
            return AggregateValue::Undefined;
        }

        let samples = self.store.query(key, TimeRange::trailing(now, window.duration));
        if samples.is_empty() {
            return AggregateValue::Undefined;
        }

        if key.is_cumulative() {
            // A single counter reading carries no rate information.
            if samples.len() < 2 {
                return AggregateValue::Undefined;
            }
            let delta = samples[samples.len() - 1].value - samples[0].value;
            if delta < 0.0 {
                debug!(%key, delta, "counter went backwards within window");
                return AggregateValue::Undefined;
            }
            AggregateValue::Value(delta / secs)
        } else {
            AggregateValue::Value(samples.len() as f64 / secs)
        }
    }

    fn uptime_pct(&self, key: MetricKey, window: WindowSpec, now: SystemTime) -> AggregateValue {
        let expected = if self.heartbeat.is_zero() {
            0
        } else {
            (window.duration.as_secs_f64() / self.heartbeat.as_secs_f64()).floor() as u64
        };
        if expected == 0 {
            return AggregateValue::Undefined;
        }

        // Each in-window heartbeat counts if it advanced versus its
        // prior sample, even when that prior sample precedes the window.
        let range = TimeRange::trailing(now, window.duration);
        let samples = self.store.all(key);
        let advanced = samples
            .windows(2)
            .filter(|pair| range.contains(pair[1].observed_at) && pair[1].value > pair[0].value)
            .count() as f64;

        AggregateValue::Value((advanced / expected as f64 * 100.0).min(100.0))
    }

    fn sum(&self, key: MetricKey, window: WindowSpec, now: SystemTime) -> AggregateValue {
        let samples = self.store.query(key, TimeRange::trailing(now, window.duration));
        if samples.is_empty() {
            return AggregateValue::Undefined;
        }
        AggregateValue::Value(samples.iter().map(|s| s.value).sum())
    }

    fn mean(&self, key: MetricKey, window: WindowSpec, now: SystemTime) -> AggregateValue {
        let samples = self.store.query(key, TimeRange::trailing(now, window.duration));
        if samples.is_empty() {
            return AggregateValue::Undefined;
        }
        let total: f64 = samples.iter().map(|s| s.value).sum();
        AggregateValue::Value(total / samples.len() as f64)
    }

    /// Seconds since the last strict increase across the whole retained
    /// series. A series that never advanced counts from its earliest
    /// sample, which is the latest point the value is known to have
    /// already been at its current level.
    fn stale_secs(&self, key: MetricKey, now: SystemTime) -> AggregateValue {
        let samples = self.store.all(key);
        if samples.is_empty() {
            return AggregateValue::Undefined;
        }

        let last_advance = samples
            .windows(2)
            .rev()
            .find(|pair| pair[1].value > pair[0].value)
            .map(|pair| pair[1].observed_at)
            .unwrap_or(samples[0].observed_at);

        let stale = now.duration_since(last_advance).unwrap_or_default();
        AggregateValue::Value(stale.as_secs_f64())
    }
}
