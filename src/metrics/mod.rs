//! Self-metrics for the engine: tick counts, rejected samples, fetch
//! failures and tick latency.

use std::time::Duration;

use parking_lot::RwLock;
use serde::{Serialize, Deserialize};
use serde_json::Value;

/// Basic metrics trait for collecting component-specific metrics
#[async_trait::async_trait]
pub trait MetricsCollector: Send + Sync {
    /// Get current metrics as JSON value
    async fn get_metrics(&self) -> Value;

    /// Reset metrics to default values
    async fn reset(&self);
}

/// Counters accumulated over the engine's lifetime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineMetricsSnapshot {
    /// Completed ingestion cycles
    pub ticks_completed: u64,
    /// Samples accepted by the series store
    pub samples_ingested: u64,
    /// Samples dropped as out-of-order or invalid
    pub samples_rejected: u64,
    /// Cycles skipped because the data source failed
    pub fetch_failures: u64,
    /// Alert transitions emitted
    pub transitions_emitted: u64,
    /// Average tick processing time in milliseconds
    pub avg_tick_ms: f64,
}

/// Shared engine metrics, updated by the scheduler and readable by
/// the presentation layer at any time
#[derive(Default)]
pub struct EngineMetrics {
    inner: RwLock<EngineMetricsSnapshot>,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed tick
    pub fn record_tick(&self, elapsed: Duration, transitions: u64) {
        let mut metrics = self.inner.write();
        metrics.ticks_completed += 1;
        metrics.transitions_emitted += transitions;
        metrics.avg_tick_ms = running_average(
            metrics.avg_tick_ms,
            duration_to_ms(elapsed),
            metrics.ticks_completed,
        );
    }

    /// Record one accepted sample
    pub fn record_ingested(&self) {
        self.inner.write().samples_ingested += 1;
    }

    /// Record one dropped sample
    pub fn record_rejected(&self) {
        self.inner.write().samples_rejected += 1;
    }

    /// Record one skipped cycle
    pub fn record_fetch_failure(&self) {
        self.inner.write().fetch_failures += 1;
    }

    /// Current counter values
    pub fn snapshot(&self) -> EngineMetricsSnapshot {
        self.inner.read().clone()
    }
}

#[async_trait::async_trait]
impl MetricsCollector for EngineMetrics {
    async fn get_metrics(&self) -> Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }

    async fn reset(&self) {
        *self.inner.write() = EngineMetricsSnapshot::default();
    }
}

/// Incremental running average over `total` observations
fn running_average(current_avg: f64, new_value: f64, total: u64) -> f64 {
    (current_avg * (total - 1) as f64 + new_value) / total as f64
}

/// Convert duration to milliseconds
fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
