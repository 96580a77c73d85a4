use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use serde::{Serialize, Deserialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::aggregate::{AggregateSpec, Aggregator, DerivedAggregate};
use crate::metrics::EngineMetrics;
use crate::rules::{AlertTransition, RuleEngine};
use crate::sample::MetricKey;
use crate::store::{RejectedSample, SeriesStore};
use super::source::SampleSource;

/// One aggregate recomputed and published on every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAssignment {
    pub key: MetricKey,
    pub spec: AggregateSpec,
}

/// Scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Ingestion cycle interval
    pub interval: Duration,
    /// Aggregates recomputed each tick for chart and table consumers
    pub windows: Vec<WindowAssignment>,
    /// Capacity of the tick report broadcast channel
    pub event_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            windows: Vec::new(),
            event_capacity: 100,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("Scheduler interval cannot be 0".into());
        }
        if self.event_capacity == 0 {
            return Err("Event capacity cannot be 0".into());
        }
        Ok(())
    }
}

/// Everything one completed tick produced, published to subscribers
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// Monotonic tick counter, counting skipped cycles too
    pub tick_seq: u64,
    pub started_at: SystemTime,
    /// Alert state changes from this tick, exactly once per change
    pub transitions: Vec<AlertTransition>,
    /// Freshly recomputed aggregates for the configured windows
    pub aggregates: Vec<DerivedAggregate>,
    /// Samples dropped during ingestion this tick
    pub rejected: Vec<RejectedSample>,
    /// Rules with no data to evaluate against
    pub unevaluated: Vec<String>,
}

/// Drives the repeating ingestion cycle.
///
/// Each tick performs, in order: fetch from the data source, ingest
/// into the series store, recompute configured windows, evaluate the
/// rule engine, publish the resulting report. A failed fetch skips the
/// cycle; rejected samples are dropped individually. Ticks are
/// serialized, so no observer ever sees a half-committed cycle.
pub struct UpdateScheduler {
    config: SchedulerConfig,
    source: Box<dyn SampleSource>,
    store: Arc<SeriesStore>,
    aggregator: Aggregator,
    engine: Arc<RuleEngine>,
    metrics: Arc<EngineMetrics>,
    events: broadcast::Sender<TickReport>,
}

/// Handle to a running scheduler task
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Request a clean stop and wait for the in-flight tick to finish
    /// committing before the task halts.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Whether the scheduler task has already exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl UpdateScheduler {
    pub fn new(
        config: SchedulerConfig,
        source: Box<dyn SampleSource>,
        store: Arc<SeriesStore>,
        aggregator: Aggregator,
        engine: Arc<RuleEngine>,
        metrics: Arc<EngineMetrics>,
    ) -> Result<Self, crate::Error> {
        config.validate().map_err(crate::Error::Config)?;
        let (events, _) = broadcast::channel(config.event_capacity);
        Ok(Self {
            config,
            source,
            store,
            aggregator,
            engine,
            metrics,
            events,
        })
    }

    /// Subscribe to tick reports; hand one receiver to the presentation
    /// adapter and one to the external notifier.
    pub fn subscribe(&self) -> broadcast::Receiver<TickReport> {
        self.events.subscribe()
    }

    /// Spawn the ingestion loop on the current runtime
    pub fn start(self) -> SchedulerHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle { shutdown, task }
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            source = self.source.name(),
            interval_ms = self.config.interval.as_millis() as u64,
            "update scheduler started"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        // A tick that outlives its interval defers the next tick instead
        // of running it concurrently.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut tick_seq: u64 = 0;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tick_seq += 1;
                    self.run_tick(tick_seq).await;
                }
                _ = shutdown.changed() => {
                    break;
                }
            }
        }

        info!(ticks = tick_seq, "update scheduler stopped");
    }

    async fn run_tick(&mut self, tick_seq: u64) {
        let started_at = SystemTime::now();
        let timer = Instant::now();

        let samples = match self.source.fetch().await {
            Ok(samples) => samples,
            Err(err) => {
                warn!(
                    source = self.source.name(),
                    error = %err,
                    retryable = err.is_retryable(),
                    "fetch failed, skipping cycle"
                );
                self.metrics.record_fetch_failure();
                return;
            }
        };

        let mut rejected = Vec::new();
        for sample in samples {
            match self.store.ingest(sample) {
                Ok(()) => self.metrics.record_ingested(),
                Err(rejection) => {
                    warn!(error = %rejection, "sample rejected");
                    self.metrics.record_rejected();
                    rejected.push(rejection);
                }
            }
        }

        let now = SystemTime::now();
        let aggregates: Vec<DerivedAggregate> = self
            .config
            .windows
            .iter()
            .map(|assignment| self.aggregator.compute(assignment.key, &assignment.spec, now))
            .collect();

        let evaluation = self.engine.evaluate(now, &self.store, &self.aggregator);
        self.metrics.record_tick(timer.elapsed(), evaluation.transitions.len() as u64);

        let report = TickReport {
            tick_seq,
            started_at,
            transitions: evaluation.transitions,
            aggregates,
            rejected,
            unevaluated: evaluation.unevaluated,
        };

        // Send fails only when no subscriber is currently listening,
        // which is a valid state for a headless engine.
        if self.events.send(report).is_err() {
            debug!(tick_seq, "no subscribers for tick report");
        }
    }
}
