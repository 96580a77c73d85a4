pub mod sample;
pub mod store;
pub mod aggregate;
pub mod rules;
pub mod scheduler;
pub mod report;
pub mod metrics;
pub mod prefs;
pub mod telemetry;

// Re-exports
pub use sample::{MetricKey, MetricSample};
pub use store::{SeriesStore, StoreConfig, RejectedSample, TimeRange};
pub use aggregate::{Aggregator, AggregateKind, AggregateSpec, AggregateValue, DerivedAggregate, WindowSpec};
pub use rules::{
    RuleEngine, RuleSet, ThresholdRule, Comparator, Severity,
    AlertState, AlertStatus, AlertTransition, Evaluation,
};
pub use scheduler::{
    UpdateScheduler, SchedulerConfig, SchedulerHandle, SampleSource,
    FetchError, TickReport, WindowAssignment,
};
pub use report::{HealthReport, OverallStatus};
pub use metrics::{EngineMetrics, MetricsCollector};
pub use prefs::PreferenceStore;

// Core types
pub type Result<T> = std::result::Result<T, Error>;
pub use error::Error;

pub mod error;
