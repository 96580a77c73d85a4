//! Typed metric observations fed into the engine by an external data source.

mod types;

pub use types::{MetricKey, MetricSample, UnknownMetricKey};
