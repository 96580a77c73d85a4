use std::time::SystemTime;

use serde::Serialize;
use thiserror::Error;

use crate::sample::MetricKey;

/// Reasons a sample is refused by the series store.
///
/// Rejection is recovered locally: the offending sample is dropped and
/// the ingestion cycle continues with the remaining samples.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum RejectedSample {
    /// Observation is older than the stored latest for the same key
    #[error("out of order sample for {key}: observed at {observed_at:?}, latest is {latest:?}")]
    OutOfOrder {
        key: MetricKey,
        observed_at: SystemTime,
        latest: SystemTime,
    },

    /// Observation value is non-finite, or negative for a non-negative key
    #[error("invalid value {value} for {key}: {reason}")]
    InvalidValue {
        key: MetricKey,
        value: f64,
        reason: &'static str,
    },
}
