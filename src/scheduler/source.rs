use async_trait::async_trait;
use thiserror::Error;

use crate::sample::MetricSample;

/// Failures while obtaining samples from the external data source.
///
/// None of these are fatal: the scheduler logs the failure, skips the
/// cycle and leaves prior state intact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Source did not answer in time
    #[error("timed out fetching samples: {0}")]
    Timeout(String),

    /// Source answered with a payload that could not be interpreted
    #[error("malformed payload from data source: {0}")]
    Malformed(String),

    /// Source could not be reached at all
    #[error("data source unreachable: {0}")]
    Unreachable(String),
}

impl FetchError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Unreachable(_))
    }
}

/// External producer of ordered metric samples.
///
/// Implementations wrap whatever transport actually talks to the chain
/// (RPC polling, an indexer, a message feed); the engine only requires
/// that samples for a single key arrive with non-decreasing timestamps.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Produce the next batch of observations
    async fn fetch(&mut self) -> Result<Vec<MetricSample>, FetchError>;

    /// Human-readable source name for logs
    fn name(&self) -> &str {
        "sample source"
    }
}
