/*!
# Error Module

Core error handling for the chainwatch engine.

Every subsystem defines its own error type (`RejectedSample`,
`RuleError`, `FetchError`); this module folds them into one crate-level
`Error` and classifies which failures are worth retrying. Rejected
samples and fetch failures are recovered locally by the scheduler, so
in normal operation nothing here is fatal to the process — the only
fatal condition is malformed static configuration, surfaced at load
time.
*/

use thiserror::Error;

/// Core engine error type
#[derive(Error, Debug)]
pub enum Error {
    /// Sample refused by the series store
    #[error("sample rejected: {0}")]
    Sample(#[from] crate::store::RejectedSample),

    /// Rule configuration error
    #[error("rule error: {0}")]
    Rule(#[from] crate::rules::RuleError),

    /// Data source failure
    #[error("fetch error: {0}")]
    Fetch(#[from] crate::scheduler::FetchError),

    /// Static configuration error, fatal at load time
    #[error("config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Sample(_) => false,
            Error::Rule(_) => false,
            Error::Fetch(e) => e.is_retryable(),
            Error::Config(_) => false,
            Error::Io(_) => true,
            Error::Generic(_) => false,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

impl From<crate::sample::UnknownMetricKey> for Error {
    fn from(err: crate::sample::UnknownMetricKey) -> Self {
        Error::Config(err.to_string())
    }
}
