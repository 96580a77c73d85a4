//! # Series Store
//!
//! Append-only, capacity-bounded time series per metric key. The store
//! backs charts and rolling aggregates: writers ingest one sample at a
//! time, readers see the last fully committed state.
//!
//! ## Usage
//!
//! ```rust
//! use chainwatch::sample::{MetricKey, MetricSample};
//! use chainwatch::store::{SeriesStore, StoreConfig};
//!
//! let store = SeriesStore::new(StoreConfig::default());
//! let sample = MetricSample::at_unix_secs(MetricKey::BlockHeight, 1000.0, 1_700_000_000);
//! store.ingest(sample).unwrap();
//!
//! assert_eq!(store.latest(MetricKey::BlockHeight), Some(sample));
//! ```
//!
//! Samples for one key must arrive with non-decreasing timestamps; an
//! observation older than the stored latest is rejected with
//! [`RejectedSample::OutOfOrder`] and leaves the store unchanged.

mod config;
mod error;
mod series;

pub use config::StoreConfig;
pub use error::RejectedSample;
pub use series::{SeriesStore, TimeRange};
