//! Periodic ingestion cycles: fetch samples from the external data
//! source, ingest, recompute windows, evaluate rules, publish.
//!
//! Ticks never overlap; a tick that runs long defers the next one, so
//! the per-key ordering invariant of the series store is preserved
//! without long-lived locks.

mod runner;
mod source;

pub use runner::{SchedulerConfig, SchedulerHandle, TickReport, UpdateScheduler, WindowAssignment};
pub use source::{FetchError, SampleSource};
