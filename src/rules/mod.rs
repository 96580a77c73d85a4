//! # Threshold Rule Engine
//!
//! Evaluates operator-configured threshold rules against the latest
//! samples and derived aggregates, producing alert state transitions.
//!
//! Each rule is a small state machine: `Ok -> Breached` once its
//! comparator has held continuously for `sustained_for`, then
//! `Breached -> Recovered -> Ok` when the condition clears. `Recovered`
//! is a one-tick transitional status so subscribers can always observe
//! a recovery exactly once.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::{Duration, SystemTime};
//! use std::sync::Arc;
//! use chainwatch::sample::{MetricKey, MetricSample};
//! use chainwatch::store::{SeriesStore, StoreConfig};
//! use chainwatch::aggregate::Aggregator;
//! use chainwatch::rules::{RuleEngine, RuleSet, ThresholdRule, Comparator, Severity};
//!
//! let store = Arc::new(SeriesStore::new(StoreConfig::default()));
//! let aggregator = Aggregator::new(store.clone(), Duration::from_secs(30));
//!
//! let rules = RuleSet::new(vec![ThresholdRule {
//!     id: "sequencer-balance-floor".into(),
//!     key: MetricKey::SequencerBalance,
//!     target: Default::default(),
//!     comparator: Comparator::Lt,
//!     bound: 0.05,
//!     sustained_for: Duration::ZERO,
//!     severity: Severity::Critical,
//! }]);
//! let engine = RuleEngine::new(rules).unwrap();
//!
//! let now = SystemTime::now();
//! store.ingest(MetricSample::new(MetricKey::SequencerBalance, 0.02, now)).unwrap();
//!
//! let evaluation = engine.evaluate(now, &store, &aggregator);
//! assert_eq!(evaluation.transitions.len(), 1);
//! ```

mod config;
mod engine;
mod error;

pub use config::{Comparator, RuleSet, RuleTarget, Severity, ThresholdRule};
pub use engine::{AlertState, AlertStatus, AlertTransition, Evaluation, RuleEngine};
pub use error::RuleError;
