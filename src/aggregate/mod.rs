//! Windowed statistics derived from the series store.
//!
//! Aggregates are pure functions of the stored samples for a key and a
//! trailing time window; they carry no state of their own and are
//! recomputed on demand or on each ingestion tick.

mod window;

pub use window::{
    Aggregator,
    AggregateKind,
    AggregateSpec,
    AggregateValue,
    DerivedAggregate,
    WindowSpec,
};
