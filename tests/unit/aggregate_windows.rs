use chainwatch::aggregate::{AggregateKind, AggregateSpec, AggregateValue, WindowSpec};
use chainwatch::sample::MetricKey;

use crate::common::{aggregator, sample, store_with_retention, ts};

fn spec(kind: AggregateKind, window_secs: u64) -> AggregateSpec {
    AggregateSpec::new(kind, WindowSpec::from_secs(window_secs))
}

fn assert_value(value: AggregateValue, expected: f64) {
    match value {
        AggregateValue::Value(v) => assert!(
            (v - expected).abs() < 1e-9,
            "expected {expected}, got {v}"
        ),
        AggregateValue::Undefined => panic!("expected {expected}, got Undefined"),
    }
}

#[test]
fn rate_counts_gauge_samples_per_second() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::ProtocolVolume, 5.0, 110)).unwrap();
    store.ingest(sample(MetricKey::ProtocolVolume, 6.0, 130)).unwrap();
    store.ingest(sample(MetricKey::ProtocolVolume, 7.0, 150)).unwrap();

    let result = agg.compute(MetricKey::ProtocolVolume, &spec(AggregateKind::Rate, 60), ts(160));
    assert_value(result.value, 3.0 / 60.0);
}

#[test]
fn rate_uses_delta_for_cumulative_counters() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::TxCount, 1_000.0, 110)).unwrap();
    store.ingest(sample(MetricKey::TxCount, 1_090.0, 140)).unwrap();

    let result = agg.compute(MetricKey::TxCount, &spec(AggregateKind::Rate, 60), ts(160));
    assert_value(result.value, 90.0 / 60.0);
}

#[test]
fn rate_over_empty_window_is_undefined() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);

    let result = agg.compute(MetricKey::TxCount, &spec(AggregateKind::Rate, 60), ts(160));
    assert_eq!(result.value, AggregateValue::Undefined);
}

#[test]
fn rate_needs_two_counter_readings() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::TxCount, 1_000.0, 150)).unwrap();

    let result = agg.compute(MetricKey::TxCount, &spec(AggregateKind::Rate, 60), ts(160));
    assert_eq!(result.value, AggregateValue::Undefined);
}

#[test]
fn window_boundary_sample_is_excluded() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    // Exactly at now - window: belongs to the previous window.
    store.ingest(sample(MetricKey::ProtocolVolume, 100.0, 100)).unwrap();
    store.ingest(sample(MetricKey::ProtocolVolume, 1.0, 130)).unwrap();

    let result = agg.compute(MetricKey::ProtocolVolume, &spec(AggregateKind::Sum, 60), ts(160));
    assert_value(result.value, 1.0);
}

#[test]
fn uptime_is_fraction_of_expected_heartbeats() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    // Seven height samples 10s apart, each advancing: 6 advancing pairs
    // against 6 expected heartbeats in a 60s window.
    for i in 0..7u64 {
        store.ingest(sample(MetricKey::BlockHeight, 100.0 + i as f64, 100 + i * 10)).unwrap();
    }

    let result = agg.compute(MetricKey::BlockHeight, &spec(AggregateKind::UptimePct, 60), ts(160));
    assert_value(result.value, 100.0);
}

#[test]
fn uptime_counts_only_strict_advances() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    // Height stalls halfway: 3 advancing pairs out of 6 expected.
    let heights = [100.0, 101.0, 102.0, 103.0, 103.0, 103.0, 103.0];
    for (i, height) in heights.iter().enumerate() {
        store.ingest(sample(MetricKey::BlockHeight, *height, 100 + i as u64 * 10)).unwrap();
    }

    let result = agg.compute(MetricKey::BlockHeight, &spec(AggregateKind::UptimePct, 60), ts(160));
    assert_value(result.value, 50.0);
}

#[test]
fn uptime_with_zero_expected_ticks_is_undefined() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::BlockHeight, 100.0, 158)).unwrap();

    // 5s window against a 10s heartbeat: no full heartbeat expected.
    let result = agg.compute(MetricKey::BlockHeight, &spec(AggregateKind::UptimePct, 5), ts(160));
    assert_eq!(result.value, AggregateValue::Undefined);
}

#[test]
fn sum_and_mean_over_window() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::ProtocolVolume, 10.0, 110)).unwrap();
    store.ingest(sample(MetricKey::ProtocolVolume, 20.0, 130)).unwrap();
    store.ingest(sample(MetricKey::ProtocolVolume, 60.0, 150)).unwrap();

    let sum = agg.compute(MetricKey::ProtocolVolume, &spec(AggregateKind::Sum, 60), ts(160));
    assert_value(sum.value, 90.0);

    let mean = agg.compute(MetricKey::ProtocolVolume, &spec(AggregateKind::Mean, 60), ts(160));
    assert_value(mean.value, 30.0);
}

#[test]
fn sum_over_empty_window_is_undefined_not_zero() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::ProtocolVolume, 10.0, 10)).unwrap();

    let result = agg.compute(MetricKey::ProtocolVolume, &spec(AggregateKind::Sum, 60), ts(300));
    assert_eq!(result.value, AggregateValue::Undefined);
}

#[test]
fn stale_secs_measures_time_since_last_advance() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::BlockHeight, 100.0, 0)).unwrap();
    store.ingest(sample(MetricKey::BlockHeight, 101.0, 10)).unwrap();
    store.ingest(sample(MetricKey::BlockHeight, 101.0, 20)).unwrap();
    store.ingest(sample(MetricKey::BlockHeight, 101.0, 30)).unwrap();

    let result = agg.compute(MetricKey::BlockHeight, &spec(AggregateKind::StaleSecs, 600), ts(40));
    assert_value(result.value, 30.0);
}

#[test]
fn stale_secs_with_single_sample_counts_from_it() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);
    store.ingest(sample(MetricKey::BlockHeight, 100.0, 0)).unwrap();

    let result = agg.compute(MetricKey::BlockHeight, &spec(AggregateKind::StaleSecs, 600), ts(25));
    assert_value(result.value, 25.0);
}

#[test]
fn stale_secs_without_data_is_undefined() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 10);

    let result = agg.compute(MetricKey::BlockHeight, &spec(AggregateKind::StaleSecs, 600), ts(25));
    assert_eq!(result.value, AggregateValue::Undefined);
}

#[test]
fn aggregate_value_serializes_as_number_or_null() {
    let defined = serde_json::to_string(&AggregateValue::Value(2.5)).unwrap();
    assert_eq!(defined, "2.5");
    let undefined = serde_json::to_string(&AggregateValue::Undefined).unwrap();
    assert_eq!(undefined, "null");
}
