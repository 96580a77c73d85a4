use chainwatch::report::{HealthReport, OverallStatus};
use chainwatch::rules::{AlertStatus, RuleEngine, RuleSet};
use chainwatch::sample::MetricKey;

use crate::common::{aggregator, balance_floor_rule, sample, store_with_retention, ts};

#[test]
fn healthy_chain_reports_ok_with_latest_vitals() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 30);
    let engine = RuleEngine::new(RuleSet::new(vec![balance_floor_rule("balance-floor", 0.05, 0)])).unwrap();

    store.ingest(sample(MetricKey::BlockHeight, 1_000.0, 0)).unwrap();
    store.ingest(sample(MetricKey::SequencerBalance, 2.5, 0)).unwrap();
    engine.evaluate(ts(0), &store, &agg);

    let report = HealthReport::collect(&store, &engine, ts(0));
    assert_eq!(report.overall, OverallStatus::Ok);
    assert!(report.active_alerts.is_empty());
    assert!(report.unevaluated_rules.is_empty());
    assert_eq!(report.vitals.len(), 2);
    assert_eq!(report.vitals[0].key, MetricKey::BlockHeight);
    assert_eq!(report.vitals[1].key, MetricKey::SequencerBalance);
}

#[test]
fn rules_without_data_degrade_the_report() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 30);
    let engine = RuleEngine::new(RuleSet::new(vec![balance_floor_rule("balance-floor", 0.05, 0)])).unwrap();
    engine.evaluate(ts(0), &store, &agg);

    let report = HealthReport::collect(&store, &engine, ts(0));
    assert_eq!(report.overall, OverallStatus::Degraded);
    assert_eq!(report.unevaluated_rules, vec!["balance-floor".to_string()]);
    assert!(report.vitals.is_empty());
}

#[test]
fn breached_rule_raises_the_overall_status() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 30);
    let engine = RuleEngine::new(RuleSet::new(vec![balance_floor_rule("balance-floor", 0.05, 0)])).unwrap();

    store.ingest(sample(MetricKey::SequencerBalance, 0.01, 0)).unwrap();
    engine.evaluate(ts(0), &store, &agg);

    let report = HealthReport::collect(&store, &engine, ts(0));
    assert_eq!(report.overall, OverallStatus::Alert);
    assert_eq!(report.active_alerts.len(), 1);
    assert_eq!(report.active_alerts[0].rule_id, "balance-floor");
    assert_eq!(report.active_alerts[0].status, AlertStatus::Breached);
}

#[test]
fn report_serializes_to_a_json_document() {
    let store = store_with_retention(100);
    let agg = aggregator(&store, 30);
    let engine = RuleEngine::new(RuleSet::default()).unwrap();

    store.ingest(sample(MetricKey::PeerCount, 12.0, 0)).unwrap();
    engine.evaluate(ts(0), &store, &agg);

    let json = HealthReport::collect(&store, &engine, ts(0)).to_json();
    assert_eq!(json["overall"], "ok");
    assert_eq!(json["vitals"][0]["key"], "peer_count");
    assert_eq!(json["vitals"][0]["value"], 12.0);
}
