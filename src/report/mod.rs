//! Point-in-time health snapshot for summary cards and tables.
//!
//! A pure read-model over the series store and the rule engine; nothing
//! here mutates engine state.

use std::time::SystemTime;

use serde::{Serialize, Deserialize};
use serde_json::Value;

use crate::rules::{AlertState, AlertStatus, RuleEngine};
use crate::sample::MetricKey;
use crate::store::SeriesStore;

/// Rolled-up condition of the whole chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// Every rule evaluated and none breached
    Ok,
    /// No breach, but at least one rule has no data yet
    Degraded,
    /// At least one rule is breached or just recovered
    Alert,
}

/// Latest observation for one vital
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    pub key: MetricKey,
    pub value: f64,
    pub observed_at: SystemTime,
}

/// Serializable snapshot of the chain's health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub generated_at: SystemTime,
    pub overall: OverallStatus,
    /// Latest value per key, in display order, keys without data omitted
    pub vitals: Vec<VitalReading>,
    /// Rules currently breached or in their one-tick recovered state
    pub active_alerts: Vec<AlertState>,
    /// Rules with no data to evaluate against
    pub unevaluated_rules: Vec<String>,
}

impl HealthReport {
    /// Collect a snapshot from the current committed state
    pub fn collect(store: &SeriesStore, engine: &RuleEngine, now: SystemTime) -> Self {
        let vitals = MetricKey::ALL
            .iter()
            .filter_map(|key| {
                store.latest(*key).map(|sample| VitalReading {
                    key: *key,
                    value: sample.value,
                    observed_at: sample.observed_at,
                })
            })
            .collect();

        let states = engine.current_states();
        let active_alerts: Vec<AlertState> = states
            .iter()
            .filter(|state| state.status != AlertStatus::Ok)
            .cloned()
            .collect();
        let unevaluated_rules: Vec<String> = states
            .iter()
            .filter(|state| !state.evaluated)
            .map(|state| state.rule_id.clone())
            .collect();

        let overall = if !active_alerts.is_empty() {
            OverallStatus::Alert
        } else if !unevaluated_rules.is_empty() {
            OverallStatus::Degraded
        } else {
            OverallStatus::Ok
        };

        Self {
            generated_at: now,
            overall,
            vitals,
            active_alerts,
            unevaluated_rules,
        }
    }

    /// Snapshot as a JSON document
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
