use std::collections::HashMap;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregate::Aggregator;
use crate::sample::MetricKey;
use crate::store::SeriesStore;
use super::config::{RuleSet, RuleTarget, Severity, ThresholdRule};
use super::error::RuleError;

/// Alert lifecycle status of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Condition does not hold
    Ok,
    /// Condition has held continuously for at least `sustained_for`
    Breached,
    /// Condition just stopped holding; cleared to `Ok` on the next
    /// evaluation so the recovery is observable exactly once
    Recovered,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Ok => "ok",
            AlertStatus::Breached => "breached",
            AlertStatus::Recovered => "recovered",
        }
    }
}

/// One state change of one rule, emitted exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTransition {
    /// Unique event id for exactly-once consumption by the notifier
    pub event_id: Uuid,
    pub rule_id: String,
    pub from: AlertStatus,
    pub to: AlertStatus,
    pub at: SystemTime,
    pub severity: Severity,
}

/// Current alert state of one rule, read-only for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    pub rule_id: String,
    pub status: AlertStatus,
    /// When the rule entered its current status
    pub since: SystemTime,
    /// False while no sample or aggregate exists for the rule's target,
    /// so "no data" renders distinctly from "healthy"
    pub evaluated: bool,
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// State changes, in rule order, emitted once per change
    pub transitions: Vec<AlertTransition>,
    /// Rules whose target value is currently missing
    pub unevaluated: Vec<String>,
}

struct RuleState {
    status: AlertStatus,
    since: SystemTime,
    /// Evaluation instant at which the condition started holding
    onset: Option<SystemTime>,
    evaluated: bool,
}

impl RuleState {
    fn initial(at: SystemTime) -> Self {
        Self {
            status: AlertStatus::Ok,
            since: at,
            onset: None,
            evaluated: false,
        }
    }
}

struct EngineInner {
    rules: Vec<ThresholdRule>,
    states: HashMap<String, RuleState>,
}

/// Evaluates the configured rules against current values and tracks
/// per-rule alert state.
///
/// State lifecycle is tied to rule presence: removing a rule on reload
/// discards its state.
pub struct RuleEngine {
    inner: RwLock<EngineInner>,
}

impl RuleEngine {
    /// Create an engine from a validated rule set
    pub fn new(rule_set: RuleSet) -> Result<Self, RuleError> {
        rule_set.validate()?;
        let now = SystemTime::now();
        let states = rule_set
            .rules
            .iter()
            .map(|rule| (rule.id.clone(), RuleState::initial(now)))
            .collect();
        Ok(Self {
            inner: RwLock::new(EngineInner {
                rules: rule_set.rules,
                states,
            }),
        })
    }

    /// Swap in a new rule set; takes effect on the next evaluation.
    ///
    /// State survives for retained rule ids and is discarded for
    /// removed ones; added rules start out `Ok` and unevaluated.
    pub fn replace_rules(&self, rule_set: RuleSet) -> Result<(), RuleError> {
        rule_set.validate()?;
        let now = SystemTime::now();
        let mut inner = self.inner.write();
        let mut states = HashMap::with_capacity(rule_set.rules.len());
        for rule in &rule_set.rules {
            let state = inner
                .states
                .remove(&rule.id)
                .unwrap_or_else(|| RuleState::initial(now));
            states.insert(rule.id.clone(), state);
        }
        inner.rules = rule_set.rules;
        inner.states = states;
        Ok(())
    }

    /// Evaluate every rule at `now`.
    ///
    /// Transitions are emitted once per state change: re-evaluating with
    /// no new data produces nothing, apart from draining any one-tick
    /// `Recovered` status to `Ok`.
    pub fn evaluate(&self, now: SystemTime, store: &SeriesStore, aggregator: &Aggregator) -> Evaluation {
        let mut inner = self.inner.write();
        let EngineInner { rules, states } = &mut *inner;

        let mut evaluation = Evaluation::default();

        for rule in rules.iter() {
            let state = states
                .entry(rule.id.clone())
                .or_insert_with(|| RuleState::initial(now));

            // Recovered is transitional: clear it before anything else so
            // every breach recovery is observed exactly once.
            if state.status == AlertStatus::Recovered {
                evaluation
                    .transitions
                    .push(transition(rule, AlertStatus::Recovered, AlertStatus::Ok, now));
                state.status = AlertStatus::Ok;
                state.since = now;
                state.onset = None;
            }

            let value = resolve(rule, store, aggregator, now);
            let Some(value) = value else {
                state.evaluated = false;
                evaluation.unevaluated.push(rule.id.clone());
                continue;
            };
            state.evaluated = true;

            let holds = rule.comparator.holds(value, rule.bound);
            match state.status {
                AlertStatus::Ok => {
                    if holds {
                        let onset = *state.onset.get_or_insert(now);
                        let held = now.duration_since(onset).unwrap_or_default();
                        if held >= rule.sustained_for {
                            warn!(
                                rule_id = %rule.id,
                                key = %rule.key,
                                value,
                                bound = rule.bound,
                                "threshold breached"
                            );
                            evaluation
                                .transitions
                                .push(transition(rule, AlertStatus::Ok, AlertStatus::Breached, now));
                            state.status = AlertStatus::Breached;
                            state.since = now;
                        }
                    } else {
                        state.onset = None;
                    }
                }
                AlertStatus::Breached => {
                    if !holds {
                        info!(rule_id = %rule.id, key = %rule.key, value, "threshold recovered");
                        evaluation
                            .transitions
                            .push(transition(rule, AlertStatus::Breached, AlertStatus::Recovered, now));
                        state.status = AlertStatus::Recovered;
                        state.since = now;
                        state.onset = None;
                    }
                }
                // Cleared above; a rule can never still be Recovered here.
                AlertStatus::Recovered => {}
            }
        }

        evaluation
    }

    /// Current alert states, in rule order
    pub fn current_states(&self) -> Vec<AlertState> {
        let inner = self.inner.read();
        inner
            .rules
            .iter()
            .filter_map(|rule| {
                inner.states.get(&rule.id).map(|state| AlertState {
                    rule_id: rule.id.clone(),
                    status: state.status,
                    since: state.since,
                    evaluated: state.evaluated,
                })
            })
            .collect()
    }

    /// Metric keys referenced by the current rule set
    pub fn watched_keys(&self) -> Vec<MetricKey> {
        let inner = self.inner.read();
        let mut keys: Vec<MetricKey> = Vec::new();
        for rule in &inner.rules {
            if !keys.contains(&rule.key) {
                keys.push(rule.key);
            }
        }
        keys
    }

    /// Number of configured rules
    pub fn rule_count(&self) -> usize {
        self.inner.read().rules.len()
    }
}

fn resolve(rule: &ThresholdRule, store: &SeriesStore, aggregator: &Aggregator, now: SystemTime) -> Option<f64> {
    match &rule.target {
        RuleTarget::Latest => store.latest(rule.key).map(|sample| sample.value),
        RuleTarget::Aggregate(spec) => aggregator.compute(rule.key, spec, now).value.as_f64(),
    }
}

fn transition(rule: &ThresholdRule, from: AlertStatus, to: AlertStatus, at: SystemTime) -> AlertTransition {
    AlertTransition {
        event_id: Uuid::new_v4(),
        rule_id: rule.id.clone(),
        from,
        to,
        at,
        severity: rule.severity,
    }
}
