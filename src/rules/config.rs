use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::aggregate::AggregateSpec;
use crate::sample::MetricKey;
use super::error::RuleError;

/// Comparison operator applied between the observed value and the bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl Comparator {
    /// Whether the threshold condition holds for `value`
    pub fn holds(&self, value: f64, bound: f64) -> bool {
        match self {
            Comparator::Lt => value < bound,
            Comparator::Le => value <= bound,
            Comparator::Gt => value > bound,
            Comparator::Ge => value >= bound,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

/// Operator-assigned weight of a rule breach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// What value a rule is checked against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    /// Latest ingested sample for the rule's key
    Latest,
    /// Derived aggregate over a trailing window
    Aggregate(AggregateSpec),
}

impl Default for RuleTarget {
    fn default() -> Self {
        RuleTarget::Latest
    }
}

/// One operator-configured alert threshold.
///
/// Rules are immutable once loaded; the engine holds them by reference
/// and never copies their semantics into samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Stable operator-assigned identifier
    pub id: String,
    /// Metric the rule watches
    pub key: MetricKey,
    /// Value the comparator is applied to
    #[serde(default)]
    pub target: RuleTarget,
    /// Comparison operator
    pub comparator: Comparator,
    /// Threshold bound
    pub bound: f64,
    /// How long the condition must hold continuously before a breach
    /// is raised; debounces transient spikes and drops
    #[serde(default)]
    pub sustained_for: Duration,
    /// Breach severity
    pub severity: Severity,
}

/// The full configured rule set, reloadable at runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<ThresholdRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    /// Parse a rule set from a JSON document.
    ///
    /// A rule naming an unknown metric key fails here with the parser's
    /// unknown-variant error rather than being silently ignored later.
    pub fn from_json(raw: &str) -> Result<Self, RuleError> {
        let set: RuleSet = serde_json::from_str(raw)?;
        set.validate()?;
        Ok(set)
    }

    /// Validate the rule set; any error here is fatal at load time
    pub fn validate(&self) -> Result<(), RuleError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.id.is_empty() {
                return Err(RuleError::EmptyRuleId);
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleError::DuplicateRuleId(rule.id.clone()));
            }
            if !rule.bound.is_finite() {
                return Err(RuleError::InvalidBound { rule_id: rule.id.clone() });
            }
            if let RuleTarget::Aggregate(spec) = &rule.target {
                if spec.window.duration.is_zero() {
                    return Err(RuleError::EmptyWindow { rule_id: rule.id.clone() });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
