use thiserror::Error;

/// Rule configuration errors.
///
/// All of these are load-time failures: a malformed rule set is
/// rejected before it ever reaches evaluation.
#[derive(Error, Debug)]
pub enum RuleError {
    /// Rule set document could not be parsed.
    ///
    /// This is also where a rule referencing an unknown metric key
    /// surfaces, since the key set is closed.
    #[error("failed to parse rule set: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two rules share an id
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// Rule id is empty
    #[error("rule id cannot be empty")]
    EmptyRuleId,

    /// Threshold bound is NaN or infinite
    #[error("non-finite bound in rule {rule_id}")]
    InvalidBound { rule_id: String },

    /// Aggregate-targeting rule has a zero-length window
    #[error("zero-length window in rule {rule_id}")]
    EmptyWindow { rule_id: String },
}
