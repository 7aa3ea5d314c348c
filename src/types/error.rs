use thiserror::Error;

/// Structural problems found when building a [`RuleSet`](super::RuleSet).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rule at position {position} has an empty id")]
    EmptyRuleId { position: usize },

    #[error("duplicate rule id '{id}'")]
    DuplicateRule { id: String },

    #[error("condition {position} in rule '{rule}' has an empty field id")]
    EmptyFieldId { rule: String, position: usize },

    #[error("action {position} in rule '{rule}' has an empty target id")]
    EmptyTargetId { rule: String, position: usize },

    #[error("setValue action on '{target}' in rule '{rule}' has no value")]
    MissingSetValue { rule: String, target: String },
}

/// Failures while evaluating a single rule.
///
/// These never escape a session: the rule is recorded with status
/// [`RuleStatus::Error`](super::RuleStatus::Error) and the pass moves on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("unknown operator '{operator}' on field '{field}'")]
    UnknownOperator { field: String, operator: String },

    #[error("setValue action on '{target}' has no value")]
    MissingSetValue { target: String },
}
