use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::condition::Condition;
use super::rule::{Action, Rule};
use super::Value;

/// Outcome state of one rule in a pass.
///
/// Every evaluation starts `Pending` and ends in exactly one of the other
/// four states. `Pending` is only observed for rules a partial pass never
/// reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub enum RuleStatus {
    Pending,
    Fired,
    Skipped,
    Breakpoint,
    Error,
}

impl RuleStatus {
    /// Marker used in session traces.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            RuleStatus::Fired => '✓',
            RuleStatus::Skipped => '✗',
            RuleStatus::Breakpoint => '⏸',
            RuleStatus::Error => '⚠',
            RuleStatus::Pending => '○',
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleStatus::Pending => "pending",
            RuleStatus::Fired => "fired",
            RuleStatus::Skipped => "skipped",
            RuleStatus::Breakpoint => "breakpoint",
            RuleStatus::Error => "error",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one condition against the current field values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct ConditionEvalResult {
    pub condition: Condition,
    /// The raw looked-up value before any coercion. `None` when the field
    /// was absent from the value map.
    pub actual_value: Option<Value>,
    pub passed: bool,
}

/// Identifies a rule by id and display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleRef {
    pub id: String,
    pub name: String,
}

impl RuleRef {
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl From<&Rule> for RuleRef {
    fn from(rule: &Rule) -> Self {
        Self::new(&rule.id, &rule.name)
    }
}

/// The outcome of evaluating one rule.
///
/// Only the evaluator constructs these, which keeps the status invariants in
/// one place: a fired rule executed exactly its own actions, a skipped rule
/// executed none, and an errored rule carries a message and no partial
/// results.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
#[must_use]
pub struct RuleEvaluation {
    rule_id: String,
    rule_name: String,
    status: RuleStatus,
    conditions_met: bool,
    condition_results: Vec<ConditionEvalResult>,
    executed_actions: Vec<Action>,
    timestamp: u64,
    #[cfg_attr(
        feature = "json",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    error: Option<String>,
}

impl RuleEvaluation {
    fn blank(rule: &Rule, status: RuleStatus) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            status,
            conditions_met: false,
            condition_results: Vec::new(),
            executed_actions: Vec::new(),
            timestamp: now_millis(),
            error: None,
        }
    }

    pub(crate) fn disabled(rule: &Rule) -> Self {
        Self::blank(rule, RuleStatus::Skipped)
    }

    /// `fired` when `met`, `skipped` otherwise.
    pub(crate) fn settled(rule: &Rule, results: Vec<ConditionEvalResult>, met: bool) -> Self {
        let status = if met {
            RuleStatus::Fired
        } else {
            RuleStatus::Skipped
        };
        Self {
            conditions_met: met,
            condition_results: results,
            executed_actions: if met { rule.actions.clone() } else { Vec::new() },
            ..Self::blank(rule, status)
        }
    }

    /// Paused on a breakpoint. Actions are previewed only when the conditions
    /// held.
    pub(crate) fn paused(rule: &Rule, results: Vec<ConditionEvalResult>, met: bool) -> Self {
        Self {
            conditions_met: met,
            condition_results: results,
            executed_actions: if met { rule.actions.clone() } else { Vec::new() },
            ..Self::blank(rule, RuleStatus::Breakpoint)
        }
    }

    pub(crate) fn failed(rule: &Rule, message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::blank(rule, RuleStatus::Error)
        }
    }

    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    #[must_use]
    pub fn status(&self) -> RuleStatus {
        self.status
    }

    #[must_use]
    pub fn conditions_met(&self) -> bool {
        self.conditions_met
    }

    #[must_use]
    pub fn condition_results(&self) -> &[ConditionEvalResult] {
        &self.condition_results
    }

    /// Actions this rule applied (or, for a breakpoint, would apply).
    #[must_use]
    pub fn executed_actions(&self) -> &[Action] {
        &self.executed_actions
    }

    /// Milliseconds since the Unix epoch at which the evaluation finished.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether this evaluation's actions take effect in conflict detection
    /// and the state snapshot: fired rules, and breakpoints whose conditions
    /// held.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        match self.status {
            RuleStatus::Fired => true,
            RuleStatus::Breakpoint => self.conditions_met,
            RuleStatus::Pending | RuleStatus::Skipped | RuleStatus::Error => false,
        }
    }

    /// One-line trace marker, e.g. `✓ Adult consent (fired)`.
    #[must_use]
    pub fn trace_line(&self) -> String {
        match &self.error {
            Some(message) => format!(
                "{} {} ({}: {message})",
                self.status.glyph(),
                self.rule_name,
                self.status
            ),
            None => format!(
                "{} {} ({})",
                self.status.glyph(),
                self.rule_name,
                self.status
            ),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
