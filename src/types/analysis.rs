use std::collections::BTreeMap;
use std::fmt;

use super::evaluation::RuleRef;
use super::rule::ActionType;
use super::FieldValues;

/// Derived UI state after folding every effective action of a pass.
///
/// Targets absent from a map were not touched by any effective action; the
/// caller falls back to the form's authored defaults for them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct DebuggerSnapshot {
    pub visibility: BTreeMap<String, bool>,
    pub enabled_state: BTreeMap<String, bool>,
    pub required_state: BTreeMap<String, bool>,
    /// Values written by `setValue` actions, last write wins.
    pub set_values: FieldValues,
    /// The input values with every `setValue` override applied.
    pub field_values: FieldValues,
}

impl DebuggerSnapshot {
    #[must_use]
    pub fn is_visible(&self, target_id: &str) -> Option<bool> {
        self.visibility.get(target_id).copied()
    }

    #[must_use]
    pub fn is_enabled(&self, target_id: &str) -> Option<bool> {
        self.enabled_state.get(target_id).copied()
    }

    #[must_use]
    pub fn is_required(&self, target_id: &str) -> Option<bool> {
        self.required_state.get(target_id).copied()
    }
}

/// Which pair of opposing actions a conflict involves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub enum ConflictKind {
    /// `show` against `hide`.
    Visibility,
    /// `enable` against `disable`.
    Enablement,
    /// `require` against `disable`.
    RequiredButDisabled,
}

impl ConflictKind {
    /// All kinds, each with its opposing action types, in detection order.
    pub(crate) const PAIRS: [(ConflictKind, ActionType, ActionType); 3] = [
        (ConflictKind::Visibility, ActionType::Show, ActionType::Hide),
        (ConflictKind::Enablement, ActionType::Enable, ActionType::Disable),
        (
            ConflictKind::RequiredButDisabled,
            ActionType::Require,
            ActionType::Disable,
        ),
    ];
}

/// Two effective rules applying contradictory actions to the same target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct RuleConflict {
    pub rule_a: RuleRef,
    pub rule_b: RuleRef,
    pub target_id: String,
    pub kind: ConflictKind,
    pub description: String,
}

impl fmt::Display for RuleConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Share of evaluated rules that fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Coverage {
    pub fired: usize,
    pub total: usize,
    /// `fired / total` as a whole percentage, rounded to nearest. Zero when
    /// nothing was evaluated.
    pub percentage: u32,
}

impl Coverage {
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(fired: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (fired as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            fired,
            total,
            percentage,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.fired, self.total, self.percentage)
    }
}

/// A synthetic field-value map built to exercise a particular rule behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeCase {
    pub label: String,
    pub description: String,
    pub values: FieldValues,
}
