use std::fmt;

use super::condition::{Condition, LogicOperator};
use super::Value;

/// A named conditional-logic rule: when its conditions hold, its actions
/// apply to their targets.
///
/// Rules are authored by the form builder and treated as read-only input.
/// Build them with [`RuleSetBuilder`](super::RuleSetBuilder), parse them with
/// [`RuleSet::from_dsl()`](super::RuleSet::from_dsl), or construct the struct
/// directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "json", serde(default = "enabled_default"))]
    pub enabled: bool,
    #[cfg_attr(feature = "json", serde(default))]
    pub conditions: Vec<Condition>,
    #[cfg_attr(feature = "json", serde(default))]
    pub condition_operator: LogicOperator,
    #[cfg_attr(feature = "json", serde(default))]
    pub actions: Vec<Action>,
    /// The field whose change re-triggers evaluation. Informational only.
    #[cfg_attr(
        feature = "json",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub trigger_field_id: Option<String>,
}

#[cfg(feature = "json")]
fn enabled_default() -> bool {
    true
}

impl Rule {
    /// An enabled rule with no conditions and no actions.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            enabled: true,
            conditions: Vec::new(),
            condition_operator: LogicOperator::And,
            actions: Vec::new(),
            trigger_field_id: None,
        }
    }

    /// Field ids this rule reads: the trigger field first, then each
    /// condition field in order. May contain duplicates.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.trigger_field_id
            .as_deref()
            .into_iter()
            .chain(self.conditions.iter().map(|c| c.field_id.as_str()))
    }
}

/// Kinds of effect an action can have on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub enum ActionType {
    Show,
    Hide,
    Enable,
    Disable,
    Require,
    SetValue,
    /// Page navigation. Recognized but not folded into form state.
    Navigate,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::Show => "show",
            ActionType::Hide => "hide",
            ActionType::Enable => "enable",
            ActionType::Disable => "disable",
            ActionType::Require => "require",
            ActionType::SetValue => "setValue",
            ActionType::Navigate => "navigate",
        };
        f.write_str(name)
    }
}

/// An effect applied to a target field when a rule fires.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct Action {
    #[cfg_attr(feature = "json", serde(rename = "type"))]
    pub action_type: ActionType,
    pub target_id: String,
    /// Only meaningful for [`ActionType::SetValue`].
    #[cfg_attr(
        feature = "json",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub value: Option<Value>,
}

impl Action {
    fn targeting(action_type: ActionType, target_id: &str) -> Self {
        Self {
            action_type,
            target_id: target_id.to_owned(),
            value: None,
        }
    }

    #[must_use]
    pub fn show(target_id: &str) -> Self {
        Self::targeting(ActionType::Show, target_id)
    }

    #[must_use]
    pub fn hide(target_id: &str) -> Self {
        Self::targeting(ActionType::Hide, target_id)
    }

    #[must_use]
    pub fn enable(target_id: &str) -> Self {
        Self::targeting(ActionType::Enable, target_id)
    }

    #[must_use]
    pub fn disable(target_id: &str) -> Self {
        Self::targeting(ActionType::Disable, target_id)
    }

    #[must_use]
    pub fn require(target_id: &str) -> Self {
        Self::targeting(ActionType::Require, target_id)
    }

    #[must_use]
    pub fn navigate(target_id: &str) -> Self {
        Self::targeting(ActionType::Navigate, target_id)
    }

    #[must_use]
    pub fn set_value(target_id: &str, value: impl Into<Value>) -> Self {
        Self {
            action_type: ActionType::SetValue,
            target_id: target_id.to_owned(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.action_type, &self.value) {
            (ActionType::SetValue, Some(v)) => write!(f, "setValue {} = {v}", self.target_id),
            (kind, _) => write!(f, "{kind} {}", self.target_id),
        }
    }
}
