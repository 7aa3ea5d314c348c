use std::fmt;

use super::Value;

/// Comparison operators a condition can use.
///
/// Operator names round-trip through their camelCase string form (the form
/// builder's wire format). Names this engine does not know are preserved as
/// [`ConditionOperator::Unknown`] and resolved by the
/// [`UnknownOperatorPolicy`](super::UnknownOperatorPolicy) at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(from = "String", into = "String"))]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    StartsWith,
    EndsWith,
    GreaterOrEqual,
    LessOrEqual,
    IsChecked,
    IsNotChecked,
    Unknown(String),
}

impl ConditionOperator {
    /// Every operator the engine evaluates, in declaration order.
    pub const KNOWN: [ConditionOperator; 14] = [
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
        ConditionOperator::Contains,
        ConditionOperator::NotContains,
        ConditionOperator::GreaterThan,
        ConditionOperator::LessThan,
        ConditionOperator::IsEmpty,
        ConditionOperator::IsNotEmpty,
        ConditionOperator::StartsWith,
        ConditionOperator::EndsWith,
        ConditionOperator::GreaterOrEqual,
        ConditionOperator::LessOrEqual,
        ConditionOperator::IsChecked,
        ConditionOperator::IsNotChecked,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notEquals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "notContains",
            ConditionOperator::GreaterThan => "greaterThan",
            ConditionOperator::LessThan => "lessThan",
            ConditionOperator::IsEmpty => "isEmpty",
            ConditionOperator::IsNotEmpty => "isNotEmpty",
            ConditionOperator::StartsWith => "startsWith",
            ConditionOperator::EndsWith => "endsWith",
            ConditionOperator::GreaterOrEqual => "greaterOrEqual",
            ConditionOperator::LessOrEqual => "lessOrEqual",
            ConditionOperator::IsChecked => "isChecked",
            ConditionOperator::IsNotChecked => "isNotChecked",
            ConditionOperator::Unknown(name) => name,
        }
    }

    /// Whether the operator reads the condition's comparison operand.
    #[must_use]
    pub fn takes_operand(&self) -> bool {
        !matches!(
            self,
            ConditionOperator::IsEmpty
                | ConditionOperator::IsNotEmpty
                | ConditionOperator::IsChecked
                | ConditionOperator::IsNotChecked
        )
    }

    /// Whether the operator compares numeric casts of both sides.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ConditionOperator::GreaterThan
                | ConditionOperator::LessThan
                | ConditionOperator::GreaterOrEqual
                | ConditionOperator::LessOrEqual
        )
    }
}

impl From<&str> for ConditionOperator {
    fn from(name: &str) -> Self {
        match name {
            "equals" => ConditionOperator::Equals,
            "notEquals" => ConditionOperator::NotEquals,
            "contains" => ConditionOperator::Contains,
            "notContains" => ConditionOperator::NotContains,
            "greaterThan" => ConditionOperator::GreaterThan,
            "lessThan" => ConditionOperator::LessThan,
            "isEmpty" => ConditionOperator::IsEmpty,
            "isNotEmpty" => ConditionOperator::IsNotEmpty,
            "startsWith" => ConditionOperator::StartsWith,
            "endsWith" => ConditionOperator::EndsWith,
            "greaterOrEqual" | "greaterThanOrEqual" => ConditionOperator::GreaterOrEqual,
            "lessOrEqual" | "lessThanOrEqual" => ConditionOperator::LessOrEqual,
            "isChecked" => ConditionOperator::IsChecked,
            "isNotChecked" => ConditionOperator::IsNotChecked,
            other => ConditionOperator::Unknown(other.to_owned()),
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(name: String) -> Self {
        ConditionOperator::from(name.as_str())
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        match op {
            ConditionOperator::Unknown(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule combines the results of its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicOperator {
    /// Every condition must pass. Vacuously true with no conditions.
    #[default]
    #[cfg_attr(feature = "json", serde(rename = "AND"))]
    And,
    /// At least one condition must pass. Vacuously false with no conditions.
    #[cfg_attr(feature = "json", serde(rename = "OR"))]
    Or,
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOperator::And => write!(f, "AND"),
            LogicOperator::Or => write!(f, "OR"),
        }
    }
}

/// A single comparison against one field's value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct Condition {
    pub field_id: String,
    pub operator: ConditionOperator,
    /// Comparison operand. Ignored by the emptiness and checked operators.
    #[cfg_attr(
        feature = "json",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub value: Option<Value>,
}

impl Condition {
    #[must_use]
    pub fn new(field_id: &str, operator: ConditionOperator, value: Option<Value>) -> Self {
        Self {
            field_id: field_id.to_owned(),
            operator,
            value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) if self.operator.takes_operand() => {
                write!(f, "{} {} {v}", self.field_id, self.operator)
            }
            _ => write!(f, "{} {}", self.field_id, self.operator),
        }
    }
}

/// Intermediate builder for conditions on one field.
/// Created by [`field()`]; each method yields a finished [`Condition`].
#[derive(Debug, Clone)]
pub struct FieldCondition {
    field_id: String,
}

impl FieldCondition {
    fn compare(self, operator: ConditionOperator, value: impl Into<Value>) -> Condition {
        Condition {
            field_id: self.field_id,
            operator,
            value: Some(value.into()),
        }
    }

    fn unary(self, operator: ConditionOperator) -> Condition {
        Condition {
            field_id: self.field_id,
            operator,
            value: None,
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Equals, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::NotEquals, value)
    }

    #[must_use]
    pub fn contains(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Contains, value)
    }

    #[must_use]
    pub fn not_contains(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::NotContains, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::GreaterThan, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::LessThan, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::GreaterOrEqual, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::LessOrEqual, value)
    }

    #[must_use]
    pub fn starts_with(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::StartsWith, value)
    }

    #[must_use]
    pub fn ends_with(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::EndsWith, value)
    }

    #[must_use]
    pub fn is_empty(self) -> Condition {
        self.unary(ConditionOperator::IsEmpty)
    }

    #[must_use]
    pub fn is_not_empty(self) -> Condition {
        self.unary(ConditionOperator::IsNotEmpty)
    }

    #[must_use]
    pub fn is_checked(self) -> Condition {
        self.unary(ConditionOperator::IsChecked)
    }

    #[must_use]
    pub fn is_not_checked(self) -> Condition {
        self.unary(ConditionOperator::IsNotChecked)
    }

    /// Condition with an operator given by name, for operators outside the
    /// typed helpers.
    #[must_use]
    pub fn op(self, operator: &str, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::from(operator), value)
    }
}

#[must_use]
pub fn field(field_id: &str) -> FieldCondition {
    FieldCondition {
        field_id: field_id.to_owned(),
    }
}
