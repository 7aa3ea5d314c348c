use crate::{Condition, ConditionOperator, EdgeCase, FieldValues, Rule, Value};

pub const ALL_EMPTY: &str = "All Empty";
pub const HAPPY_PATH: &str = "Happy Path";
pub const INVERTED: &str = "Inverted";
pub const BOUNDARY_VALUES: &str = "Boundary Values";
pub const CONTRADICTORY: &str = "Contradictory";

/// Synthesize adversarial and boundary inputs from rule definitions alone.
///
/// Always returns, in order, [`ALL_EMPTY`], [`HAPPY_PATH`] and [`INVERTED`];
/// then [`BOUNDARY_VALUES`] if any condition is numeric, and
/// [`CONTRADICTORY`] if there are at least two rules. Disabled rules are
/// included. The output depends only on `rules`.
#[must_use]
pub fn generate_edge_cases(rules: &[Rule]) -> Vec<EdgeCase> {
    let happy = happy_path(rules);

    let mut cases = vec![
        EdgeCase {
            label: ALL_EMPTY.to_owned(),
            description: "Every field referenced by a rule is blank".to_owned(),
            values: all_empty(rules),
        },
        EdgeCase {
            label: HAPPY_PATH.to_owned(),
            description: "Values chosen so that each condition passes".to_owned(),
            values: happy.clone(),
        },
        EdgeCase {
            label: INVERTED.to_owned(),
            description: "Values chosen so that each condition fails".to_owned(),
            values: inverted(rules),
        },
    ];

    if conditions(rules).any(|c| c.operator.is_numeric()) {
        cases.push(EdgeCase {
            label: BOUNDARY_VALUES.to_owned(),
            description: "Happy path with numeric fields set exactly at their thresholds"
                .to_owned(),
            values: boundary(rules, happy),
        });
    }

    if rules.len() >= 2 {
        cases.push(EdgeCase {
            label: CONTRADICTORY.to_owned(),
            description:
                "Every rule satisfied at once, keeping the tightest numeric bound per field"
                    .to_owned(),
            values: contradictory(rules),
        });
    }

    cases
}

fn conditions(rules: &[Rule]) -> impl Iterator<Item = &Condition> {
    rules.iter().flat_map(|r| r.conditions.iter())
}

fn all_empty(rules: &[Rule]) -> FieldValues {
    rules
        .iter()
        .flat_map(Rule::referenced_fields)
        .map(|id| (id, ""))
        .collect()
}

/// Numeric threshold of a condition's operand, if it has one.
fn threshold(condition: &Condition) -> Option<f64> {
    condition
        .value
        .as_ref()
        .map(Value::to_number)
        .filter(|n| !n.is_nan())
}

/// The operand shifted by `delta`; non-numeric operands are returned as-is.
fn shifted(condition: &Condition, delta: f64) -> Option<Value> {
    match threshold(condition) {
        Some(n) => Some(Value::Number(n + delta)),
        None => condition.value.clone(),
    }
}

fn operand_text(condition: &Condition) -> Option<String> {
    condition.value.as_ref().map(Value::to_text)
}

/// A value that makes `condition` pass, if one is obvious.
fn satisfying(condition: &Condition) -> Option<Value> {
    match condition.operator {
        ConditionOperator::Equals
        | ConditionOperator::Contains
        | ConditionOperator::StartsWith
        | ConditionOperator::EndsWith
        | ConditionOperator::GreaterOrEqual
        | ConditionOperator::LessOrEqual => condition.value.clone(),
        ConditionOperator::GreaterThan => shifted(condition, 1.0),
        ConditionOperator::LessThan => shifted(condition, -1.0),
        ConditionOperator::IsNotEmpty => Some(Value::from("test-value")),
        ConditionOperator::IsEmpty => Some(Value::from("")),
        ConditionOperator::IsChecked => Some(Value::Bool(true)),
        ConditionOperator::IsNotChecked => Some(Value::Bool(false)),
        ConditionOperator::NotEquals
        | ConditionOperator::NotContains
        | ConditionOperator::Unknown(_) => None,
    }
}

/// A value that makes `condition` fail, if one is obvious.
fn violating(condition: &Condition) -> Option<Value> {
    match condition.operator {
        ConditionOperator::Equals | ConditionOperator::StartsWith => {
            operand_text(condition).map(|v| Value::String(format!("NOT_{v}")))
        }
        ConditionOperator::EndsWith => {
            operand_text(condition).map(|v| Value::String(format!("{v}_NOT")))
        }
        ConditionOperator::NotEquals | ConditionOperator::NotContains => condition.value.clone(),
        ConditionOperator::GreaterThan | ConditionOperator::GreaterOrEqual => {
            shifted(condition, -1.0)
        }
        ConditionOperator::LessThan | ConditionOperator::LessOrEqual => shifted(condition, 1.0),
        ConditionOperator::IsEmpty => Some(Value::from("filled")),
        ConditionOperator::IsNotEmpty => Some(Value::from("")),
        ConditionOperator::Contains => Some(Value::from("unrelated-value")),
        ConditionOperator::IsChecked => Some(Value::Bool(false)),
        ConditionOperator::IsNotChecked => Some(Value::Bool(true)),
        ConditionOperator::Unknown(_) => None,
    }
}

fn assign_each(rules: &[Rule], pick: impl Fn(&Condition) -> Option<Value>) -> FieldValues {
    let mut values = FieldValues::new();
    for condition in conditions(rules) {
        if let Some(value) = pick(condition) {
            values.insert(&condition.field_id, value);
        }
    }
    values
}

fn happy_path(rules: &[Rule]) -> FieldValues {
    assign_each(rules, satisfying)
}

fn inverted(rules: &[Rule]) -> FieldValues {
    assign_each(rules, violating)
}

fn boundary(rules: &[Rule], mut values: FieldValues) -> FieldValues {
    for condition in conditions(rules).filter(|c| c.operator.is_numeric()) {
        let at_threshold = threshold(condition)
            .map(Value::Number)
            .or_else(|| condition.value.clone());
        if let Some(value) = at_threshold {
            values.insert(&condition.field_id, value);
        }
    }
    values
}

fn contradictory(rules: &[Rule]) -> FieldValues {
    let mut values = FieldValues::new();
    for condition in conditions(rules) {
        let bound = match condition.operator {
            ConditionOperator::GreaterThan => threshold(condition).map(|t| (t + 1.0, true)),
            ConditionOperator::GreaterOrEqual => threshold(condition).map(|t| (t, true)),
            ConditionOperator::LessThan => threshold(condition).map(|t| (t - 1.0, false)),
            ConditionOperator::LessOrEqual => threshold(condition).map(|t| (t, false)),
            _ => None,
        };

        let next = match bound {
            Some((candidate, lower_bound)) => {
                let existing = values
                    .get(&condition.field_id)
                    .map(Value::to_number)
                    .filter(|n| !n.is_nan());
                let tightest = match existing {
                    Some(e) if lower_bound => e.max(candidate),
                    Some(e) => e.min(candidate),
                    None => candidate,
                };
                Some(Value::Number(tightest))
            }
            None => satisfying(condition),
        };

        if let Some(value) = next {
            values.insert(&condition.field_id, value);
        }
    }
    values
}
