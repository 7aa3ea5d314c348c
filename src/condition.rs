use tracing::{trace, warn};

use crate::types::{is_empty, number_of, text_of};
use crate::{
    Condition, ConditionEvalResult, ConditionOperator, EngineConfig, EvalError, FieldValues,
    UnknownOperatorPolicy, Value,
};

/// Check one condition. Fails only for an unknown operator under
/// [`UnknownOperatorPolicy::Error`].
pub(crate) fn check(
    config: &EngineConfig,
    condition: &Condition,
    values: &FieldValues,
) -> Result<ConditionEvalResult, EvalError> {
    let actual = values.get(&condition.field_id);
    let passed = match compare(&condition.operator, actual, condition.value.as_ref()) {
        Some(passed) => passed,
        None => resolve_unknown(config.unknown_operator, condition)?,
    };

    trace!(
        field = %condition.field_id,
        operator = %condition.operator,
        passed,
        "condition evaluated"
    );

    Ok(ConditionEvalResult {
        condition: condition.clone(),
        actual_value: actual.cloned(),
        passed,
    })
}

/// Check one condition, folding any failure into `passed = false`.
pub(crate) fn evaluate(
    config: &EngineConfig,
    condition: &Condition,
    values: &FieldValues,
) -> ConditionEvalResult {
    check(config, condition, values).unwrap_or_else(|_| ConditionEvalResult {
        condition: condition.clone(),
        actual_value: values.get(&condition.field_id).cloned(),
        passed: false,
    })
}

/// `None` when the operator is not one the engine knows.
fn compare(op: &ConditionOperator, actual: Option<&Value>, expected: Option<&Value>) -> Option<bool> {
    let passed = match op {
        ConditionOperator::Equals => text_of(actual) == text_of(expected),
        ConditionOperator::NotEquals => text_of(actual) != text_of(expected),
        ConditionOperator::Contains => lowered(actual).contains(&lowered(expected)),
        ConditionOperator::NotContains => !lowered(actual).contains(&lowered(expected)),
        ConditionOperator::StartsWith => lowered(actual).starts_with(&lowered(expected)),
        ConditionOperator::EndsWith => lowered(actual).ends_with(&lowered(expected)),
        // NaN on either side makes all four false.
        ConditionOperator::GreaterThan => number_of(actual) > number_of(expected),
        ConditionOperator::LessThan => number_of(actual) < number_of(expected),
        ConditionOperator::GreaterOrEqual => number_of(actual) >= number_of(expected),
        ConditionOperator::LessOrEqual => number_of(actual) <= number_of(expected),
        ConditionOperator::IsEmpty => is_empty(actual),
        ConditionOperator::IsNotEmpty => !is_empty(actual),
        ConditionOperator::IsChecked => is_checked(actual),
        ConditionOperator::IsNotChecked => !is_checked(actual),
        ConditionOperator::Unknown(_) => return None,
    };
    Some(passed)
}

fn lowered(value: Option<&Value>) -> String {
    text_of(value).to_lowercase()
}

fn is_checked(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn resolve_unknown(policy: UnknownOperatorPolicy, condition: &Condition) -> Result<bool, EvalError> {
    warn!(
        field = %condition.field_id,
        operator = %condition.operator,
        ?policy,
        "unknown condition operator"
    );
    match policy {
        UnknownOperatorPolicy::Deny => Ok(false),
        UnknownOperatorPolicy::Allow => Ok(true),
        UnknownOperatorPolicy::Error => Err(EvalError::UnknownOperator {
            field: condition.field_id.clone(),
            operator: condition.operator.to_string(),
        }),
    }
}
