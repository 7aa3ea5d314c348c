use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    condition, ActionType, ConditionEvalResult, EngineConfig, EvalError, FieldValues,
    LogicOperator, Rule, RuleEvaluation,
};

/// Evaluate one rule.
///
/// Order of precedence: a disabled rule is skipped without looking at its
/// conditions; a rule with a breakpoint (unless `released`) pauses after its
/// conditions are checked; anything else fires or is skipped. A failure in
/// the last step yields an `error` evaluation instead.
pub(crate) fn evaluate_rule(
    config: &EngineConfig,
    rule: &Rule,
    values: &FieldValues,
    breakpoints: &HashSet<String>,
    released: bool,
) -> RuleEvaluation {
    if !rule.enabled {
        debug!(rule = %rule.id, "rule disabled");
        return RuleEvaluation::disabled(rule);
    }

    if !released && breakpoints.contains(&rule.id) {
        let results: Vec<ConditionEvalResult> = rule
            .conditions
            .iter()
            .map(|c| condition::evaluate(config, c, values))
            .collect();
        let met = reduce(rule.condition_operator, &results);
        debug!(rule = %rule.id, met, "paused on breakpoint");
        return RuleEvaluation::paused(rule, results, met);
    }

    match settle(config, rule, values) {
        Ok(evaluation) => {
            debug!(rule = %rule.id, status = %evaluation.status(), "rule evaluated");
            evaluation
        }
        Err(err) => {
            warn!(rule = %rule.id, error = %err, "rule evaluation failed");
            RuleEvaluation::failed(rule, err.to_string())
        }
    }
}

fn settle(
    config: &EngineConfig,
    rule: &Rule,
    values: &FieldValues,
) -> Result<RuleEvaluation, EvalError> {
    let results = rule
        .conditions
        .iter()
        .map(|c| condition::check(config, c, values))
        .collect::<Result<Vec<_>, _>>()?;
    let met = reduce(rule.condition_operator, &results);
    if met {
        check_actions(rule)?;
    }
    Ok(RuleEvaluation::settled(rule, results, met))
}

/// A rule fires with all of its actions or none of them, so every action is
/// checked before any is recorded.
fn check_actions(rule: &Rule) -> Result<(), EvalError> {
    for action in &rule.actions {
        if action.action_type == ActionType::SetValue && action.value.is_none() {
            return Err(EvalError::MissingSetValue {
                target: action.target_id.clone(),
            });
        }
    }
    Ok(())
}

/// AND over no results is true, OR over no results is false.
pub(crate) fn reduce(op: LogicOperator, results: &[ConditionEvalResult]) -> bool {
    match op {
        LogicOperator::And => results.iter().all(|r| r.passed),
        LogicOperator::Or => results.iter().any(|r| r.passed),
    }
}
