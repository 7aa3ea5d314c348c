use std::collections::HashSet;

use crate::{ActionType, Rule, ValidationError};

pub(crate) fn validate(rules: &[Rule]) -> Result<(), ValidationError> {
    check_ids(rules)?;
    for rule in rules {
        check_conditions(rule)?;
        check_actions(rule)?;
    }
    Ok(())
}

fn check_ids(rules: &[Rule]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (position, rule) in rules.iter().enumerate() {
        if rule.id.is_empty() {
            return Err(ValidationError::EmptyRuleId { position });
        }
        if !seen.insert(rule.id.as_str()) {
            return Err(ValidationError::DuplicateRule {
                id: rule.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_conditions(rule: &Rule) -> Result<(), ValidationError> {
    match rule.conditions.iter().position(|c| c.field_id.is_empty()) {
        Some(position) => Err(ValidationError::EmptyFieldId {
            rule: rule.id.clone(),
            position,
        }),
        None => Ok(()),
    }
}

fn check_actions(rule: &Rule) -> Result<(), ValidationError> {
    for (position, action) in rule.actions.iter().enumerate() {
        if action.target_id.is_empty() {
            return Err(ValidationError::EmptyTargetId {
                rule: rule.id.clone(),
                position,
            });
        }
        if action.action_type == ActionType::SetValue && action.value.is_none() {
            return Err(ValidationError::MissingSetValue {
                rule: rule.id.clone(),
                target: action.target_id.clone(),
            });
        }
    }
    Ok(())
}
