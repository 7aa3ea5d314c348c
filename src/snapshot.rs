use crate::{ActionType, DebuggerSnapshot, FieldValues, RuleEvaluation};

/// Fold the actions of every effective evaluation, in order, into derived
/// form state. Later actions on the same target overwrite earlier ones.
///
/// `field_values` in the result is `initial_values` with every `setValue`
/// override applied. `navigate` actions do not affect form state.
#[must_use]
pub fn build_snapshot(
    evaluations: &[RuleEvaluation],
    initial_values: &FieldValues,
) -> DebuggerSnapshot {
    let mut snapshot = DebuggerSnapshot::default();

    for evaluation in evaluations.iter().filter(|e| e.is_effective()) {
        for action in evaluation.executed_actions() {
            let target = action.target_id.clone();
            match action.action_type {
                ActionType::Show => {
                    snapshot.visibility.insert(target, true);
                }
                ActionType::Hide => {
                    snapshot.visibility.insert(target, false);
                }
                ActionType::Enable => {
                    snapshot.enabled_state.insert(target, true);
                }
                ActionType::Disable => {
                    snapshot.enabled_state.insert(target, false);
                }
                ActionType::Require => {
                    snapshot.required_state.insert(target, true);
                }
                ActionType::SetValue => {
                    if let Some(value) = &action.value {
                        snapshot.set_values.insert(&target, value.clone());
                    }
                }
                ActionType::Navigate => {}
            }
        }
    }

    snapshot.field_values = initial_values.merged(&snapshot.set_values);
    snapshot
}
