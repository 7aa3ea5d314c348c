use std::collections::HashSet;

use tracing::debug;

use crate::conflict::detect_conflicts;
use crate::evaluate::evaluate_rule;
use crate::snapshot::build_snapshot;
use crate::{
    Action, ActionType, Coverage, DebugSession, EngineConfig, FieldValues, Rule, RuleStatus,
};

/// Where a pass stops and which breakpoints it passes through.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunPlan {
    /// Last rule index to evaluate.
    pub(crate) stop_at: Option<usize>,
    /// Breakpoints on rules at or before this index are ignored.
    pub(crate) released_through: Option<usize>,
}

/// Evaluate `rules` in order against progressively updated values.
///
/// A fired `setValue` is visible to every later rule in the same pass. The
/// pass ends at the first breakpoint, at `plan.stop_at`, or at the end of the
/// list, and the snapshot, conflicts, and coverage cover only the rules
/// reached.
pub(crate) fn run(
    config: &EngineConfig,
    rules: &[Rule],
    values: &FieldValues,
    breakpoints: &HashSet<String>,
    plan: RunPlan,
) -> DebugSession {
    let limit = plan
        .stop_at
        .map_or(rules.len(), |i| i.saturating_add(1).min(rules.len()));

    let mut working = values.clone();
    let mut evaluations = Vec::with_capacity(limit);
    let mut trace = Vec::with_capacity(rules.len());
    let mut paused_at_index = None;

    for (index, rule) in rules.iter().take(limit).enumerate() {
        let released = plan.released_through.is_some_and(|last| index <= last);
        let evaluation = evaluate_rule(config, rule, &working, breakpoints, released);
        trace.push(evaluation.trace_line());

        if evaluation.status() == RuleStatus::Fired {
            working = propagate(working, evaluation.executed_actions());
        }

        let halted = evaluation.status() == RuleStatus::Breakpoint;
        evaluations.push(evaluation);
        if halted {
            paused_at_index = Some(index);
            break;
        }
    }

    if config.trace_unreached {
        let pending = RuleStatus::Pending;
        trace.extend(
            rules
                .iter()
                .skip(evaluations.len())
                .map(|r| format!("{} {} ({pending})", pending.glyph(), r.name)),
        );
    }

    let fired = evaluations
        .iter()
        .filter(|e| e.status() == RuleStatus::Fired)
        .count();
    let coverage = Coverage::new(fired, evaluations.len());
    let snapshot = build_snapshot(&evaluations, values);
    let conflicts = detect_conflicts(&evaluations);
    let stepping = evaluations.len() < rules.len();

    debug!(
        evaluated = evaluations.len(),
        total = rules.len(),
        fired,
        paused = ?paused_at_index,
        conflicts = conflicts.len(),
        "debug session finished"
    );

    DebugSession {
        evaluations,
        snapshot,
        conflicts,
        coverage,
        paused_at_index,
        stepping,
        trace,
        rule_count: rules.len(),
    }
}

fn propagate(values: FieldValues, actions: &[Action]) -> FieldValues {
    actions
        .iter()
        .filter(|a| a.action_type == ActionType::SetValue)
        .fold(values, |acc, action| match &action.value {
            Some(value) => acc.with(&action.target_id, value.clone()),
            None => acc,
        })
}
