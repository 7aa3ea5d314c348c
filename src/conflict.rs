use std::collections::BTreeMap;

use crate::{ActionType, ConflictKind, RuleConflict, RuleEvaluation, RuleRef};

struct Applied<'a> {
    rule_id: &'a str,
    rule_name: &'a str,
    action_type: ActionType,
}

/// Find pairs of effective rules whose actions contradict each other on the
/// same target.
///
/// Only fired rules and breakpoints whose conditions held take part. For each
/// target, every action of the first kind in an opposing pair is matched
/// against every action of the second kind from a different rule, yielding
/// one conflict per match. Targets are visited in sorted order and the pairs
/// in the order `show/hide`, `enable/disable`, `require/disable`.
#[must_use]
pub fn detect_conflicts(evaluations: &[RuleEvaluation]) -> Vec<RuleConflict> {
    let mut by_target: BTreeMap<&str, Vec<Applied<'_>>> = BTreeMap::new();
    for evaluation in evaluations.iter().filter(|e| e.is_effective()) {
        for action in evaluation.executed_actions() {
            by_target
                .entry(action.target_id.as_str())
                .or_default()
                .push(Applied {
                    rule_id: evaluation.rule_id(),
                    rule_name: evaluation.rule_name(),
                    action_type: action.action_type,
                });
        }
    }

    let mut conflicts = Vec::new();
    for (target, applied) in &by_target {
        for (kind, first, second) in ConflictKind::PAIRS {
            let lhs = applied.iter().filter(|a| a.action_type == first);
            for a in lhs {
                let rhs = applied
                    .iter()
                    .filter(|b| b.action_type == second && b.rule_id != a.rule_id);
                for b in rhs {
                    conflicts.push(RuleConflict {
                        rule_a: RuleRef::new(a.rule_id, a.rule_name),
                        rule_b: RuleRef::new(b.rule_id, b.rule_name),
                        target_id: (*target).to_owned(),
                        kind,
                        description: format!(
                            "\"{}\" {}s '{target}' but \"{}\" {}s it",
                            a.rule_name, first, b.rule_name, second
                        ),
                    });
                }
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{Action, EngineConfig, FieldValues, Rule};

    fn fired(id: &str, actions: Vec<Action>) -> RuleEvaluation {
        let mut rule = Rule::new(id, &format!("Rule {id}"));
        rule.actions = actions;
        RuleEvaluation::settled(&rule, Vec::new(), true)
    }

    #[test]
    fn show_vs_hide_is_one_conflict() {
        let evals = vec![
            fired("a", vec![Action::show("f1")]),
            fired("b", vec![Action::hide("f1")]),
        ];
        let conflicts = detect_conflicts(&evals);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].rule_a.id, "a");
        assert_eq!(conflicts[0].rule_b.id, "b");
        assert_eq!(conflicts[0].target_id, "f1");
        assert_eq!(conflicts[0].kind, ConflictKind::Visibility);
        assert_eq!(
            conflicts[0].description,
            "\"Rule a\" shows 'f1' but \"Rule b\" hides it"
        );
    }

    #[test]
    fn hide_listed_first_still_reports_show_side_as_a() {
        let evals = vec![
            fired("a", vec![Action::hide("f1")]),
            fired("b", vec![Action::show("f1")]),
        ];
        let conflicts = detect_conflicts(&evals);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].rule_a.id, "b");
        assert_eq!(conflicts[0].rule_b.id, "a");
    }

    #[test]
    fn same_rule_never_conflicts_with_itself() {
        let evals = vec![fired("a", vec![Action::require("f1"), Action::disable("f1")])];
        assert!(detect_conflicts(&evals).is_empty());
    }

    #[test]
    fn require_vs_disable() {
        let evals = vec![
            fired("a", vec![Action::require("f1")]),
            fired("b", vec![Action::disable("f1")]),
        ];
        let conflicts = detect_conflicts(&evals);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::RequiredButDisabled);
    }

    #[test]
    fn enable_and_require_against_one_disable() {
        let evals = vec![
            fired("a", vec![Action::enable("f1"), Action::require("f1")]),
            fired("b", vec![Action::disable("f1")]),
        ];
        let kinds: Vec<ConflictKind> = detect_conflicts(&evals).iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ConflictKind::Enablement, ConflictKind::RequiredButDisabled]
        );
    }

    #[test]
    fn cross_product_of_instances() {
        let evals = vec![
            fired("a", vec![Action::show("f1")]),
            fired("b", vec![Action::show("f1")]),
            fired("c", vec![Action::hide("f1")]),
            fired("d", vec![Action::hide("f1")]),
        ];
        assert_eq!(detect_conflicts(&evals).len(), 4);
    }

    #[test]
    fn different_targets_do_not_conflict() {
        let evals = vec![
            fired("a", vec![Action::show("f1")]),
            fired("b", vec![Action::hide("f2")]),
        ];
        assert!(detect_conflicts(&evals).is_empty());
    }

    #[test]
    fn skipped_and_unmet_breakpoints_ignored() {
        let mut hide = Rule::new("b", "Rule b");
        hide.actions.push(Action::hide("f1"));
        let skipped = RuleEvaluation::settled(&hide, Vec::new(), false);
        let unmet = RuleEvaluation::paused(&hide, Vec::new(), false);
        let evals = vec![fired("a", vec![Action::show("f1")]), skipped, unmet];
        assert!(detect_conflicts(&evals).is_empty());
    }

    #[test]
    fn met_breakpoint_participates() {
        let mut hide = Rule::new("b", "Rule b");
        hide.actions.push(Action::hide("f1"));
        let breakpoints = HashSet::from(["b".to_owned()]);
        let paused = crate::evaluate::evaluate_rule(
            &EngineConfig::default(),
            &hide,
            &FieldValues::new(),
            &breakpoints,
            false,
        );
        let evals = vec![fired("a", vec![Action::show("f1")]), paused];
        assert_eq!(detect_conflicts(&evals).len(), 1);
    }
}
