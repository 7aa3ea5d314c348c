use std::collections::HashSet;

use formlogic::{
    detect_conflicts, field, run_debug_session, Action, ConflictKind, Coverage, Engine,
    EngineConfig, FieldValues, LogicOperator, Rule, RuleSetBuilder, RuleStatus,
    UnknownOperatorPolicy, Value,
};

fn no_breakpoints() -> HashSet<String> {
    HashSet::new()
}

fn adult_consent() -> Rule {
    let mut rule = Rule::new("r1", "Adult consent");
    rule.conditions.push(field("age").gt(18_i64));
    rule.actions.push(Action::show("consent"));
    rule
}

#[test]
fn end_to_end_single_rule() {
    let values = FieldValues::new().set("age", 21_i64);
    let session = run_debug_session(&[adult_consent()], &values, &no_breakpoints(), None);

    assert_eq!(session.evaluations().len(), 1);
    assert_eq!(session.evaluations()[0].status(), RuleStatus::Fired);
    assert_eq!(session.snapshot().visibility.get("consent"), Some(&true));
    assert_eq!(
        session.coverage(),
        Coverage {
            fired: 1,
            total: 1,
            percentage: 100
        }
    );
    assert_eq!(session.paused_at_index(), None);
    assert!(!session.is_stepping());
    assert_eq!(session.trace(), &["✓ Adult consent (fired)"]);
}

#[test]
fn condition_results_capture_actual_values() {
    let values = FieldValues::new().set("age", 16_i64);
    let session = run_debug_session(&[adult_consent()], &values, &no_breakpoints(), None);

    let eval = &session.evaluations()[0];
    assert_eq!(eval.status(), RuleStatus::Skipped);
    assert!(!eval.conditions_met());
    assert_eq!(eval.condition_results()[0].actual_value, Some(Value::Number(16.0)));
    assert!(!eval.condition_results()[0].passed);
    assert!(eval.executed_actions().is_empty());
    assert!(session.snapshot().visibility.is_empty());
}

#[test]
fn coverage_two_of_four() {
    let ruleset = RuleSetBuilder::new()
        .rule("a", |r| r.when(field("x").eq(1_i64)).then(Action::show("f1")))
        .rule("b", |r| r.when(field("x").eq(2_i64)).then(Action::show("f2")))
        .rule("c", |r| r.when(field("y").is_not_empty()).then(Action::show("f3")))
        .rule("d", |r| r.when(field("y").is_empty()).then(Action::show("f4")))
        .build()
        .unwrap();

    let values = FieldValues::new().set("x", 1_i64).set("y", "filled");
    let session = ruleset.evaluate(&values);

    assert_eq!(
        session.coverage(),
        Coverage {
            fired: 2,
            total: 4,
            percentage: 50
        }
    );
    let fired: Vec<&str> = session.fired_rules().map(|e| e.rule_id()).collect();
    assert_eq!(fired, vec!["a", "c"]);
}

#[test]
fn set_value_propagates_forward() {
    let ruleset = RuleSetBuilder::new()
        .rule("r1", |r| r.name("Seed x").then(Action::set_value("x", 5_i64)))
        .rule("r2", |r| {
            r.name("Bonus")
                .when(field("x").gt(3_i64))
                .then(Action::show("bonus"))
        })
        .build()
        .unwrap();

    let session = ruleset.evaluate(&FieldValues::new());
    assert_eq!(session.status_at(0), RuleStatus::Fired);
    assert_eq!(session.status_at(1), RuleStatus::Fired);
    assert_eq!(session.snapshot().set_values.get("x"), Some(&Value::Number(5.0)));
    assert_eq!(session.snapshot().is_visible("bonus"), Some(true));
}

#[test]
fn show_hide_conflict_names_both_rules() {
    let ruleset = RuleSetBuilder::new()
        .rule("shower", |r| {
            r.name("Shower")
                .when(field("flag").is_checked())
                .then(Action::show("f1"))
        })
        .rule("hider", |r| {
            r.name("Hider")
                .when(field("flag").is_checked())
                .then(Action::hide("f1"))
        })
        .build()
        .unwrap();

    let session = ruleset.evaluate(&FieldValues::new().set("flag", true));
    let conflicts = session.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].rule_a.id, "shower");
    assert_eq!(conflicts[0].rule_b.id, "hider");
    assert_eq!(conflicts[0].target_id, "f1");
    assert_eq!(conflicts[0].kind, ConflictKind::Visibility);
    assert_eq!(
        conflicts[0].to_string(),
        "\"Shower\" shows 'f1' but \"Hider\" hides it"
    );

    // Last write wins in the snapshot.
    assert_eq!(session.snapshot().is_visible("f1"), Some(false));
}

#[test]
fn require_and_disable_conflict() {
    let ruleset = RuleSetBuilder::new()
        .rule("need", |r| r.then(Action::require("sig")))
        .rule("lock", |r| r.then(Action::disable("sig")))
        .build()
        .unwrap();

    let session = ruleset.evaluate(&FieldValues::new());
    let kinds: Vec<ConflictKind> = session.conflicts().iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConflictKind::RequiredButDisabled]);
    assert_eq!(session.snapshot().is_required("sig"), Some(true));
    assert_eq!(session.snapshot().is_enabled("sig"), Some(false));
}

#[test]
fn conflicts_only_between_effective_rules() {
    let ruleset = RuleSetBuilder::new()
        .rule("shower", |r| r.then(Action::show("f1")))
        .rule("hider", |r| {
            r.when(field("never").eq("set")).then(Action::hide("f1"))
        })
        .build()
        .unwrap();

    let session = ruleset.evaluate(&FieldValues::new());
    assert!(session.conflicts().is_empty());
    assert!(detect_conflicts(session.evaluations()).is_empty());
}

#[test]
fn breakpoint_pauses_and_resume_continues() {
    let ruleset = RuleSetBuilder::new()
        .rule("a", |r| r.name("A").then(Action::show("one")))
        .rule("b", |r| r.name("B").then(Action::set_value("x", 2_i64)))
        .rule("c", |r| {
            r.name("C")
                .when(field("x").eq(2_i64))
                .then(Action::show("two"))
        })
        .build()
        .unwrap();

    let breakpoints = HashSet::from(["b".to_owned()]);
    let paused = ruleset.debug(&FieldValues::new(), &breakpoints);
    assert_eq!(paused.paused_at_index(), Some(1));
    assert!(paused.is_stepping());
    assert_eq!(
        paused.trace(),
        &["✓ A (fired)", "⏸ B (breakpoint)", "○ C (pending)"]
    );
    // A met breakpoint previews its actions in the snapshot.
    assert_eq!(
        paused.snapshot().set_values.get("x"),
        Some(&Value::Number(2.0))
    );
    assert_eq!(paused.coverage(), Coverage::new(1, 2));
    assert_eq!(
        paused.to_string(),
        "evaluated 2/3 rules, coverage: 1/2 (50%), conflicts: 0, paused at 1"
    );

    let engine = Engine::default();
    let done = engine.resume(ruleset.rules(), &FieldValues::new(), &breakpoints, &paused);
    assert!(done.is_complete());
    assert_eq!(done.status_at(1), RuleStatus::Fired);
    assert_eq!(done.status_at(2), RuleStatus::Fired);
    assert_eq!(done.snapshot().is_visible("two"), Some(true));
}

#[test]
fn unknown_operator_policies() {
    let mut rule = Rule::new("r", "Legacy");
    rule.conditions.push(field("x").op("matchesRegex", "^a"));
    rule.actions.push(Action::show("f"));
    let rules = [rule];
    let values = FieldValues::new().set("x", "abc");

    let deny = Engine::default().run(&rules, &values, &no_breakpoints(), None);
    assert_eq!(deny.status_at(0), RuleStatus::Skipped);

    let allow = Engine::new(EngineConfig::default().unknown_operator(UnknownOperatorPolicy::Allow))
        .run(&rules, &values, &no_breakpoints(), None);
    assert_eq!(allow.status_at(0), RuleStatus::Fired);

    let error = Engine::new(EngineConfig::default().unknown_operator(UnknownOperatorPolicy::Error))
        .run(&rules, &values, &no_breakpoints(), None);
    assert_eq!(error.status_at(0), RuleStatus::Error);
    assert_eq!(
        error.evaluations()[0].error(),
        Some("unknown operator 'matchesRegex' on field 'x'")
    );
    assert_eq!(
        error.trace(),
        &["⚠ Legacy (error: unknown operator 'matchesRegex' on field 'x')"]
    );
}

#[test]
fn error_does_not_abort_pass() {
    let mut broken = Rule::new("broken", "Broken");
    broken.conditions.push(field("x").op("bogus", 1_i64));
    let mut after = Rule::new("after", "After");
    after.actions.push(Action::show("f"));

    let engine =
        Engine::new(EngineConfig::default().unknown_operator(UnknownOperatorPolicy::Error));
    let session = engine.run(&[broken, after], &FieldValues::new(), &no_breakpoints(), None);
    assert_eq!(session.status_at(0), RuleStatus::Error);
    assert_eq!(session.status_at(1), RuleStatus::Fired);
    assert_eq!(session.coverage(), Coverage::new(1, 2));
}

#[test]
fn or_rules_fire_on_any_condition() {
    let mut rule = Rule::new("r", "Either");
    rule.condition_operator = LogicOperator::Or;
    rule.conditions.push(field("a").eq("yes"));
    rule.conditions.push(field("b").eq("yes"));
    rule.actions.push(Action::enable("submit"));

    let session = run_debug_session(
        &[rule],
        &FieldValues::new().set("b", "yes"),
        &no_breakpoints(),
        None,
    );
    assert_eq!(session.status_at(0), RuleStatus::Fired);
    assert_eq!(session.snapshot().is_enabled("submit"), Some(true));
}

#[test]
fn disabled_rule_with_breakpoint_is_skipped() {
    let mut rule = adult_consent();
    rule.enabled = false;
    let breakpoints = HashSet::from(["r1".to_owned()]);
    let session = run_debug_session(
        &[rule],
        &FieldValues::new().set("age", 30_i64),
        &breakpoints,
        None,
    );
    assert_eq!(session.status_at(0), RuleStatus::Skipped);
    assert_eq!(session.paused_at_index(), None);
}
