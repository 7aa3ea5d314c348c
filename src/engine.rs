use std::collections::HashSet;

use crate::session::{self, RunPlan};
use crate::{
    condition, evaluate, Condition, ConditionEvalResult, DebugSession, EngineConfig, FieldValues,
    Rule, RuleEvaluation, RuleSet,
};

/// Rule engine and debugger entry point.
///
/// An `Engine` holds only its configuration. Every method is a pure function
/// of its arguments, so one engine can be shared freely across threads and
/// re-run for replay.
///
/// ```
/// use std::collections::HashSet;
/// use formlogic::{Action, Engine, FieldValues, Rule, field};
///
/// let mut rule = Rule::new("r1", "Adult consent");
/// rule.conditions.push(field("age").gt(18_i64));
/// rule.actions.push(Action::show("consent"));
///
/// let session = Engine::default().run(
///     &[rule],
///     &FieldValues::new().set("age", 21_i64),
///     &HashSet::new(),
///     None,
/// );
/// assert_eq!(session.coverage().percentage, 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check one condition. Never fails; problems resolve to `passed = false`
    /// (or `true` for unknown operators under
    /// [`UnknownOperatorPolicy::Allow`](crate::UnknownOperatorPolicy::Allow)).
    #[must_use]
    pub fn evaluate_condition(
        &self,
        condition: &Condition,
        values: &FieldValues,
    ) -> ConditionEvalResult {
        condition::evaluate(&self.config, condition, values)
    }

    /// Evaluate one rule in isolation.
    pub fn evaluate_rule(
        &self,
        rule: &Rule,
        values: &FieldValues,
        breakpoints: &HashSet<String>,
    ) -> RuleEvaluation {
        evaluate::evaluate_rule(&self.config, rule, values, breakpoints, false)
    }

    /// Run a debug pass over `rules` in order.
    ///
    /// With `stop_at_index`, at most the rules `0..=stop_at_index` are
    /// evaluated. The pass also stops at the first rule with a breakpoint.
    pub fn run(
        &self,
        rules: &[Rule],
        values: &FieldValues,
        breakpoints: &HashSet<String>,
        stop_at_index: Option<usize>,
    ) -> DebugSession {
        let plan = RunPlan {
            stop_at: stop_at_index,
            released_through: None,
        };
        session::run(&self.config, rules, values, breakpoints, plan)
    }

    /// Run a full debug pass over a validated rule set with this engine's
    /// settings.
    pub fn run_ruleset(
        &self,
        ruleset: &RuleSet,
        values: &FieldValues,
        breakpoints: &HashSet<String>,
    ) -> DebugSession {
        self.run(ruleset.rules(), values, breakpoints, None)
    }

    /// Continue a paused or partial session to the next breakpoint or the end.
    ///
    /// The pass is replayed from the first rule; breakpoints on rules the
    /// previous session already reached are passed through.
    pub fn resume(
        &self,
        rules: &[Rule],
        values: &FieldValues,
        breakpoints: &HashSet<String>,
        previous: &DebugSession,
    ) -> DebugSession {
        let plan = RunPlan {
            stop_at: None,
            released_through: last_reached(previous),
        };
        session::run(&self.config, rules, values, breakpoints, plan)
    }

    /// Advance a paused or partial session by one rule.
    ///
    /// When the previous session is paused on a breakpoint, that rule is
    /// evaluated for real; otherwise the next unreached rule is evaluated
    /// (pausing if it carries a breakpoint).
    pub fn step(
        &self,
        rules: &[Rule],
        values: &FieldValues,
        breakpoints: &HashSet<String>,
        previous: &DebugSession,
    ) -> DebugSession {
        let next = previous
            .paused_at_index()
            .unwrap_or(previous.evaluations().len());
        let plan = RunPlan {
            stop_at: Some(next),
            released_through: last_reached(previous),
        };
        session::run(&self.config, rules, values, breakpoints, plan)
    }
}

fn last_reached(previous: &DebugSession) -> Option<usize> {
    previous
        .paused_at_index()
        .or_else(|| previous.evaluations().len().checked_sub(1))
}

/// Check one condition with default settings.
#[must_use]
pub fn evaluate_rule_condition(condition: &Condition, values: &FieldValues) -> ConditionEvalResult {
    Engine::default().evaluate_condition(condition, values)
}

/// Evaluate one rule with default settings.
pub fn evaluate_rule(
    rule: &Rule,
    values: &FieldValues,
    breakpoints: &HashSet<String>,
) -> RuleEvaluation {
    Engine::default().evaluate_rule(rule, values, breakpoints)
}

/// Run a debug pass with default settings.
pub fn run_debug_session(
    rules: &[Rule],
    values: &FieldValues,
    breakpoints: &HashSet<String>,
    stop_at_index: Option<usize>,
) -> DebugSession {
    Engine::default().run(rules, values, breakpoints, stop_at_index)
}
