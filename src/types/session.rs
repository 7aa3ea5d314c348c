use std::fmt;

use super::analysis::{Coverage, DebuggerSnapshot, RuleConflict};
use super::evaluation::{RuleEvaluation, RuleStatus};

/// Result of one full or partial debug pass over a rule list.
///
/// A session is a self-contained value: a UI can keep a list of them for
/// undo/redo, and feed one back into
/// [`Engine::resume()`](crate::Engine::resume) or
/// [`Engine::step()`](crate::Engine::step) to continue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
#[must_use]
pub struct DebugSession {
    pub(crate) evaluations: Vec<RuleEvaluation>,
    pub(crate) snapshot: DebuggerSnapshot,
    pub(crate) conflicts: Vec<RuleConflict>,
    pub(crate) coverage: Coverage,
    pub(crate) paused_at_index: Option<usize>,
    pub(crate) stepping: bool,
    pub(crate) trace: Vec<String>,
    pub(crate) rule_count: usize,
}

impl DebugSession {
    /// Evaluations in rule order, one per rule reached.
    #[must_use]
    pub fn evaluations(&self) -> &[RuleEvaluation] {
        &self.evaluations
    }

    #[must_use]
    pub fn snapshot(&self) -> &DebuggerSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn conflicts(&self) -> &[RuleConflict] {
        &self.conflicts
    }

    #[must_use]
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// Index of the rule a breakpoint halted on, if any.
    #[must_use]
    pub fn paused_at_index(&self) -> Option<usize> {
        self.paused_at_index
    }

    /// Whether the pass stopped short on purpose (breakpoint or step limit).
    #[must_use]
    pub fn is_stepping(&self) -> bool {
        self.stepping
    }

    /// One marker line per rule, in rule order.
    #[must_use]
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Number of rules in the list the session ran over.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Status of the rule at `index`; `Pending` for rules the pass did not
    /// reach.
    #[must_use]
    pub fn status_at(&self, index: usize) -> RuleStatus {
        self.evaluations
            .get(index)
            .map_or(RuleStatus::Pending, RuleEvaluation::status)
    }

    /// Find the evaluation of a rule by id.
    #[must_use]
    pub fn evaluation(&self, rule_id: &str) -> Option<&RuleEvaluation> {
        self.evaluations.iter().find(|e| e.rule_id() == rule_id)
    }

    pub fn fired_rules(&self) -> impl Iterator<Item = &RuleEvaluation> {
        self.evaluations
            .iter()
            .filter(|e| e.status() == RuleStatus::Fired)
    }

    /// Whether every rule was evaluated without pausing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.paused_at_index.is_none() && self.evaluations.len() == self.rule_count
    }
}

impl fmt::Display for DebugSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "evaluated {}/{} rules, coverage: {}, conflicts: {}",
            self.evaluations.len(),
            self.rule_count,
            self.coverage,
            self.conflicts.len()
        )?;
        if let Some(index) = self.paused_at_index {
            write!(f, ", paused at {index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;

    fn session_with(evaluations: Vec<RuleEvaluation>, rule_count: usize) -> DebugSession {
        DebugSession {
            evaluations,
            snapshot: DebuggerSnapshot::default(),
            conflicts: Vec::new(),
            coverage: Coverage::new(0, 0),
            paused_at_index: None,
            stepping: false,
            trace: Vec::new(),
            rule_count,
        }
    }

    #[test]
    fn status_at_unreached_is_pending() {
        let rule = Rule::new("r1", "One");
        let session = session_with(vec![RuleEvaluation::settled(&rule, Vec::new(), true)], 3);
        assert_eq!(session.status_at(0), RuleStatus::Fired);
        assert_eq!(session.status_at(1), RuleStatus::Pending);
        assert!(!session.is_complete());
    }

    #[test]
    fn lookup_by_rule_id() {
        let rule = Rule::new("r1", "One");
        let session = session_with(vec![RuleEvaluation::settled(&rule, Vec::new(), false)], 1);
        assert_eq!(
            session.evaluation("r1").map(RuleEvaluation::status),
            Some(RuleStatus::Skipped)
        );
        assert!(session.evaluation("nope").is_none());
        assert!(session.is_complete());
        assert_eq!(session.fired_rules().count(), 0);
    }

    #[test]
    fn display_summary() {
        let mut session = session_with(Vec::new(), 2);
        session.paused_at_index = Some(0);
        let s = session.to_string();
        assert!(s.contains("evaluated 0/2 rules"));
        assert!(s.contains("paused at 0"));
    }
}
