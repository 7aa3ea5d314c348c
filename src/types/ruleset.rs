use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::analysis::EdgeCase;
use super::condition::{Condition, LogicOperator};
use super::error::ValidationError;
use super::rule::{Action, Rule};
use super::session::DebugSession;
use super::FieldValues;
use crate::Engine;

/// Builder for constructing a [`RuleSet`].
///
/// Rules keep the order they are defined in; that order is their priority
/// during evaluation.
///
/// # Example
///
/// ```
/// use formlogic::{Action, FieldValues, RuleSetBuilder, field};
///
/// let ruleset = RuleSetBuilder::new()
///     .rule("r1", |r| {
///         r.name("Adult consent")
///             .when(field("age").gt(18_i64))
///             .then(Action::show("consent"))
///     })
///     .build()
///     .unwrap();
///
/// let session = ruleset.evaluate(&FieldValues::new().set("age", 21_i64));
/// assert_eq!(session.snapshot().is_visible("consent"), Some(true));
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug)]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. The display name defaults to the id.
    #[must_use]
    pub fn rule(mut self, id: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder {
            rule: Rule::new(id, id),
        });
        self.rules.push(builder.rule);
        self
    }

    /// Append an already-constructed rule.
    #[must_use]
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate the rules and freeze them into a `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first structural problem found.
    pub fn build(self) -> Result<RuleSet, ValidationError> {
        RuleSet::new(self.rules)
    }
}

impl RuleBuilder {
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.rule.name = name.to_owned();
        self
    }

    /// Add a condition.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.rule.conditions.push(condition);
        self
    }

    /// Fire when every condition holds (the default).
    #[must_use]
    pub fn all(mut self) -> Self {
        self.rule.condition_operator = LogicOperator::And;
        self
    }

    /// Fire when any condition holds.
    #[must_use]
    pub fn any(mut self) -> Self {
        self.rule.condition_operator = LogicOperator::Or;
        self
    }

    /// Add an action.
    #[must_use]
    pub fn then(mut self, action: Action) -> Self {
        self.rule.actions.push(action);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.rule.enabled = false;
        self
    }

    #[must_use]
    pub fn trigger(mut self, field_id: &str) -> Self {
        self.rule.trigger_field_id = Some(field_id.to_owned());
        self
    }
}

/// A validated, immutable, ordered list of rules. Thread-safe and designed to
/// live behind `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Validate `rules` and wrap them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first structural problem found.
    pub fn new(rules: Vec<Rule>) -> Result<Self, ValidationError> {
        crate::validate::validate(&rules)?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Every field id referenced by a trigger or condition, sorted.
    #[must_use]
    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .flat_map(Rule::referenced_fields)
            .collect()
    }

    /// Run a full pass with a default [`Engine`] and no breakpoints.
    ///
    /// Use [`Engine::run_ruleset()`] for a custom
    /// [`EngineConfig`](crate::EngineConfig).
    pub fn evaluate(&self, values: &FieldValues) -> DebugSession {
        Engine::default().run_ruleset(self, values, &HashSet::new())
    }

    /// Run a pass with a default [`Engine`], pausing on `breakpoints`.
    pub fn debug(&self, values: &FieldValues, breakpoints: &HashSet<String>) -> DebugSession {
        Engine::default().run_ruleset(self, values, breakpoints)
    }

    /// Synthesize edge-case inputs from the rule definitions.
    #[must_use]
    pub fn edge_cases(&self) -> Vec<EdgeCase> {
        crate::edge_cases::generate_edge_cases(&self.rules)
    }

    /// Parse rule DSL text and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`FormLogicError`](crate::FormLogicError) on parse or
    /// validation failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::FormLogicError> {
        let rules = crate::parse::parse(input)?;
        Ok(Self::new(rules)?)
    }

    /// Read a DSL file and build a `RuleSet` from it.
    ///
    /// # Errors
    ///
    /// Returns [`FormLogicError`](crate::FormLogicError) on I/O, parse, or
    /// validation failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::FormLogicError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

#[cfg(feature = "json")]
impl RuleSet {
    /// Build a `RuleSet` from the form builder's JSON rule array.
    ///
    /// # Errors
    ///
    /// Returns [`FormLogicError`](crate::FormLogicError) on malformed JSON or
    /// validation failure.
    pub fn from_json(input: &str) -> Result<Self, crate::FormLogicError> {
        let rules: Vec<Rule> = serde_json::from_str(input)?;
        Ok(Self::new(rules)?)
    }

    /// Read a JSON rule array from a file.
    ///
    /// # Errors
    ///
    /// Returns [`FormLogicError`](crate::FormLogicError) on I/O, JSON, or
    /// validation failure.
    pub fn from_json_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::FormLogicError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    /// Serialize the rules back to the form builder's JSON shape.
    ///
    /// # Errors
    ///
    /// Returns [`FormLogicError`](crate::FormLogicError) if encoding fails.
    pub fn to_json(&self) -> Result<String, crate::FormLogicError> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enabled = self.rules.iter().filter(|r| r.enabled).count();
        write!(
            f,
            "RuleSet({} rules, {} enabled, {} fields)",
            self.rules.len(),
            enabled,
            self.referenced_fields().len(),
        )
    }
}
