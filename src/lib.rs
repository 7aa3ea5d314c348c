//! Conditional-logic rules for dynamic forms, with a step-through debugger.
//!
//! Rules watch field values and, when their conditions hold, show, hide,
//! enable, disable, require, set, or navigate to form elements. A
//! [`RuleSet`] evaluates rules in order; [`Engine`] adds breakpoints,
//! stepping, conflict detection, and coverage.

mod condition;
mod conflict;
pub mod edge_cases;
mod engine;
mod error;
mod evaluate;
pub mod parse;
mod session;
mod snapshot;
mod types;
mod validate;

pub use conflict::detect_conflicts;
pub use edge_cases::generate_edge_cases;
pub use engine::{evaluate_rule, evaluate_rule_condition, run_debug_session, Engine};
pub use error::FormLogicError;
pub use parse::ParseError;
pub use snapshot::build_snapshot;
pub use types::{
    field, Action, ActionType, Condition, ConditionEvalResult, ConditionOperator, ConflictKind,
    Coverage, DebugSession, DebuggerSnapshot, EdgeCase, EngineConfig, EvalError, FieldCondition,
    FieldValues, LogicOperator, Rule, RuleBuilder, RuleConflict, RuleEvaluation, RuleRef, RuleSet,
    RuleSetBuilder, RuleStatus, UnknownOperatorPolicy, ValidationError, Value,
};
