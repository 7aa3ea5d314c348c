mod analysis;
mod condition;
mod config;
mod error;
mod evaluation;
mod field_values;
mod rule;
mod ruleset;
mod session;
mod value;

pub use analysis::{ConflictKind, Coverage, DebuggerSnapshot, EdgeCase, RuleConflict};
pub use condition::{field, Condition, ConditionOperator, FieldCondition, LogicOperator};
pub use config::{EngineConfig, UnknownOperatorPolicy};
pub use error::{EvalError, ValidationError};
pub use evaluation::{ConditionEvalResult, RuleEvaluation, RuleRef, RuleStatus};
pub use field_values::FieldValues;
pub use rule::{Action, ActionType, Rule};
pub use ruleset::{RuleBuilder, RuleSet, RuleSetBuilder};
pub use session::DebugSession;
pub use value::Value;

pub(crate) use value::{is_empty, number_of, text_of};
