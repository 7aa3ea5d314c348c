/// What a condition with an operator the engine does not know evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub enum UnknownOperatorPolicy {
    /// The condition fails.
    #[default]
    Deny,
    /// The condition passes. Matches rule data written for engines that
    /// treated unknown operators permissively.
    Allow,
    /// The rule ends in [`RuleStatus::Error`](crate::RuleStatus::Error).
    /// Breakpointed rules treat the condition as failed instead.
    Error,
}

/// Engine settings.
///
/// ```
/// use formlogic::{Engine, EngineConfig, UnknownOperatorPolicy};
///
/// let engine = Engine::new(
///     EngineConfig::default()
///         .unknown_operator(UnknownOperatorPolicy::Allow)
///         .trace_unreached(false),
/// );
/// assert!(!engine.config().trace_unreached);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase", default))]
pub struct EngineConfig {
    pub unknown_operator: UnknownOperatorPolicy,
    /// Append a pending marker to the trace for every rule a partial pass did
    /// not reach.
    pub trace_unreached: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unknown_operator: UnknownOperatorPolicy::Deny,
            trace_unreached: true,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn unknown_operator(mut self, policy: UnknownOperatorPolicy) -> Self {
        self.unknown_operator = policy;
        self
    }

    #[must_use]
    pub fn trace_unreached(mut self, enabled: bool) -> Self {
        self.trace_unreached = enabled;
        self
    }
}
