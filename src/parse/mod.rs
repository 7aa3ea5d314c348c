mod error;
mod grammar;

use tracing::debug;

pub use error::ParseError;

use crate::Rule;

/// Parse rule DSL text into rules, in definition order.
///
/// The result is not validated; [`RuleSet::from_dsl()`](crate::RuleSet::from_dsl)
/// parses and validates in one step.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<Vec<Rule>, ParseError> {
    use winnow::Parser;
    let rules = grammar::parse_rules
        .parse(input)
        .map_err(|e| ParseError::at(input, e.offset(), e.to_string()))?;
    debug!(rules = rules.len(), "parsed rule DSL");
    Ok(rules)
}
