use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, fail, not, opt, preceded, repeat, separated, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Stream;
use winnow::token::{any, one_of, take_while};

use crate::{Action, ActionType, Condition, ConditionOperator, LogicOperator, Rule, Value};

fn expected(what: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(what))
}

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers & keywords -------------------------------------------------

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

/// A bare word that is not the prefix of a longer identifier.
fn keyword<'i>(word: &'static str) -> impl FnMut(&mut &'i str) -> ModalResult<&'i str> {
    move |input: &mut &'i str| terminated(word, not(one_of(is_ident_char))).parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        keyword("true").value(Value::Bool(true)),
        keyword("false").value(Value::Bool(false)),
        keyword("null").value(Value::Null),
        number.map(Value::Number),
    ))
    .context(expected("value"))
    .parse_next(input)
}

// -- Conditions -------------------------------------------------------------

fn operator(input: &mut &str) -> ModalResult<ConditionOperator> {
    ws.parse_next(input)?;
    alt((
        ">=".value(ConditionOperator::GreaterOrEqual),
        ">".value(ConditionOperator::GreaterThan),
        "<=".value(ConditionOperator::LessOrEqual),
        "<".value(ConditionOperator::LessThan),
        "==".value(ConditionOperator::Equals),
        "!=".value(ConditionOperator::NotEquals),
        (keyword("not"), ws, keyword("contains")).value(ConditionOperator::NotContains),
        keyword("contains").value(ConditionOperator::Contains),
        (keyword("starts"), ws, keyword("with")).value(ConditionOperator::StartsWith),
        (keyword("ends"), ws, keyword("with")).value(ConditionOperator::EndsWith),
        (keyword("is"), ws, keyword("not"), ws, keyword("empty"))
            .value(ConditionOperator::IsNotEmpty),
        (keyword("is"), ws, keyword("empty")).value(ConditionOperator::IsEmpty),
        (keyword("is"), ws, keyword("not"), ws, keyword("checked"))
            .value(ConditionOperator::IsNotChecked),
        (keyword("is"), ws, keyword("checked")).value(ConditionOperator::IsChecked),
    ))
    .context(expected("operator"))
    .parse_next(input)
}

fn condition(input: &mut &str) -> ModalResult<Condition> {
    ws.parse_next(input)?;
    let field_id = ident.context(expected("field id")).parse_next(input)?;
    let operator = cut_err(operator).parse_next(input)?;
    let value = if operator.takes_operand() {
        Some(cut_err(value).parse_next(input)?)
    } else {
        None
    };
    Ok(Condition {
        field_id: field_id.to_owned(),
        operator,
        value,
    })
}

fn connective(input: &mut &str) -> ModalResult<LogicOperator> {
    alt((
        keyword("and").value(LogicOperator::And),
        keyword("or").value(LogicOperator::Or),
    ))
    .parse_next(input)
}

/// `always`, or conditions joined by a single connective.
fn when_clause(input: &mut &str) -> ModalResult<(Vec<Condition>, LogicOperator)> {
    ws.parse_next(input)?;
    if opt(keyword("always")).parse_next(input)?.is_some() {
        return Ok((Vec::new(), LogicOperator::And));
    }

    let mut conditions = vec![cut_err(condition).parse_next(input)?];
    let mut joined_by: Option<LogicOperator> = None;
    loop {
        let checkpoint = input.checkpoint();
        ws.parse_next(input)?;
        let Some(next) = opt(connective).parse_next(input)? else {
            input.reset(&checkpoint);
            break;
        };
        if joined_by.is_some_and(|op| op != next) {
            return cut_err(fail.context(expected("the same connective throughout a rule")))
                .parse_next(input);
        }
        joined_by = Some(next);
        conditions.push(cut_err(condition).parse_next(input)?);
    }

    Ok((conditions, joined_by.unwrap_or_default()))
}

// -- Actions ----------------------------------------------------------------

fn action(input: &mut &str) -> ModalResult<Action> {
    ws.parse_next(input)?;
    let action_type = alt((
        keyword("show").value(ActionType::Show),
        keyword("hide").value(ActionType::Hide),
        keyword("enable").value(ActionType::Enable),
        keyword("disable").value(ActionType::Disable),
        keyword("require").value(ActionType::Require),
        keyword("navigate").value(ActionType::Navigate),
        keyword("set").value(ActionType::SetValue),
    ))
    .context(expected("action"))
    .parse_next(input)?;

    ws.parse_next(input)?;
    let target = cut_err(ident.context(expected("target id"))).parse_next(input)?;

    let value = if action_type == ActionType::SetValue {
        (ws, cut_err('=')).parse_next(input)?;
        Some(cut_err(value).parse_next(input)?)
    } else {
        None
    };

    Ok(Action {
        action_type,
        target_id: target.to_owned(),
        value,
    })
}

fn then_clause(input: &mut &str) -> ModalResult<Vec<Action>> {
    separated(1.., action, (ws, ',')).parse_next(input)
}

// -- Rule definitions -------------------------------------------------------

fn rule_def(input: &mut &str) -> ModalResult<Rule> {
    ws.parse_next(input)?;
    keyword("rule").parse_next(input)?;
    ws.parse_next(input)?;

    let id = cut_err(ident.context(expected("rule id"))).parse_next(input)?;

    ws.parse_next(input)?;
    let name = opt(string_literal).parse_next(input)?;

    ws.parse_next(input)?;
    let disabled = opt(keyword("disabled")).parse_next(input)?.is_some();

    ws.parse_next(input)?;
    let trigger = opt(preceded((keyword("trigger"), ws), cut_err(ident))).parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(keyword("when").context(expected("when"))).parse_next(input)?;
    let (conditions, condition_operator) = when_clause(input)?;

    ws.parse_next(input)?;
    let actions = opt(preceded(keyword("then"), cut_err(then_clause)))
        .parse_next(input)?
        .unwrap_or_default();

    Ok(Rule {
        id: id.to_owned(),
        name: name.unwrap_or_else(|| id.to_owned()),
        enabled: !disabled,
        conditions,
        condition_operator,
        actions,
        trigger_field_id: trigger.map(str::to_owned),
    })
}

// -- Top-level parser -------------------------------------------------------

pub(crate) fn parse_rules(input: &mut &str) -> ModalResult<Vec<Rule>> {
    let rules: Vec<Rule> = repeat(0.., rule_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;

    use super::*;

    #[test]
    fn parse_single_rule() {
        let rules = parse("rule r1:\n    when age > 18\n    then show consent").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, "r1");
        assert_eq!(rules[0].name, "r1");
        assert!(rules[0].enabled);
        assert_eq!(
            rules[0].conditions[0],
            Condition::new(
                "age",
                ConditionOperator::GreaterThan,
                Some(Value::Number(18.0))
            )
        );
        assert_eq!(rules[0].actions, vec![Action::show("consent")]);
    }

    #[test]
    fn parse_header_attributes() {
        let rules =
            parse("rule r1 \"Adult consent\" disabled trigger age:\n    when always").unwrap();
        assert_eq!(rules[0].name, "Adult consent");
        assert!(!rules[0].enabled);
        assert_eq!(rules[0].trigger_field_id.as_deref(), Some("age"));
        assert!(rules[0].conditions.is_empty());
        assert!(rules[0].actions.is_empty());
    }

    #[test]
    fn parse_and_connective() {
        let rules = parse("rule r:\n    when a == 1 and b == 2 and c == 3").unwrap();
        assert_eq!(rules[0].conditions.len(), 3);
        assert_eq!(rules[0].condition_operator, LogicOperator::And);
    }

    #[test]
    fn parse_or_connective() {
        let rules = parse("rule r:\n    when a == 1 or b == 2").unwrap();
        assert_eq!(rules[0].condition_operator, LogicOperator::Or);
    }

    #[test]
    fn mixed_connectives_rejected() {
        assert!(parse("rule r:\n    when a == 1 and b == 2 or c == 3").is_err());
    }

    #[test]
    fn parse_all_operators() {
        let cases = [
            ("== 1", ConditionOperator::Equals),
            ("!= 1", ConditionOperator::NotEquals),
            ("> 1", ConditionOperator::GreaterThan),
            (">= 1", ConditionOperator::GreaterOrEqual),
            ("< 1", ConditionOperator::LessThan),
            ("<= 1", ConditionOperator::LessOrEqual),
            ("contains \"a\"", ConditionOperator::Contains),
            ("not contains \"a\"", ConditionOperator::NotContains),
            ("starts with \"a\"", ConditionOperator::StartsWith),
            ("ends with \"a\"", ConditionOperator::EndsWith),
            ("is empty", ConditionOperator::IsEmpty),
            ("is not empty", ConditionOperator::IsNotEmpty),
            ("is checked", ConditionOperator::IsChecked),
            ("is not checked", ConditionOperator::IsNotChecked),
        ];
        for (text, expected_op) in cases {
            let input = format!("rule r:\n    when x {text}");
            let rules = parse(&input).unwrap();
            assert_eq!(rules[0].conditions[0].operator, expected_op, "failed for {text}");
        }
    }

    #[test]
    fn unary_operators_take_no_value() {
        let rules = parse("rule r:\n    when email is not empty and tos is checked").unwrap();
        assert!(rules[0].conditions.iter().all(|c| c.value.is_none()));
    }

    #[test]
    fn parse_all_value_types() {
        let cases = [
            ("42", Value::Number(42.0)),
            ("-3.5", Value::Number(-3.5)),
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("null", Value::Null),
            (r#""hello""#, Value::String("hello".into())),
        ];
        for (literal, expected_value) in cases {
            let input = format!("rule r:\n    when x == {literal}");
            let rules = parse(&input).unwrap();
            assert_eq!(
                rules[0].conditions[0].value,
                Some(expected_value),
                "failed for {literal}"
            );
        }
    }

    #[test]
    fn parse_all_actions() {
        let rules = parse(
            "rule r:\n    when always\n    then show a, hide b, enable c, disable d, \
             require e, navigate page-2, set total = 5",
        )
        .unwrap();
        assert_eq!(
            rules[0].actions,
            vec![
                Action::show("a"),
                Action::hide("b"),
                Action::enable("c"),
                Action::disable("d"),
                Action::require("e"),
                Action::navigate("page-2"),
                Action::set_value("total", 5_i64),
            ]
        );
    }

    #[test]
    fn keywords_do_not_swallow_identifiers() {
        let rules = parse("rule r:\n    when android == 1 and order == 2\n    then show shows").unwrap();
        assert_eq!(rules[0].conditions[0].field_id, "android");
        assert_eq!(rules[0].conditions[1].field_id, "order");
        assert_eq!(rules[0].actions, vec![Action::show("shows")]);
    }

    #[test]
    fn dotted_and_dashed_ids() {
        let rules = parse("rule r:\n    when address.zip-code is empty").unwrap();
        assert_eq!(rules[0].conditions[0].field_id, "address.zip-code");
    }

    #[test]
    fn comments_ignored() {
        let rules = parse("# header\nrule r: # trailing\n    # inline\n    when always").unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn multiple_rules_keep_order() {
        let input = "rule a:\n  when x == 1\nrule b:\n  when y == 2\nrule c:\n  when always";
        let rules = parse(input).unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn string_with_escapes() {
        let rules = parse(
            r#"rule r:
    when x == "a\"b\\c""#,
        )
        .unwrap();
        assert_eq!(
            rules[0].conditions[0].value,
            Some(Value::String("a\"b\\c".into()))
        );
    }

    #[test]
    fn set_requires_value() {
        assert!(parse("rule r:\n    when always\n    then set total").is_err());
    }

    #[test]
    fn missing_when_rejected() {
        assert!(parse("rule r:\n    then show x").is_err());
    }

    #[test]
    fn empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  # only a comment\n").unwrap().is_empty());
    }
}
