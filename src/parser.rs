//! This module provides the parser for `.aut` automaton definition files,
//! utilizing the `pest` crate. A definition declares the formalism, the
//! states with their initial/final flags, the transition rules, and an
//! optional default input string.

use crate::{
    analyzer::validate,
    types::{Automaton, AutomatonError, Formalism, Label, State, Transition, BLANK_SYMBOL, EPSILON},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the definition grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Parses a `.aut` definition into a validated `Automaton`.
///
/// # Returns
///
/// * `Ok(Automaton)` if the input parses and passes structural validation.
/// * `Err(AutomatonError::ParseError)` on syntax errors.
/// * `Err(AutomatonError::MalformedAutomaton)` on structural violations
///   (undefined state references, wrong initial-state count, labels that do
///   not fit the declared formalism).
pub fn parse(input: &str) -> Result<Automaton, AutomatonError> {
    // The grammar expects every line to end with a newline.
    let text = format!("{}\n", input.trim());

    let root = DefinitionParser::parse(Rule::definition, &text)
        .map_err(|e| AutomatonError::ParseError(Box::new(e)))?
        .next()
        .unwrap();

    let automaton = parse_definition(root)?;
    validate(&automaton)?;

    Ok(automaton)
}

/// Walks the top-level sections of a parsed definition. Sections may appear
/// in any order but each may appear only once.
fn parse_definition(pair: Pair<Rule>) -> Result<Automaton, AutomatonError> {
    let mut name: Option<String> = None;
    let mut formalism: Option<Formalism> = None;
    let mut input: Option<String> = None;
    let mut states: Option<Vec<State>> = None;
    let mut transitions: Option<Vec<Transition>> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_line_text(p)),
            Rule::formalism => {
                formalism = Some(p.into_inner().next().unwrap().as_str().parse()?)
            }
            Rule::input => input = Some(parse_optional_line_text(p)),
            Rule::states => states = Some(parse_states(p)),
            Rule::rules => transitions = Some(parse_rules(p)?),
            _ => {} // Skip other rules (EOI)
        }
    }

    Ok(Automaton {
        name: check_required_rule(name, "name")?,
        formalism: check_required_rule(formalism, "type")?,
        states: check_required_rule(states, "states")?,
        transitions: check_required_rule(transitions, "rules")?,
        input: input.unwrap_or_default(),
    })
}

/// Parses the `states:` block into `State` values with their flags.
fn parse_states(pair: Pair<Rule>) -> Vec<State> {
    let mut states = Vec::new();

    // Rule: states > [state_line] > state_name ~ flags?
    for line in pair.into_inner() {
        if line.as_rule() != Rule::state_line {
            continue;
        }

        let mut pairs = line.into_inner();
        let name = pairs.next().unwrap().as_str().to_string();
        let mut state = State::new(&name, false, false);

        if let Some(flags) = pairs.next() {
            for flag in flags.into_inner() {
                match flag.as_str() {
                    "initial" => state.is_initial = true,
                    "final" => state.is_final = true,
                    _ => {}
                }
            }
        }

        states.push(state);
    }

    states
}

/// Parses the `rules:` block. Each group lists the transitions leaving one
/// state; declaration order is preserved across groups.
fn parse_rules(pair: Pair<Rule>) -> Result<Vec<Transition>, AutomatonError> {
    let mut transitions = Vec::new();

    for group in pair.into_inner() {
        if group.as_rule() != Rule::rule_group {
            continue;
        }

        let mut pairs = group.into_inner();
        let from = pairs.next().unwrap().as_str().to_string();

        for line in pairs {
            if line.as_rule() != Rule::action_line {
                continue;
            }
            let action = line.into_inner().next().unwrap();
            let inner = action.into_inner().next().unwrap();
            transitions.push(parse_action(&from, inner)?);
        }
    }

    Ok(transitions)
}

/// Converts a single action into a `Transition`. The grammar variant decides
/// the label kind; whether that kind fits the declared formalism is checked
/// by validation afterwards.
fn parse_action(from: &str, pair: Pair<Rule>) -> Result<Transition, AutomatonError> {
    match pair.as_rule() {
        // symbol -> next
        Rule::fa_action => {
            let mut pairs = pair.into_inner();
            let symbol = parse_symbol(pairs.next().unwrap().as_str());
            let to = pairs.next().unwrap().as_str();
            Ok(Transition::new(from, to, Label::Fa { symbol }))
        }
        // input, pop -> push, next
        Rule::pda_action => {
            let mut pairs = pair.into_inner();
            let input = epsilon_opt(parse_symbol(pairs.next().unwrap().as_str()));
            let pop = epsilon_opt(parse_symbol(pairs.next().unwrap().as_str()));
            let push = epsilon_opt(parse_symbol(pairs.next().unwrap().as_str()));
            let to = pairs.next().unwrap().as_str();
            Ok(Transition::new(from, to, Label::Pda { input, pop, push }))
        }
        // read -> write, direction, next
        Rule::tm_action => {
            let mut pairs = pair.into_inner();
            let read = parse_symbol(pairs.next().unwrap().as_str());
            let write = parse_symbol(pairs.next().unwrap().as_str());
            let direction = pairs.next().unwrap().as_str().parse()?;
            let to = pairs.next().unwrap().as_str();
            Ok(Transition::new(
                from,
                to,
                Label::Tm {
                    read,
                    write,
                    direction,
                },
            ))
        }
        other => Err(AutomatonError::MalformedAutomaton(format!(
            "Unexpected action rule: {other:?}"
        ))),
    }
}

/// Parses a single character symbol, handling quoted and unquoted forms.
fn parse_symbol(input: &str) -> char {
    input
        .trim_matches('\'')
        .chars()
        .next()
        .unwrap_or(BLANK_SYMBOL)
}

/// Maps the epsilon marker to `None` for PDA label fields.
fn epsilon_opt(symbol: char) -> Option<char> {
    (symbol != EPSILON).then_some(symbol)
}

/// Extracts the trimmed inner text of a single-line section.
fn parse_line_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Like `parse_line_text`, for sections whose text is optional.
fn parse_optional_line_text(pair: Pair<Rule>) -> String {
    parse_line_text(pair)
}

/// Creates an `AutomatonError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> AutomatonError {
    AutomatonError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks that a top-level section appears at most once.
fn check_unique_rule(rule: Rule, span: Span, seen: &mut HashSet<Rule>) -> Result<(), AutomatonError> {
    if !matches!(
        rule,
        Rule::name | Rule::formalism | Rule::input | Rule::states | Rule::rules
    ) {
        return Ok(());
    }

    if seen.contains(&rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    seen.insert(rule);

    Ok(())
}

/// Checks that a required section is present.
fn check_required_rule<T>(value: Option<T>, section: &str) -> Result<T, AutomatonError> {
    value.ok_or_else(|| {
        AutomatonError::MalformedAutomaton(format!("Missing '{section}' section"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_parse_fa_definition() {
        let input = r#"
name: Ends with a
type: fa
input: aabba
states:
  q0: initial
  q1: final
rules:
  q0:
    b -> q0
    a -> q1
  q1:
    b -> q0
    a -> q1
"#;

        let automaton = parse(input).unwrap();
        assert_eq!(automaton.name, "Ends with a");
        assert_eq!(automaton.formalism, Formalism::Fa);
        assert_eq!(automaton.input, "aabba");
        assert_eq!(automaton.states.len(), 2);
        assert!(automaton.state("q0").unwrap().is_initial);
        assert!(automaton.state("q1").unwrap().is_final);
        assert_eq!(automaton.transitions.len(), 4);
        assert_eq!(
            automaton.transitions[1],
            Transition::new("q0", "q1", Label::Fa { symbol: 'a' })
        );
    }

    #[test]
    fn test_parse_pda_definition() {
        let input = r#"
name: anbn
type: pda
input: aaabbb
states:
  q0: initial
  q1
  q2: final
rules:
  q0:
    a, ε -> X, q1
  q1:
    a, ε -> X, q1
    b, X -> ε, q2
  q2:
    b, X -> ε, q2
"#;

        let automaton = parse(input).unwrap();
        assert_eq!(automaton.formalism, Formalism::Pda);
        assert_eq!(automaton.transitions.len(), 4);
        assert_eq!(
            automaton.transitions[0],
            Transition::new(
                "q0",
                "q1",
                Label::Pda {
                    input: Some('a'),
                    pop: None,
                    push: Some('X'),
                }
            )
        );
        assert_eq!(
            automaton.transitions[2],
            Transition::new(
                "q1",
                "q2",
                Label::Pda {
                    input: Some('b'),
                    pop: Some('X'),
                    push: None,
                }
            )
        );
    }

    #[test]
    fn test_parse_tm_definition() {
        let input = r#"
name: Binary increment
type: tm
input: 1011
states:
  q0: initial
  q1
  q2: final
rules:
  q0:
    1 -> 1, R, q0
    0 -> 0, R, q0
    _ -> _, L, q1
  q1:
    1 -> 0, L, q1
    0 -> 1, R, q2
    _ -> 1, R, q2
"#;

        let automaton = parse(input).unwrap();
        assert_eq!(automaton.formalism, Formalism::Tm);
        assert_eq!(automaton.transitions.len(), 6);
        assert_eq!(
            automaton.transitions[2],
            Transition::new(
                "q0",
                "q1",
                Label::Tm {
                    read: '_',
                    write: '_',
                    direction: Direction::Left,
                }
            )
        );
    }

    #[test]
    fn test_parse_quoted_symbols_and_arrow_directions() {
        let input = r#"
name: Quoted
type: tm
input: ab
states:
  s: initial
  t: final
rules:
  s:
    'a' -> 'b', >, t
"#;

        let automaton = parse(input).unwrap();
        assert_eq!(
            automaton.transitions[0].label,
            Label::Tm {
                read: 'a',
                write: 'b',
                direction: Direction::Right,
            }
        );
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let input = r#"
# Accepts exactly one a.
name: One a
type: fa

states:
  q0: initial   # start here
  q1: final

rules:
  q0:
    a -> q1
"#;

        let automaton = parse(input).unwrap();
        assert_eq!(automaton.name, "One a");
        assert_eq!(automaton.input, "");
        assert_eq!(automaton.transitions.len(), 1);
    }

    #[test]
    fn test_parse_duplicate_section() {
        let input = r#"
name: First
name: Second
type: fa
states:
  q0: initial, final
rules:
"#;

        let result = parse(input);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, AutomatonError::ParseError(_)));
        assert!(error.to_string().contains("Duplicate \"name:\" declaration"));
    }

    #[test]
    fn test_parse_missing_type() {
        let input = r#"
name: No type
states:
  q0: initial, final
rules:
"#;

        let error = parse(input).unwrap_err();
        assert_eq!(
            error,
            AutomatonError::MalformedAutomaton("Missing 'type' section".to_string())
        );
    }

    #[test]
    fn test_parse_missing_states() {
        let input = r#"
name: No states
type: fa
rules:
"#;

        let error = parse(input).unwrap_err();
        assert_eq!(
            error,
            AutomatonError::MalformedAutomaton("Missing 'states' section".to_string())
        );
    }

    #[test]
    fn test_parse_undefined_state_in_rules() {
        let input = r#"
name: Ghost target
type: fa
states:
  q0: initial
rules:
  q0:
    a -> ghost
"#;

        let error = parse(input).unwrap_err();
        match error {
            AutomatonError::MalformedAutomaton(msg) => {
                assert!(msg.contains("undefined state"));
            }
            _ => panic!("Expected MalformedAutomaton, got {:?}", error),
        }
    }

    #[test]
    fn test_parse_action_kind_must_match_type() {
        // A PDA action inside an FA definition fails validation.
        let input = r#"
name: Mixed kinds
type: fa
states:
  q0: initial, final
rules:
  q0:
    a, ε -> X, q0
"#;

        let error = parse(input).unwrap_err();
        match error {
            AutomatonError::MalformedAutomaton(msg) => {
                assert!(msg.contains("wrong formalism"));
            }
            _ => panic!("Expected MalformedAutomaton, got {:?}", error),
        }
    }

    #[test]
    fn test_parse_wrong_initial_count() {
        let none = r#"
name: No initial
type: fa
states:
  q0: final
rules:
"#;
        assert!(matches!(
            parse(none),
            Err(AutomatonError::MalformedAutomaton(_))
        ));

        let two = r#"
name: Two initials
type: fa
states:
  q0: initial
  q1: initial
rules:
"#;
        assert!(matches!(
            parse(two),
            Err(AutomatonError::MalformedAutomaton(_))
        ));
    }

    #[test]
    fn test_parse_unknown_type_tag() {
        let input = r#"
name: Bad tag
type: dfa
states:
  q0: initial
rules:
"#;

        let result = parse(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_garbage_is_a_parse_error() {
        let result = parse("this is not a definition");
        assert!(matches!(result, Err(AutomatonError::ParseError(_))));
    }
}
