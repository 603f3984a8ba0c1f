//! This module validates automaton descriptions at load time, before they are
//! installed into an engine. Validation covers structural requirements only:
//! duplicate transitions, unreachable states, and multiple final states are
//! all legal and left alone.

use crate::types::{Automaton, AutomatonError};
use std::collections::HashSet;

/// Structural violations found while validating an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// A transition references a state name that is not defined.
    UndefinedState { transition: String, state: String },
    /// No state is marked initial.
    NoInitialState,
    /// More than one state is marked initial.
    MultipleInitialStates(Vec<String>),
    /// A transition label's structure does not match the formalism tag.
    MismatchedLabel { transition: String },
}

impl From<ValidationError> for AutomatonError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::UndefinedState { transition, state } => {
                AutomatonError::MalformedAutomaton(format!(
                    "Transition {transition} references undefined state: {state}"
                ))
            }
            ValidationError::NoInitialState => {
                AutomatonError::MalformedAutomaton("No initial state defined".to_string())
            }
            ValidationError::MultipleInitialStates(states) => AutomatonError::MalformedAutomaton(
                format!("Multiple initial states defined: {states:?}"),
            ),
            ValidationError::MismatchedLabel { transition } => {
                AutomatonError::MalformedAutomaton(format!(
                    "Transition {transition} carries a label of the wrong formalism"
                ))
            }
        }
    }
}

/// Validates an automaton description.
///
/// Fails with `AutomatonError::MalformedAutomaton` if any transition
/// references an undefined state, if the initial-state count is not exactly
/// one, or if a transition label does not fit the declared formalism.
pub fn validate(automaton: &Automaton) -> Result<(), AutomatonError> {
    let errors = [
        check_initial_state,
        check_transition_endpoints,
        check_label_formalisms,
    ]
    .iter()
    .filter_map(|check| check(automaton).err())
    .collect::<Vec<_>>();

    match errors.into_iter().next() {
        Some(first) => Err(first.into()),
        None => Ok(()),
    }
}

/// Checks that exactly one state is marked initial.
fn check_initial_state(automaton: &Automaton) -> Result<(), ValidationError> {
    let initial: Vec<String> = automaton
        .states
        .iter()
        .filter(|s| s.is_initial)
        .map(|s| s.name.clone())
        .collect();

    match initial.len() {
        0 => Err(ValidationError::NoInitialState),
        1 => Ok(()),
        _ => Err(ValidationError::MultipleInitialStates(initial)),
    }
}

/// Checks that every transition's `from` and `to` name a defined state.
fn check_transition_endpoints(automaton: &Automaton) -> Result<(), ValidationError> {
    let defined: HashSet<&str> = automaton.states.iter().map(|s| s.name.as_str()).collect();

    for (i, transition) in automaton.transitions.iter().enumerate() {
        for endpoint in [&transition.from, &transition.to] {
            if !defined.contains(endpoint.as_str()) {
                return Err(ValidationError::UndefinedState {
                    transition: format!("#{i} ({} → {})", transition.from, transition.to),
                    state: endpoint.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Checks that every transition label matches the automaton's formalism tag.
fn check_label_formalisms(automaton: &Automaton) -> Result<(), ValidationError> {
    for (i, transition) in automaton.transitions.iter().enumerate() {
        if transition.label.formalism() != automaton.formalism {
            return Err(ValidationError::MismatchedLabel {
                transition: format!("#{i} ({} → {})", transition.from, transition.to),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Formalism, Label, State, Transition};

    fn fa(states: Vec<State>, transitions: Vec<Transition>) -> Automaton {
        Automaton {
            name: "validation-test".to_string(),
            formalism: Formalism::Fa,
            states,
            transitions,
            input: String::new(),
        }
    }

    #[test]
    fn test_valid_automaton() {
        let automaton = fa(
            vec![State::new("q0", true, false), State::new("q1", false, true)],
            vec![Transition::new("q0", "q1", Label::Fa { symbol: 'a' })],
        );
        assert!(validate(&automaton).is_ok());
    }

    #[test]
    fn test_undefined_to_state() {
        let automaton = fa(
            vec![State::new("q0", true, false)],
            vec![Transition::new("q0", "missing", Label::Fa { symbol: 'a' })],
        );

        let error = validate(&automaton).unwrap_err();
        match error {
            AutomatonError::MalformedAutomaton(msg) => {
                assert!(msg.contains("undefined state"));
                assert!(msg.contains("missing"));
            }
            _ => panic!("Expected MalformedAutomaton, got {:?}", error),
        }
    }

    #[test]
    fn test_undefined_from_state() {
        let automaton = fa(
            vec![State::new("q0", true, true)],
            vec![Transition::new("ghost", "q0", Label::Fa { symbol: 'a' })],
        );
        assert!(validate(&automaton).is_err());
    }

    #[test]
    fn test_no_initial_state() {
        let automaton = fa(vec![State::new("q0", false, true)], vec![]);

        let error = validate(&automaton).unwrap_err();
        assert_eq!(
            error,
            AutomatonError::MalformedAutomaton("No initial state defined".to_string())
        );
    }

    #[test]
    fn test_multiple_initial_states() {
        let automaton = fa(
            vec![State::new("q0", true, false), State::new("q1", true, false)],
            vec![],
        );

        let error = validate(&automaton).unwrap_err();
        match error {
            AutomatonError::MalformedAutomaton(msg) => {
                assert!(msg.contains("Multiple initial states"));
            }
            _ => panic!("Expected MalformedAutomaton"),
        }
    }

    #[test]
    fn test_mismatched_label_formalism() {
        let automaton = fa(
            vec![State::new("q0", true, true)],
            vec![Transition::new(
                "q0",
                "q0",
                Label::Pda {
                    input: Some('a'),
                    pop: None,
                    push: None,
                },
            )],
        );

        let error = validate(&automaton).unwrap_err();
        match error {
            AutomatonError::MalformedAutomaton(msg) => {
                assert!(msg.contains("wrong formalism"));
            }
            _ => panic!("Expected MalformedAutomaton"),
        }
    }

    #[test]
    fn test_duplicates_and_unreachable_states_are_legal() {
        let automaton = fa(
            vec![
                State::new("q0", true, false),
                State::new("q1", false, true),
                State::new("island", false, true),
            ],
            vec![
                Transition::new("q0", "q1", Label::Fa { symbol: 'a' }),
                Transition::new("q0", "q1", Label::Fa { symbol: 'a' }),
            ],
        );
        assert!(validate(&automaton).is_ok());
    }
}
