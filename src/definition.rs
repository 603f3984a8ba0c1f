//! This module defines the serde-facing definition document: the shape the
//! authoring layer hands to the engine. States carry `initial`/`final`
//! flags; transitions carry the compact label strings documented in
//! `types::Label::parse`. `compile()` turns a document into a validated
//! `Automaton`.

use serde::{Deserialize, Serialize};

use crate::analyzer::validate;
use crate::types::{Automaton, AutomatonError, Formalism, Label, State, Transition};

/// A raw transition entry: state names plus an unparsed label string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// An automaton definition document, as produced by the authoring layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "type")]
    pub formalism: Formalism,
    #[serde(default)]
    pub name: String,
    pub states: Vec<State>,
    pub transitions: Vec<TransitionEntry>,
    #[serde(default)]
    pub input: String,
}

impl Definition {
    /// Parses a JSON definition document.
    pub fn from_json(json: &str) -> Result<Self, AutomatonError> {
        serde_json::from_str(json).map_err(|e| AutomatonError::DefinitionError(e.to_string()))
    }

    /// Compiles the document into a validated `Automaton`: parses every
    /// label against the declared formalism, then runs structural
    /// validation. A failing document is never installed into an engine.
    pub fn compile(self) -> Result<Automaton, AutomatonError> {
        let transitions = self
            .transitions
            .into_iter()
            .map(|entry| {
                let label = Label::parse(self.formalism, &entry.label)?;
                Ok(Transition {
                    from: entry.from,
                    to: entry.to,
                    label,
                })
            })
            .collect::<Result<Vec<_>, AutomatonError>>()?;

        let automaton = Automaton {
            name: self.name,
            formalism: self.formalism,
            states: self.states,
            transitions,
            input: self.input,
        };

        validate(&automaton)?;

        Ok(automaton)
    }
}

impl From<&Automaton> for Definition {
    /// Re-exports an automaton as a definition document, with labels in
    /// their compact form.
    fn from(automaton: &Automaton) -> Self {
        Self {
            formalism: automaton.formalism,
            name: automaton.name.clone(),
            states: automaton.states.clone(),
            transitions: automaton
                .transitions
                .iter()
                .map(|t| TransitionEntry {
                    from: t.from.clone(),
                    to: t.to.clone(),
                    label: t.label.to_string(),
                })
                .collect(),
            input: automaton.input.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANBN_JSON: &str = r#"{
        "type": "pda",
        "name": "anbn",
        "states": [
            { "name": "q0", "initial": true },
            { "name": "q1" },
            { "name": "q2", "final": true }
        ],
        "transitions": [
            { "from": "q0", "to": "q1", "label": "a,ε→X" },
            { "from": "q1", "to": "q1", "label": "a,ε→X" },
            { "from": "q1", "to": "q2", "label": "b,X→ε" },
            { "from": "q2", "to": "q2", "label": "b,X→ε" }
        ],
        "input": "aaabbb"
    }"#;

    #[test]
    fn test_compile_json_definition() {
        let automaton = Definition::from_json(ANBN_JSON).unwrap().compile().unwrap();

        assert_eq!(automaton.formalism, Formalism::Pda);
        assert_eq!(automaton.input, "aaabbb");
        assert_eq!(automaton.transitions.len(), 4);
        assert_eq!(
            automaton.transitions[0].label,
            Label::Pda {
                input: Some('a'),
                pop: None,
                push: Some('X'),
            }
        );
    }

    #[test]
    fn test_invalid_json_is_a_definition_error() {
        let result = Definition::from_json("{ not json }");
        assert!(matches!(result, Err(AutomatonError::DefinitionError(_))));
    }

    #[test]
    fn test_bad_label_fails_compilation() {
        let json = r#"{
            "type": "tm",
            "name": "bad",
            "states": [{ "name": "q0", "initial": true }],
            "transitions": [{ "from": "q0", "to": "q0", "label": "no-arrow" }]
        }"#;

        let result = Definition::from_json(json).unwrap().compile();
        assert!(matches!(result, Err(AutomatonError::MalformedAutomaton(_))));
    }

    #[test]
    fn test_undefined_state_fails_compilation() {
        let json = r#"{
            "type": "fa",
            "name": "ghost",
            "states": [{ "name": "q0", "initial": true }],
            "transitions": [{ "from": "q0", "to": "ghost", "label": "a" }]
        }"#;

        let result = Definition::from_json(json).unwrap().compile();
        assert!(matches!(result, Err(AutomatonError::MalformedAutomaton(_))));
    }

    #[test]
    fn test_roundtrip_through_definition() {
        let automaton = Definition::from_json(ANBN_JSON).unwrap().compile().unwrap();
        let document = Definition::from(&automaton);

        assert_eq!(document.transitions[0].label, "a,ε→X");
        assert_eq!(document.compile().unwrap(), automaton);
    }
}
