//! This module manages the collection of bundled demo automata: the example
//! machines from the simulator's examples panel, embedded at compile time and
//! parsed on first use.

use crate::types::{Automaton, AutomatonError};

use std::sync::RwLock;

// Default embedded automata
const DEMO_TEXTS: [&str; 6] = [
    include_str!("../demos/ends-with-a.aut"),
    include_str!("../demos/even-a.aut"),
    include_str!("../demos/starts-with-ab.aut"),
    include_str!("../demos/palindrome.aut"),
    include_str!("../demos/anbn.aut"),
    include_str!("../demos/binary-increment.aut"),
];

lazy_static::lazy_static! {
    pub static ref AUTOMATA: RwLock<Vec<Automaton>> = RwLock::new(Vec::new());
}

pub struct Library;

impl Library {
    /// Parses the embedded demo definitions into the shared registry.
    pub fn load() -> Result<(), AutomatonError> {
        let mut automata = Vec::new();

        for text in DEMO_TEXTS {
            if let Ok(automaton) = crate::parser::parse(text) {
                automata.push(automaton);
            } else {
                eprintln!("Failed to parse bundled automaton");
            }
        }

        if let Ok(mut write_guard) = AUTOMATA.write() {
            *write_guard = automata;
        } else {
            return Err(AutomatonError::FileError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of bundled automata.
    pub fn count() -> usize {
        let _ = Self::load();

        AUTOMATA.read().map(|automata| automata.len()).unwrap_or(0)
    }

    /// Fetches a bundled automaton by its index.
    pub fn by_index(index: usize) -> Result<Automaton, AutomatonError> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map_err(|_| AutomatonError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                AutomatonError::NotFound(format!("index {index} out of range"))
            })
    }

    /// Fetches a bundled automaton by name.
    pub fn by_name(name: &str) -> Result<Automaton, AutomatonError> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map_err(|_| AutomatonError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|automaton| automaton.name == name)
            .cloned()
            .ok_or_else(|| AutomatonError::NotFound(name.to_string()))
    }

    /// Lists the names of all bundled automata.
    pub fn names() -> Vec<String> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map(|automata| {
                automata
                    .iter()
                    .map(|automaton| automaton.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Summarizes a bundled automaton.
    pub fn info(index: usize) -> Result<AutomatonInfo, AutomatonError> {
        let automaton = Self::by_index(index)?;

        Ok(AutomatonInfo {
            index,
            name: automaton.name.clone(),
            formalism: automaton.formalism.tag(),
            input: automaton.input.clone(),
            state_count: automaton.states.len(),
            transition_count: automaton.transitions.len(),
        })
    }

    /// Case-insensitive search over bundled automaton names.
    pub fn search(query: &str) -> Vec<usize> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map(|automata| {
                automata
                    .iter()
                    .enumerate()
                    .filter(|(_, automaton)| {
                        automaton
                            .name
                            .to_lowercase()
                            .contains(&query.to_lowercase())
                    })
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// The original definition text of a bundled automaton.
    pub fn text(index: usize) -> Result<&'static str, AutomatonError> {
        DEMO_TEXTS
            .get(index)
            .copied()
            .ok_or_else(|| AutomatonError::NotFound(format!("index {index} out of range")))
    }
}

/// Summary of a bundled automaton.
#[derive(Debug, Clone)]
pub struct AutomatonInfo {
    pub index: usize,
    pub name: String,
    pub formalism: &'static str,
    pub input: String,
    pub state_count: usize,
    pub transition_count: usize,
}
