//! This crate provides the core logic for an automata simulator covering
//! three formalisms: finite automata, pushdown automata, and Turing machines.
//! It includes modules for parsing automaton definitions, resolving and
//! applying transitions step by step, validating definitions, and managing a
//! collection of bundled demo automata.

pub mod analyzer;
pub mod definition;
pub mod engine;
pub mod library;
pub mod loader;
pub mod memory;
pub mod parser;
pub mod resolver;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `validate` function and `ValidationError` enum from the analyzer module.
pub use analyzer::{validate, ValidationError};
/// Re-exports the JSON authoring interface from the definition module.
pub use definition::{Definition, TransitionEntry};
/// Re-exports the execution engine and its step event types.
pub use engine::{Configuration, Engine, Snapshot, StepEvent};
/// Re-exports the bundled demo registry from the library module.
pub use library::{AutomatonInfo, Library, AUTOMATA};
/// Re-exports the `DefinitionLoader` struct from the loader module.
pub use loader::DefinitionLoader;
/// Re-exports the stack and tape memory models.
pub use memory::{Stack, Tape};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the transition resolver.
pub use resolver::{resolve, ReadContext};
/// Re-exports the core automaton types.
pub use types::{
    Automaton, AutomatonError, Direction, Formalism, Label, RunStatus, State, Transition,
    BLANK_SYMBOL, EPSILON, MAX_RUN_STEPS,
};
