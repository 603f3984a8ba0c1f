//! This module defines the core data structures shared across the simulator:
//! the automaton description (states, transitions, formalism-tagged labels),
//! run statuses, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol used on a Turing Machine tape.
pub const BLANK_SYMBOL: char = '_';
/// The epsilon marker used in PDA labels for "no symbol".
pub const EPSILON: char = 'ε';
/// The maximum number of steps `run()` executes before giving up.
pub const MAX_RUN_STEPS: usize = 10000;

/// The three supported formalisms. The resolver and the engine match
/// exhaustively on this tag, so adding a fourth formalism is a compile error
/// until every match arm is extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formalism {
    /// Finite automaton: consumes one input symbol per transition.
    Fa,
    /// Pushdown automaton: FA plus a single stack.
    Pda,
    /// Turing machine: mutable auto-extending tape with a movable head.
    Tm,
}

impl Formalism {
    /// Short lowercase tag, as used in definition documents.
    pub fn tag(&self) -> &'static str {
        match self {
            Formalism::Fa => "fa",
            Formalism::Pda => "pda",
            Formalism::Tm => "tm",
        }
    }
}

impl std::str::FromStr for Formalism {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fa" => Ok(Formalism::Fa),
            "pda" => Ok(Formalism::Pda),
            "tm" => Ok(Formalism::Tm),
            other => Err(AutomatonError::MalformedAutomaton(format!(
                "Unknown formalism tag: {other}"
            ))),
        }
    }
}

impl fmt::Display for Formalism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A control state. Exactly one state per automaton is marked initial;
/// any number may be final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    #[serde(default, rename = "initial")]
    pub is_initial: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

impl State {
    pub fn new(name: &str, is_initial: bool, is_final: bool) -> Self {
        Self {
            name: name.to_string(),
            is_initial,
            is_final,
        }
    }
}

/// Head movement for a Turing Machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Stay,
}

impl Direction {
    /// Single-letter form used in compact labels (`L`, `R`, `S`).
    pub fn letter(&self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "L" => Ok(Direction::Left),
            ">" | "R" => Ok(Direction::Right),
            "-" | "S" => Ok(Direction::Stay),
            other => Err(AutomatonError::MalformedAutomaton(format!(
                "Unsupported direction: {other}"
            ))),
        }
    }
}

/// A transition label. The structure depends on the formalism, so the label
/// is a closed tagged variant rather than a stringly-typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// FA: a single input symbol.
    Fa { symbol: char },
    /// PDA: input / pop / push, each optionally epsilon (`None`).
    Pda {
        input: Option<char>,
        pop: Option<char>,
        push: Option<char>,
    },
    /// TM: read symbol, write symbol, and head direction. Always fully
    /// specified; no epsilon case exists.
    Tm {
        read: char,
        write: char,
        direction: Direction,
    },
}

impl Label {
    /// Parses a compact label string for the given formalism.
    ///
    /// Encodings (the authoring-layer wire format):
    /// - FA: the symbol itself, e.g. `a`
    /// - PDA: `input,pop→push`, e.g. `a,ε→X`
    /// - TM: `read→write,direction`, e.g. `1→0,L`
    ///
    /// The ASCII arrow `->` is accepted as an alias for `→`.
    pub fn parse(formalism: Formalism, label: &str) -> Result<Label, AutomatonError> {
        let text = label.trim().replace("->", "→");

        match formalism {
            Formalism::Fa => {
                let symbol = single_symbol(&text, label)?;
                Ok(Label::Fa { symbol })
            }
            Formalism::Pda => {
                let (input, stack_op) = text
                    .split_once(',')
                    .ok_or_else(|| malformed_label(label, "expected input,pop→push"))?;
                let (pop, push) = stack_op
                    .split_once('→')
                    .ok_or_else(|| malformed_label(label, "expected input,pop→push"))?;

                Ok(Label::Pda {
                    input: epsilon_symbol(input, label)?,
                    pop: epsilon_symbol(pop, label)?,
                    push: epsilon_symbol(push, label)?,
                })
            }
            Formalism::Tm => {
                let (read, action) = text
                    .split_once('→')
                    .ok_or_else(|| malformed_label(label, "expected read→write,direction"))?;
                let (write, direction) = action
                    .split_once(',')
                    .ok_or_else(|| malformed_label(label, "expected read→write,direction"))?;

                Ok(Label::Tm {
                    read: single_symbol(read, label)?,
                    write: single_symbol(write, label)?,
                    direction: direction.parse()?,
                })
            }
        }
    }

    /// The formalism this label belongs to.
    pub fn formalism(&self) -> Formalism {
        match self {
            Label::Fa { .. } => Formalism::Fa,
            Label::Pda { .. } => Formalism::Pda,
            Label::Tm { .. } => Formalism::Tm,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Fa { symbol } => write!(f, "{symbol}"),
            Label::Pda { input, pop, push } => write!(
                f,
                "{},{}→{}",
                input.unwrap_or(EPSILON),
                pop.unwrap_or(EPSILON),
                push.unwrap_or(EPSILON)
            ),
            Label::Tm {
                read,
                write,
                direction,
            } => write!(f, "{read}→{write},{}", direction.letter()),
        }
    }
}

fn malformed_label(label: &str, reason: &str) -> AutomatonError {
    AutomatonError::MalformedAutomaton(format!("Malformed label \"{label}\": {reason}"))
}

fn single_symbol(part: &str, label: &str) -> Result<char, AutomatonError> {
    let mut chars = part.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(malformed_label(label, "expected a single symbol")),
    }
}

fn epsilon_symbol(part: &str, label: &str) -> Result<Option<char>, AutomatonError> {
    let symbol = single_symbol(part, label)?;
    Ok((symbol != EPSILON).then_some(symbol))
}

/// A single transition rule: an edge between two named states carrying a
/// formalism-specific label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub label: Label,
}

impl Transition {
    pub fn new(from: &str, to: &str, label: Label) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            label,
        }
    }
}

/// A complete automaton description. Constructed once per load and immutable
/// for the duration of a run; transitions keep declaration order, which the
/// resolver uses as its deterministic tie-break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automaton {
    pub name: String,
    pub formalism: Formalism,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
    /// Default input string shipped with the definition. FA/PDA consume it
    /// left to right; a TM uses it as the tape's initial contents.
    #[serde(default)]
    pub input: String,
}

impl Automaton {
    /// Looks up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    /// The unique initial state, if the automaton declares one.
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    /// Whether the named state is final. Unknown names are not final.
    pub fn is_final(&self, name: &str) -> bool {
        self.state(name).is_some_and(|s| s.is_final)
    }

    /// Transitions leaving the named state, in declaration order.
    pub fn transitions_from<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a Transition> + use<'a, 'b> {
        self.transitions.iter().filter(move |t| t.from == name)
    }
}

/// The run lifecycle of the execution engine. `Ready` is the initial state;
/// the three halted statuses are terminal until `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Ready,
    Running,
    /// Halted with acceptance.
    Accepted,
    /// Halted with rejection (FA/PDA): input exhausted outside a final state,
    /// or no transition matched mid-run.
    Rejected,
    /// Halted without an applicable instruction (TM). Distinct from rejection.
    NoTransition,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Accepted | RunStatus::Rejected | RunStatus::NoTransition
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RunStatus::Ready => "Ready",
            RunStatus::Running => "Running",
            RunStatus::Accepted => "Accepted",
            RunStatus::Rejected => "Rejected",
            RunStatus::NoTransition => "Halted (no transition)",
        };
        f.write_str(text)
    }
}

/// Errors surfaced while loading an automaton. Run-time outcomes (rejection,
/// halting without a transition) are reported through `RunStatus`, never as
/// errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// Structural violation detected at load time: undefined state reference,
    /// wrong initial-state count, or a label that does not fit the formalism.
    #[error("Malformed automaton: {0}")]
    MalformedAutomaton(String),
    /// Syntax error while parsing a `.aut` definition.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Malformed JSON definition document.
    #[error("Definition error: {0}")]
    DefinitionError(String),
    /// File system error while loading definitions.
    #[error("File error: {0}")]
    FileError(String),
    /// Lookup of an unknown bundled automaton.
    #[error("Automaton not found: {0}")]
    NotFound(String),
}
