//! This module defines the `Engine`, which owns the complete mutable runtime
//! state of one execution (control state, input cursor, stack, tape, head)
//! and drives the Ready → Running → halted lifecycle. Each step resolves at
//! most one transition, applies it, and reports a step-completion event.

use serde::Serialize;

use crate::analyzer::validate;
use crate::memory::{Stack, Tape};
use crate::resolver::{resolve, ReadContext};
use crate::types::{Automaton, AutomatonError, Formalism, Label, RunStatus, Transition, MAX_RUN_STEPS};

/// The complete mutable runtime state of one execution. Rebuilt from the
/// automaton and input on every `reset()`; owned exclusively by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Current control state name.
    pub state: String,
    /// Input cursor (FA/PDA).
    pub cursor: usize,
    /// Stack (PDA).
    pub stack: Stack,
    /// Tape (TM). Seeded from the input string.
    pub tape: Tape,
    /// Head position (TM). Clamped at 0 when moving left.
    pub head: usize,
}

impl Configuration {
    fn new(automaton: &Automaton, input: &[char]) -> Self {
        // Validation guarantees exactly one initial state.
        let state = automaton
            .initial_state()
            .map(|s| s.name.clone())
            .unwrap_or_default();

        let tape = match automaton.formalism {
            Formalism::Tm => Tape::from_input(&input.iter().collect::<String>()),
            _ => Tape::default(),
        };

        Self {
            state,
            cursor: 0,
            stack: Stack::new(),
            tape,
            head: 0,
        }
    }
}

/// An immutable view of the configuration, published with every step event.
/// Consumers (visualization, debug panels) read it; they never mutate engine
/// state through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: String,
    pub cursor: usize,
    pub head: usize,
    pub stack: Vec<char>,
    pub tape: Vec<char>,
}

/// A step-completion event: the transition just applied (or `None` when the
/// step reached a terminal status without taking one), the new configuration
/// snapshot, and the new run status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepEvent {
    /// Number of transitions applied so far, including this one.
    pub step: usize,
    pub taken: Option<Transition>,
    pub snapshot: Snapshot,
    pub status: RunStatus,
}

type Observer = Box<dyn FnMut(&StepEvent)>;

/// The execution engine for one automaton and one input string.
///
/// A step resolves synchronously to a decision; only the visual playback of
/// that decision is deferred, and that deferral belongs to the caller. The
/// two-phase contract: `step()` marks a step in flight and ignores further
/// `step()`/`run()` calls until `complete_step()` acknowledges the visual
/// completion. `reset()` discards any pending step from any state.
pub struct Engine {
    automaton: Automaton,
    input: Vec<char>,
    config: Configuration,
    status: RunStatus,
    step_in_flight: bool,
    step_count: usize,
    observers: Vec<Observer>,
}

impl Engine {
    /// Validates the automaton and installs it with its bundled default
    /// input. A malformed automaton is never installed.
    pub fn new(automaton: Automaton) -> Result<Self, AutomatonError> {
        validate(&automaton)?;

        let input: Vec<char> = automaton.input.chars().collect();
        let config = Configuration::new(&automaton, &input);

        Ok(Self {
            automaton,
            input,
            config,
            status: RunStatus::Ready,
            step_in_flight: false,
            step_count: 0,
            observers: Vec::new(),
        })
    }

    /// Validates the automaton and installs it with the given input string.
    pub fn with_input(automaton: Automaton, input: &str) -> Result<Self, AutomatonError> {
        let mut engine = Self::new(automaton)?;
        engine.set_input(input);
        Ok(engine)
    }

    /// Replaces the input string and resets the engine.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.chars().collect();
        self.reset();
    }

    /// Registers a step-completion observer. Observers are called after every
    /// step decision, including terminal ones.
    pub fn on_step(&mut self, observer: impl FnMut(&StepEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Number of transitions applied since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Whether a step has been taken but not yet acknowledged via
    /// `complete_step()`.
    pub fn step_in_flight(&self) -> bool {
        self.step_in_flight
    }

    /// The current configuration as a publishable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.config.state.clone(),
            cursor: self.config.cursor,
            head: self.config.head,
            stack: self.config.stack.symbols().to_vec(),
            tape: self.config.tape.cells().to_vec(),
        }
    }

    /// Returns the engine to `Ready` from any state: rebuilds the
    /// configuration, clears the step counter, and discards any pending step.
    pub fn reset(&mut self) {
        self.config = Configuration::new(&self.automaton, &self.input);
        self.status = RunStatus::Ready;
        self.step_in_flight = false;
        self.step_count = 0;
    }

    /// Executes a single step. Returns `None` when the request is ignored:
    /// either a previous step is still in flight or the run has already
    /// reached a terminal status.
    ///
    /// When a transition is applied the step is marked in flight; the caller
    /// acknowledges its visual completion with `complete_step()` before
    /// requesting the next one. Terminal decisions take no transition and
    /// leave nothing in flight.
    pub fn step(&mut self) -> Option<StepEvent> {
        if self.step_in_flight || self.status.is_terminal() {
            return None;
        }

        let event = self.advance();
        if event.taken.is_some() {
            self.step_in_flight = true;
        }
        Some(event)
    }

    /// Acknowledges that the visual playback of the in-flight step finished.
    pub fn complete_step(&mut self) {
        self.step_in_flight = false;
    }

    /// Drives the step logic to a terminal status without pacing, capped at
    /// `MAX_RUN_STEPS` so a diverging machine still returns. If the cap is
    /// hit the status is still `Running`. Ignored while a step is in flight.
    pub fn run(&mut self) -> RunStatus {
        if self.step_in_flight {
            return self.status;
        }

        for _ in 0..MAX_RUN_STEPS {
            if self.status.is_terminal() {
                break;
            }
            self.advance();
        }

        self.status
    }

    /// Resolves and applies one transition, updates the status, and emits the
    /// step event. Callers handle gating; this always makes a decision.
    fn advance(&mut self) -> StepEvent {
        let (taken, status) = match self.automaton.formalism {
            Formalism::Fa => self.advance_fa(),
            Formalism::Pda => self.advance_pda(),
            Formalism::Tm => self.advance_tm(),
        };

        self.status = status;
        if taken.is_some() {
            self.step_count += 1;
        }

        let event = StepEvent {
            step: self.step_count,
            taken,
            snapshot: self.snapshot(),
            status,
        };

        for observer in self.observers.iter_mut() {
            observer(&event);
        }

        event
    }

    /// FA step: at end of input, accept iff the current state is final;
    /// otherwise consume one symbol through the first matching transition.
    fn advance_fa(&mut self) -> (Option<Transition>, RunStatus) {
        if self.config.cursor >= self.input.len() {
            return (None, self.end_of_input_status());
        }

        let symbol = self.input[self.config.cursor];
        let Some(transition) =
            resolve(&self.automaton, &self.config.state, &ReadContext::Fa { symbol }).cloned()
        else {
            return (None, RunStatus::Rejected);
        };

        self.config.state = transition.to.clone();
        self.config.cursor += 1;

        (Some(transition), RunStatus::Running)
    }

    /// PDA step: same end-of-input final check as the FA; otherwise apply the
    /// chosen transition's stack effects and advance the cursor only when an
    /// input symbol was consumed.
    fn advance_pda(&mut self) -> (Option<Transition>, RunStatus) {
        if self.config.cursor >= self.input.len() {
            return (None, self.end_of_input_status());
        }

        let context = ReadContext::Pda {
            symbol: self.input[self.config.cursor],
            stack_top: self.config.stack.peek(),
        };
        let Some(transition) = resolve(&self.automaton, &self.config.state, &context).cloned()
        else {
            return (None, RunStatus::Rejected);
        };

        if let Label::Pda { input, pop, push } = transition.label {
            if pop.is_some() {
                self.config.stack.pop();
            }
            if let Some(symbol) = push {
                self.config.stack.push(symbol);
            }
            if input.is_some() {
                self.config.cursor += 1;
            }
        }
        self.config.state = transition.to.clone();

        (Some(transition), RunStatus::Running)
    }

    /// TM step: a final state halts with acceptance immediately, regardless
    /// of tape contents; otherwise write, move the head, and change state.
    /// No applicable instruction halts without acceptance — distinct from
    /// rejection.
    fn advance_tm(&mut self) -> (Option<Transition>, RunStatus) {
        if self.automaton.is_final(&self.config.state) {
            return (None, RunStatus::Accepted);
        }

        let symbol = self.config.tape.read(self.config.head);
        let Some(transition) =
            resolve(&self.automaton, &self.config.state, &ReadContext::Tm { symbol }).cloned()
        else {
            return (None, RunStatus::NoTransition);
        };

        if let Label::Tm {
            write, direction, ..
        } = transition.label
        {
            self.config.tape.write(self.config.head, write);
            self.config.head = Tape::move_head(self.config.head, direction);
        }
        self.config.state = transition.to.clone();

        (Some(transition), RunStatus::Running)
    }

    fn end_of_input_status(&self) -> RunStatus {
        if self.automaton.is_final(&self.config.state) {
            RunStatus::Accepted
        } else {
            RunStatus::Rejected
        }
    }
}
