//! This module selects the transition to apply for the current configuration.
//! Selection is deterministic: candidates are considered in declaration order
//! and the first match wins. An empty result is not an error; it is the
//! halt/reject signal the engine acts on.

use crate::types::{Automaton, Formalism, Label, Transition};

/// What the automaton currently "sees", per formalism. The engine builds this
/// from its configuration; the resolver never touches engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadContext {
    /// The input symbol under the cursor.
    Fa { symbol: char },
    /// The input symbol under the cursor plus the stack top (`None` = empty).
    Pda {
        symbol: char,
        stack_top: Option<char>,
    },
    /// The tape symbol under the head.
    Tm { symbol: char },
}

/// Picks at most one transition for the given state and read context.
///
/// - FA: first transition from `state` whose symbol equals the input symbol.
/// - PDA: input-consuming candidates take precedence over epsilon-input
///   candidates; within each group the first eligible transition (pop symbol
///   epsilon or equal to the stack top) in declaration order wins. The fixed
///   consume-before-epsilon precedence prefers termination over pure epsilon
///   loops; this is not a non-determinism search.
/// - TM: first transition from `state` whose read symbol equals the tape
///   symbol under the head.
pub fn resolve<'a>(
    automaton: &'a Automaton,
    state: &str,
    context: &ReadContext,
) -> Option<&'a Transition> {
    match (automaton.formalism, context) {
        (Formalism::Fa, ReadContext::Fa { symbol }) => resolve_fa(automaton, state, *symbol),
        (Formalism::Pda, ReadContext::Pda { symbol, stack_top }) => {
            resolve_pda(automaton, state, *symbol, *stack_top)
        }
        (Formalism::Tm, ReadContext::Tm { symbol }) => resolve_tm(automaton, state, *symbol),
        // Context built for a different formalism than the automaton's.
        _ => None,
    }
}

fn resolve_fa<'a>(automaton: &'a Automaton, state: &str, symbol: char) -> Option<&'a Transition> {
    automaton
        .transitions_from(state)
        .find(|t| matches!(t.label, Label::Fa { symbol: s } if s == symbol))
}

fn resolve_pda<'a>(
    automaton: &'a Automaton,
    state: &str,
    symbol: char,
    stack_top: Option<char>,
) -> Option<&'a Transition> {
    let mut first_epsilon = None;

    for transition in automaton.transitions_from(state) {
        let Label::Pda { input, pop, .. } = transition.label else {
            continue;
        };

        // Pop eligibility: epsilon pops always apply; a concrete pop symbol
        // must match the current stack top.
        let pop_ok = match pop {
            None => true,
            Some(expected) => stack_top == Some(expected),
        };
        if !pop_ok {
            continue;
        }

        match input {
            Some(s) if s == symbol => return Some(transition),
            None if first_epsilon.is_none() => first_epsilon = Some(transition),
            _ => {}
        }
    }

    first_epsilon
}

fn resolve_tm<'a>(automaton: &'a Automaton, state: &str, symbol: char) -> Option<&'a Transition> {
    automaton
        .transitions_from(state)
        .find(|t| matches!(t.label, Label::Tm { read, .. } if read == symbol))
}
