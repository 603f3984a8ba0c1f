//! This module provides the two memory models used by the simulator: the PDA
//! stack and the TM tape. Both guard their edge cases with no-op semantics
//! instead of errors: popping an empty stack returns `None`, and reading the
//! tape beyond its bounds returns the blank symbol.

use serde::{Deserialize, Serialize};

use crate::types::{Direction, BLANK_SYMBOL};

/// The PDA stack: an ordered sequence of symbols with the top at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    symbols: Vec<char>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a symbol onto the top of the stack.
    pub fn push(&mut self, symbol: char) {
        self.symbols.push(symbol);
    }

    /// Removes and returns the top symbol, or `None` if the stack is empty.
    /// Callers check the top against the expected pop symbol before calling;
    /// an empty stack never raises an error.
    pub fn pop(&mut self) -> Option<char> {
        self.symbols.pop()
    }

    /// Returns the top symbol without removing it, or `None` when empty.
    pub fn peek(&self) -> Option<char> {
        self.symbols.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// The full stack contents, bottom first.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

/// The TM tape: an auto-extending sequence of symbols. The head position is
/// tracked by the engine's configuration; the tape itself only stores cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<char>,
}

impl Tape {
    /// Builds a tape from an input string, one cell per character.
    pub fn from_input(input: &str) -> Self {
        Self {
            cells: input.chars().collect(),
        }
    }

    /// Reads the cell at `head`, or the blank symbol outside current bounds.
    pub fn read(&self, head: usize) -> char {
        self.cells.get(head).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Writes `symbol` at `head`, extending the tape with blanks up to `head`
    /// first if necessary.
    pub fn write(&mut self, head: usize, symbol: char) {
        if head >= self.cells.len() {
            self.cells.resize(head + 1, BLANK_SYMBOL);
        }
        self.cells[head] = symbol;
    }

    /// Computes the next head position. Moving left clamps at cell 0.
    pub fn move_head(head: usize, direction: Direction) -> usize {
        match direction {
            Direction::Left => head.saturating_sub(1),
            Direction::Right => head + 1,
            Direction::Stay => head,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The full tape contents.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// The tape as a string, useful for display and assertions.
    pub fn contents(&self) -> String {
        self.cells.iter().collect()
    }
}
