// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Finite automata over integer labels.
//!
//! Labels are bytes (`0..=255`) or Unicode code points, depending on where in
//! the pipeline an automaton sits. Transitions carry an inclusive label range,
//! so "any character except `a`" is two transitions rather than a million.
//!
//! Storage is CSR: one flat transition array sorted by source state, plus an
//! offsets array. State 0 is always the initial state. Automata are immutable
//! once built; [`AutomatonBuilder`] is the only way to make one, and it
//! resolves epsilon edges at `finish()` so nothing downstream has to know
//! they existed.
//!
//! ```text
//! token stream ──▶ token_stream ──▶ replace_sep ──▶ determinize ──▶ (utf8) ──▶ FST intersection
//!                                        │
//!                                        └──▶ finite_strings ──▶ build records
//! ```

mod finite_strings;
mod ops;
mod token_stream;
mod utf8;

pub use finite_strings::*;
pub use ops::*;
pub use token_stream::*;
pub use utf8::*;

/// Index of a state inside one automaton.
pub type StateId = u32;

/// Label marking a token boundary.
pub const SEP_LABEL: u32 = 0x1F;

/// Label marking a position gap (a removed token).
pub const HOLE_LABEL: u32 = 0x1E;

/// Highest label in byte mode.
pub const MAX_BYTE_LABEL: u32 = 0xFF;

/// Highest label in code-point mode.
pub const MAX_CODE_POINT: u32 = char::MAX as u32;

/// Determinization state budget used throughout the suggester.
pub const DEFAULT_MAX_DETERMINIZED_STATES: usize = 10_000;

/// A transition on every label in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    pub min: u32,
    pub max: u32,
    pub dest: StateId,
}

impl Transition {
    #[inline]
    pub fn covers(&self, label: u32) -> bool {
        self.min <= label && label <= self.max
    }
}

/// An immutable automaton in CSR form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Automaton {
    accept: Vec<bool>,
    /// `transitions[offsets[s]..offsets[s + 1]]` leave state `s`.
    offsets: Vec<u32>,
    transitions: Vec<Transition>,
}

impl Automaton {
    pub fn num_states(&self) -> usize {
        self.accept.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_accept(&self, state: StateId) -> bool {
        self.accept[state as usize]
    }

    /// Transitions leaving `state`, sorted by `(min, max, dest)`.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        let start = self.offsets[state as usize] as usize;
        let end = self.offsets[state as usize + 1] as usize;
        &self.transitions[start..end]
    }

    /// True when no state has two transitions with overlapping ranges.
    pub fn is_deterministic(&self) -> bool {
        (0..self.num_states() as StateId).all(|state| {
            self.transitions(state)
                .windows(2)
                .all(|pair| pair[0].max < pair[1].min)
        })
    }

    /// Destination of the first transition covering `label`.
    pub fn step(&self, state: StateId, label: u32) -> Option<StateId> {
        let transitions = self.transitions(state);
        // Sorted by min; the candidate is the last transition starting at or before `label`.
        let idx = transitions.partition_point(|t| t.min <= label);
        transitions[..idx]
            .iter()
            .rev()
            .find(|t| t.covers(label))
            .map(|t| t.dest)
    }

    /// Whether the automaton accepts `input`. Handles nondeterminism by
    /// tracking the full set of live states.
    pub fn run(&self, input: &[u32]) -> bool {
        if self.num_states() == 0 {
            return false;
        }
        let mut current = vec![0 as StateId];
        for &label in input {
            let mut next: Vec<StateId> = current
                .iter()
                .flat_map(|&s| self.transitions(s).iter())
                .filter(|t| t.covers(label))
                .map(|t| t.dest)
                .collect();
            next.sort_unstable();
            next.dedup();
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current.iter().any(|&s| self.is_accept(s))
    }
}

/// Incrementally assembles an [`Automaton`].
///
/// Epsilon edges are allowed while building. `finish()` folds every epsilon
/// closure into its source state: the source gains the transitions of every
/// state it reaches for free, and becomes accepting if any of them is.
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    accept: Vec<bool>,
    transitions: Vec<(StateId, Transition)>,
    epsilons: Vec<(StateId, StateId)>,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_state(&mut self) -> StateId {
        self.accept.push(false);
        (self.accept.len() - 1) as StateId
    }

    pub fn num_states(&self) -> usize {
        self.accept.len()
    }

    pub fn set_accept(&mut self, state: StateId, accept: bool) {
        self.accept[state as usize] = accept;
    }

    pub fn is_accept(&self, state: StateId) -> bool {
        self.accept[state as usize]
    }

    pub fn add_transition(&mut self, src: StateId, dest: StateId, label: u32) {
        self.add_range(src, dest, label, label);
    }

    pub fn add_range(&mut self, src: StateId, dest: StateId, min: u32, max: u32) {
        debug_assert!(min <= max, "empty range {}..={}", min, max);
        self.transitions.push((src, Transition { min, max, dest }));
    }

    pub fn add_epsilon(&mut self, src: StateId, dest: StateId) {
        if src != dest {
            self.epsilons.push((src, dest));
        }
    }

    /// Copy every state and transition of `other`, returning the id its
    /// state 0 received.
    pub fn copy(&mut self, other: &Automaton) -> StateId {
        let offset = self.accept.len() as StateId;
        self.accept.extend_from_slice(&other.accept);
        for state in 0..other.num_states() as StateId {
            for t in other.transitions(state) {
                self.transitions.push((
                    state + offset,
                    Transition {
                        dest: t.dest + offset,
                        ..*t
                    },
                ));
            }
        }
        offset
    }

    pub fn finish(self) -> Automaton {
        let num_states = self.accept.len();
        let mut by_state: Vec<Vec<Transition>> = vec![Vec::new(); num_states];
        for (src, t) in self.transitions {
            by_state[src as usize].push(t);
        }
        let mut accept = self.accept;

        if !self.epsilons.is_empty() {
            let mut eps_out: Vec<Vec<StateId>> = vec![Vec::new(); num_states];
            for (src, dest) in self.epsilons {
                eps_out[src as usize].push(dest);
            }
            let original = by_state.clone();
            let original_accept = accept.clone();
            let mut seen = vec![usize::MAX; num_states];
            for state in 0..num_states {
                if eps_out[state].is_empty() {
                    continue;
                }
                // DFS over epsilon edges; `seen[s] == state` marks membership.
                let mut stack = vec![state];
                seen[state] = state;
                while let Some(s) = stack.pop() {
                    for &next in &eps_out[s] {
                        let next = next as usize;
                        if seen[next] != state {
                            seen[next] = state;
                            stack.push(next);
                            by_state[state].extend_from_slice(&original[next]);
                            accept[state] |= original_accept[next];
                        }
                    }
                }
            }
        }

        let mut offsets = Vec::with_capacity(num_states + 1);
        let mut transitions = Vec::new();
        offsets.push(0);
        for mut ts in by_state {
            ts.sort_unstable();
            ts.dedup();
            transitions.extend(ts);
            offsets.push(transitions.len() as u32);
        }

        Automaton {
            accept,
            offsets,
            transitions,
        }
    }
}
