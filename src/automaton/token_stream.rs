// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token stream → automaton.
//!
//! Every position in the token stream gets up to two states: `arriving`
//! (where tokens ending here land) and `leaving` (where tokens starting here
//! depart). A [`SEP_LABEL`] transition joins them. A token spelled `t1..tn`
//! becomes a chain of label transitions from its start position's `leaving`
//! state to its end position's `arriving` state, so a token with position
//! length 2 skips a position and forms a parallel branch.
//!
//! Positions nobody arrives at (stop words, other removed tokens) are bridged
//! with [`HOLE_LABEL`] transitions. Trailing gaps after the last token become
//! a tail of holes before the final state.
//!
//! ```text
//! "new york" + synonym nyc(len 2):
//!
//!   (0) ─n─e─w─▶ (1a) ─SEP─▶ (1l) ─y─o─r─k─▶ (2a) ✓
//!    └───────────────n─y─c──────────────────▶ (2a)
//! ```

use crate::analysis::TokenStream;

use super::{Automaton, AutomatonBuilder, StateId, HOLE_LABEL, SEP_LABEL};

#[derive(Debug, Clone, Copy, Default)]
struct Position {
    arriving: Option<StateId>,
    leaving: Option<StateId>,
}

fn ensure(positions: &mut Vec<Position>, pos: usize) {
    if positions.len() <= pos {
        positions.resize(pos + 1, Position::default());
    }
}

/// Converts token streams into label automata.
#[derive(Debug, Clone, Copy)]
pub struct TokenStreamToAutomaton {
    preserve_position_increments: bool,
    unicode_arcs: bool,
}

impl Default for TokenStreamToAutomaton {
    fn default() -> Self {
        Self {
            preserve_position_increments: true,
            unicode_arcs: false,
        }
    }
}

impl TokenStreamToAutomaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// When false, gaps are ignored: every increment above one becomes one.
    pub fn with_preserve_position_increments(mut self, preserve: bool) -> Self {
        self.preserve_position_increments = preserve;
        self
    }

    /// Label transitions with code points instead of UTF-8 bytes.
    pub fn with_unicode_arcs(mut self, unicode_arcs: bool) -> Self {
        self.unicode_arcs = unicode_arcs;
        self
    }

    fn term_labels(&self, term: &[u8]) -> Vec<u32> {
        if self.unicode_arcs {
            String::from_utf8_lossy(term).chars().map(u32::from).collect()
        } else {
            term.iter().map(|&b| u32::from(b)).collect()
        }
    }

    pub fn to_automaton(&self, stream: &TokenStream) -> Automaton {
        let mut b = AutomatonBuilder::new();
        b.create_state();

        let mut positions: Vec<Position> = Vec::new();
        let mut pos: Option<usize> = None;

        for token in &stream.tokens {
            let mut increment = token.position_increment as usize;
            if !self.preserve_position_increments && increment > 1 {
                increment = 1;
            }
            if pos.is_none() && increment == 0 {
                // Nothing to stack on yet.
                increment = 1;
            }

            if increment > 0 {
                let p = pos.map_or(increment - 1, |prev| prev + increment);
                pos = Some(p);
                ensure(&mut positions, p);
                debug_assert!(positions[p].leaving.is_none());

                match positions[p].arriving {
                    None if p == 0 => positions[p].leaving = Some(0),
                    None => {
                        positions[p].leaving = Some(b.create_state());
                        add_holes(&mut b, &mut positions, p);
                    }
                    Some(arriving) => {
                        let leaving = b.create_state();
                        positions[p].leaving = Some(leaving);
                        b.add_transition(arriving, leaving, SEP_LABEL);
                        if increment > 1 {
                            // A token spanned the gap; holes go underneath it.
                            add_holes(&mut b, &mut positions, p);
                        }
                    }
                }
            }

            let Some(p) = pos else { continue };
            let Some(mut state) = positions[p].leaving else {
                continue;
            };
            let end_pos = p + token.position_length.max(1) as usize;
            ensure(&mut positions, end_pos);
            let end_state = match positions[end_pos].arriving {
                Some(state) => state,
                None => {
                    let state = b.create_state();
                    positions[end_pos].arriving = Some(state);
                    state
                }
            };

            let labels = self.term_labels(&token.term);
            if labels.is_empty() {
                b.add_epsilon(state, end_state);
                continue;
            }
            for (i, &label) in labels.iter().enumerate() {
                let next = if i + 1 == labels.len() {
                    end_state
                } else {
                    b.create_state()
                };
                b.add_transition(state, next, label);
                state = next;
            }
        }

        let mut end_increment = stream.final_position_increment;
        if !self.preserve_position_increments {
            end_increment = 0;
        }
        let tail = if end_increment > 0 {
            let start = b.create_state();
            let mut last = start;
            loop {
                let hole = b.create_state();
                b.add_transition(last, hole, HOLE_LABEL);
                end_increment -= 1;
                if end_increment == 0 {
                    b.set_accept(hole, true);
                    break;
                }
                let sep = b.create_state();
                b.add_transition(hole, sep, SEP_LABEL);
                last = sep;
            }
            Some(start)
        } else {
            None
        };

        let first_after = pos.map_or(0, |p| p + 1);
        for position in positions.iter().skip(first_after) {
            if let Some(arriving) = position.arriving {
                match tail {
                    Some(tail) => b.add_transition(arriving, tail, SEP_LABEL),
                    None => b.set_accept(arriving, true),
                }
            }
        }

        b.finish()
    }
}

/// Bridge missing positions below `pos` with hole transitions, walking back
/// until it meets a position that is already connected.
fn add_holes(b: &mut AutomatonBuilder, positions: &mut [Position], mut pos: usize) {
    while pos > 0 {
        let prev = pos - 1;
        if positions[pos].arriving.is_some() && positions[prev].leaving.is_some() {
            break;
        }

        let arriving = match positions[pos].arriving {
            Some(state) => state,
            None => {
                let state = b.create_state();
                positions[pos].arriving = Some(state);
                if let Some(leaving) = positions[pos].leaving {
                    b.add_transition(state, leaving, SEP_LABEL);
                }
                state
            }
        };

        let leaving = match positions[prev].leaving {
            Some(state) => state,
            None => {
                let state = if pos == 1 { 0 } else { b.create_state() };
                positions[prev].leaving = Some(state);
                if let Some(prev_arriving) = positions[prev].arriving {
                    b.add_transition(prev_arriving, state, SEP_LABEL);
                }
                state
            }
        };

        b.add_transition(leaving, arriving, HOLE_LABEL);
        pos -= 1;
    }
}
