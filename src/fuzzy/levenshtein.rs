// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Levenshtein automata: a DFA accepting every string within `k` edits of a
//! word, optionally preceded by an exact prefix.
//!
//! Built by subset construction over the classic NFA. An NFA position is
//! `(index, edits)`: `index` labels of the word consumed, `edits` spent. On
//! input `c` a position can
//!
//! - match: `(i, e) → (i + 1, e)` when `word[i] == c`
//! - substitute: `(i, e) → (i + 1, e + 1)`
//! - insert: `(i, e) → (i, e + 1)`
//! - delete: `(i, e) → (i + 1, e + 1)` without input (epsilon, folded into
//!   every state by the closure)
//! - transpose: `(i, e) → T(i, e + 1)` when `word[i + 1] == c`, and
//!   `T(i, e) → (i + 2, e)` when the next input is `word[i]`
//!
//! A DFA state is a normalized set of positions. Positions at the same index
//! with more edits are dominated and dropped, which keeps the state count
//! linear in the word length for the `k ≤ 2` we support.
//!
//! Labels the current state does not care about all behave identically, so
//! each DFA state gets one transition per relevant label plus range
//! transitions over the gaps for "anything else".

use std::collections::HashMap;

use crate::automaton::{make_string, Automaton, AutomatonBuilder, StateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct NfaPos {
    index: u32,
    transposing: bool,
    edits: u8,
}

impl NfaPos {
    fn at(index: usize, edits: u8) -> Self {
        Self {
            index: index as u32,
            transposing: false,
            edits,
        }
    }
}

type PositionSet = Vec<NfaPos>;

/// Builds edit-distance automata for one word.
#[derive(Debug, Clone)]
pub struct LevenshteinAutomata {
    word: Vec<u32>,
    alpha_max: u32,
    transpositions: bool,
}

impl LevenshteinAutomata {
    /// `alpha_max` is the highest label of the alphabet: `0xFF` for bytes,
    /// `char::MAX` for code points.
    pub fn new(word: &[u32], alpha_max: u32, transpositions: bool) -> Self {
        Self {
            word: word.to_vec(),
            alpha_max,
            transpositions,
        }
    }

    pub fn word(&self) -> &[u32] {
        &self.word
    }

    /// DFA accepting `prefix` followed by any string within `max_edits`
    /// edits of the word.
    pub fn to_automaton(&self, max_edits: u32, prefix: &[u32]) -> Automaton {
        if max_edits == 0 {
            let mut exact = prefix.to_vec();
            exact.extend_from_slice(&self.word);
            return make_string(&exact);
        }
        let max_edits = max_edits.min(u32::from(u8::MAX)) as u8;

        let mut b = AutomatonBuilder::new();
        let mut state = b.create_state();
        for &label in prefix {
            let next = b.create_state();
            b.add_transition(state, next, label);
            state = next;
        }

        let mut ids: HashMap<PositionSet, StateId> = HashMap::new();
        let mut pending: Vec<PositionSet> = Vec::new();

        let initial = self.normalize(vec![NfaPos::at(0, 0)], max_edits);
        b.set_accept(state, self.is_accepting(&initial));
        ids.insert(initial.clone(), state);
        pending.push(initial);

        let mut relevant: Vec<u32> = Vec::new();
        while let Some(set) = pending.pop() {
            let src = ids[&set];

            relevant.clear();
            for pos in &set {
                let i = pos.index as usize;
                relevant.extend(self.word.get(i).copied());
                if !pos.transposing && self.transpositions {
                    relevant.extend(self.word.get(i + 1).copied());
                }
            }
            relevant.retain(|&label| label <= self.alpha_max);
            relevant.sort_unstable();
            relevant.dedup();

            for &label in &relevant {
                let next = self.step(&set, Some(label), max_edits);
                if !next.is_empty() {
                    let dest = self.intern(&mut b, &mut ids, &mut pending, next);
                    b.add_transition(src, dest, label);
                }
            }

            let other = self.step(&set, None, max_edits);
            if other.is_empty() {
                continue;
            }
            let dest = self.intern(&mut b, &mut ids, &mut pending, other);
            let mut lo = 0u32;
            for &label in &relevant {
                if label > lo {
                    b.add_range(src, dest, lo, label - 1);
                }
                lo = label + 1;
            }
            if lo <= self.alpha_max {
                b.add_range(src, dest, lo, self.alpha_max);
            }
        }

        b.finish()
    }

    fn intern(
        &self,
        b: &mut AutomatonBuilder,
        ids: &mut HashMap<PositionSet, StateId>,
        pending: &mut Vec<PositionSet>,
        set: PositionSet,
    ) -> StateId {
        if let Some(&id) = ids.get(&set) {
            return id;
        }
        let id = b.create_state();
        b.set_accept(id, self.is_accepting(&set));
        ids.insert(set.clone(), id);
        pending.push(set);
        id
    }

    fn is_accepting(&self, set: &[NfaPos]) -> bool {
        set.iter()
            .any(|pos| !pos.transposing && pos.index as usize == self.word.len())
    }

    /// Positions reachable from `set` on `label` (`None` = a label matching
    /// no word character).
    fn step(&self, set: &[NfaPos], label: Option<u32>, max_edits: u8) -> PositionSet {
        let len = self.word.len();
        let mut next = Vec::new();
        for pos in set {
            let i = pos.index as usize;
            let e = pos.edits;
            if pos.transposing {
                if label.is_some() && label == self.word.get(i).copied() {
                    next.push(NfaPos::at(i + 2, e));
                }
                continue;
            }
            if i < len && label == Some(self.word[i]) {
                next.push(NfaPos::at(i + 1, e));
            }
            if e < max_edits {
                next.push(NfaPos::at(i, e + 1));
                if i < len {
                    next.push(NfaPos::at(i + 1, e + 1));
                }
                if self.transpositions && i + 1 < len && label == Some(self.word[i + 1]) {
                    next.push(NfaPos {
                        index: i as u32,
                        transposing: true,
                        edits: e + 1,
                    });
                }
            }
        }
        self.normalize(next, max_edits)
    }

    /// Epsilon closure over deletions, then drop dominated positions.
    fn normalize(&self, mut positions: PositionSet, max_edits: u8) -> PositionSet {
        let len = self.word.len();
        let mut i = 0;
        while i < positions.len() {
            let pos = positions[i];
            if !pos.transposing && pos.edits < max_edits && (pos.index as usize) < len {
                positions.push(NfaPos::at(pos.index as usize + 1, pos.edits + 1));
            }
            i += 1;
        }
        positions.sort_unstable();
        // Sorted by (index, transposing, edits): the first of each group has the fewest edits.
        positions.dedup_by(|later, first| {
            later.index == first.index && later.transposing == first.transposing
        });
        positions
    }
}
