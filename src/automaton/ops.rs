// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Automaton operations: construction helpers, union, concatenation,
//! powerset determinization, topological sort and separator rewriting.

use std::collections::{HashMap, VecDeque};

use crate::error::{Result, SuggestError};

use super::{
    Automaton, AutomatonBuilder, StateId, Transition, DEFAULT_MAX_DETERMINIZED_STATES, HOLE_LABEL,
    SEP_LABEL,
};

/// An automaton that accepts nothing.
pub fn make_empty() -> Automaton {
    let mut b = AutomatonBuilder::new();
    b.create_state();
    b.finish()
}

/// An automaton accepting exactly `labels`.
pub fn make_string(labels: &[u32]) -> Automaton {
    let mut b = AutomatonBuilder::new();
    let mut state = b.create_state();
    for &label in labels {
        let next = b.create_state();
        b.add_transition(state, next, label);
        state = next;
    }
    b.set_accept(state, true);
    b.finish()
}

/// Language union. The result is generally nondeterministic.
pub fn union(automata: &[Automaton]) -> Automaton {
    let mut b = AutomatonBuilder::new();
    let initial = b.create_state();
    for a in automata {
        if a.num_states() == 0 {
            continue;
        }
        let start = b.copy(a);
        b.add_epsilon(initial, start);
    }
    b.finish()
}

/// Language concatenation: every accepted `x` of `first` followed by every
/// accepted `y` of `second`.
pub fn concatenate(first: &Automaton, second: &Automaton) -> Automaton {
    let mut b = AutomatonBuilder::new();
    if first.num_states() == 0 {
        b.create_state();
        return b.finish();
    }
    b.copy(first);
    let has_second = second.num_states() > 0;
    let second_start = if has_second { b.copy(second) } else { 0 };
    for state in 0..first.num_states() as StateId {
        if first.is_accept(state) {
            b.set_accept(state, false);
            if has_second {
                b.add_epsilon(state, second_start);
            }
        }
    }
    b.finish()
}

/// Powerset construction.
///
/// Each DFA state is a sorted set of NFA states. For a given set, the label
/// space is cut at every transition boundary; within one slice every label
/// reaches the same NFA states, so each slice becomes a single range
/// transition. Adjacent slices with the same target are merged back.
///
/// Fails with [`SuggestError::TooComplex`] once more than `max_states` DFA
/// states would be created.
pub fn determinize(a: &Automaton, max_states: usize) -> Result<Automaton> {
    if a.num_states() == 0 {
        return Ok(a.clone());
    }

    let mut b = AutomatonBuilder::new();
    let mut sets: Vec<Vec<StateId>> = Vec::new();
    let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut worklist: VecDeque<StateId> = VecDeque::new();

    let initial = b.create_state();
    b.set_accept(initial, a.is_accept(0));
    sets.push(vec![0]);
    ids.insert(vec![0], initial);
    worklist.push_back(initial);

    let mut points: Vec<u32> = Vec::new();
    let mut live: Vec<Transition> = Vec::new();

    while let Some(id) = worklist.pop_front() {
        points.clear();
        live.clear();
        for &nfa_state in &sets[id as usize] {
            for t in a.transitions(nfa_state) {
                live.push(*t);
                points.push(t.min);
                if t.max < u32::MAX {
                    points.push(t.max + 1);
                }
            }
        }
        points.sort_unstable();
        points.dedup();

        let mut pending: Option<(u32, u32, StateId)> = None;
        for (i, &point) in points.iter().enumerate() {
            let end = points.get(i + 1).map_or(u32::MAX, |next| next - 1);
            let mut dests: Vec<StateId> = live
                .iter()
                .filter(|t| t.covers(point))
                .map(|t| t.dest)
                .collect();
            if dests.is_empty() {
                if let Some((min, max, dest)) = pending.take() {
                    b.add_range(id, dest, min, max);
                }
                continue;
            }
            dests.sort_unstable();
            dests.dedup();

            let target = match ids.get(&dests) {
                Some(&target) => target,
                None => {
                    if sets.len() >= max_states {
                        return Err(SuggestError::TooComplex { limit: max_states });
                    }
                    let target = b.create_state();
                    b.set_accept(target, dests.iter().any(|&s| a.is_accept(s)));
                    ids.insert(dests.clone(), target);
                    sets.push(dests);
                    worklist.push_back(target);
                    target
                }
            };

            pending = match pending {
                Some((min, max, dest)) if dest == target && max.checked_add(1) == Some(point) => {
                    Some((min, end, dest))
                }
                Some((min, max, dest)) => {
                    b.add_range(id, dest, min, max);
                    Some((point, end, target))
                }
                None => Some((point, end, target)),
            };
        }
        if let Some((min, max, dest)) = pending {
            b.add_range(id, dest, min, max);
        }
    }

    Ok(b.finish())
}

/// DFA states allowed per input state on top of the default budget.
const STATES_PER_INPUT_STATE: usize = 4;

/// State budget for determinizing `a`: the default, or more for large inputs.
pub fn state_budget(a: &Automaton) -> usize {
    DEFAULT_MAX_DETERMINIZED_STATES.max(a.num_states().saturating_mul(STATES_PER_INPUT_STATE))
}

/// [`determinize`] under [`state_budget`]. Deterministic input is returned
/// as is, so string automata of any length never fail.
pub fn determinize_scaled(a: Automaton) -> Result<Automaton> {
    if a.is_deterministic() {
        return Ok(a);
    }
    determinize(&a, state_budget(&a))
}

/// States reachable from the initial state in topological order, or `None`
/// when a cycle is reachable.
pub fn topo_sort(a: &Automaton) -> Option<Vec<StateId>> {
    const WHITE: u8 = 0;
    const GREY: u8 = 1;
    const BLACK: u8 = 2;

    if a.num_states() == 0 {
        return Some(Vec::new());
    }

    let mut color = vec![WHITE; a.num_states()];
    let mut postorder = Vec::with_capacity(a.num_states());
    // (state, index of next transition to explore)
    let mut stack: Vec<(StateId, usize)> = vec![(0, 0)];
    color[0] = GREY;

    while let Some(top) = stack.last_mut() {
        let (state, next) = *top;
        top.1 += 1;
        if let Some(t) = a.transitions(state).get(next) {
            match color[t.dest as usize] {
                WHITE => {
                    color[t.dest as usize] = GREY;
                    stack.push((t.dest, 0));
                }
                GREY => return None,
                _ => {}
            }
        } else {
            color[state as usize] = BLACK;
            postorder.push(state);
            stack.pop();
        }
    }

    postorder.reverse();
    Some(postorder)
}

/// Whether the accepted language is finite (no reachable cycle).
pub fn is_finite(a: &Automaton) -> bool {
    topo_sort(a).is_some()
}

/// Rewrite the token-graph markers into what the FST expects.
///
/// Separators are kept as [`SEP_LABEL`] when `preserve_sep`, otherwise they
/// collapse into epsilon edges so "new york" and "newyork" analyze alike.
/// Holes always collapse: the surrounding separators then stand in for the
/// gap.
pub fn replace_sep(a: &Automaton, preserve_sep: bool) -> Automaton {
    let mut b = AutomatonBuilder::new();
    for state in 0..a.num_states() as StateId {
        let s = b.create_state();
        b.set_accept(s, a.is_accept(state));
    }
    for state in 0..a.num_states() as StateId {
        for t in a.transitions(state) {
            if t.min == SEP_LABEL && t.max == SEP_LABEL {
                if preserve_sep {
                    b.add_transition(state, t.dest, SEP_LABEL);
                } else {
                    b.add_epsilon(state, t.dest);
                }
            } else if t.min == HOLE_LABEL && t.max == HOLE_LABEL {
                b.add_epsilon(state, t.dest);
            } else {
                b.add_range(state, t.dest, t.min, t.max);
            }
        }
    }
    b.finish()
}
