// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Enumerate every string an acyclic automaton accepts.
//!
//! This is how one entry's token graph becomes its analyzed paths. A plain
//! phrase yields one path; each synonym branch multiplies the count, which is
//! why callers can cap the enumeration.

use std::collections::HashSet;

use super::{Automaton, StateId};

/// Accepted strings, in depth-first label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiniteStrings {
    pub strings: Vec<Vec<u32>>,
    /// More strings exist beyond the requested limit.
    pub truncated: bool,
}

struct Frame {
    state: StateId,
    transition: usize,
    label: u32,
}

impl Frame {
    fn at(a: &Automaton, state: StateId) -> Self {
        Self {
            state,
            transition: 0,
            label: a.transitions(state).first().map_or(0, |t| t.min),
        }
    }
}

/// Collect up to `limit` distinct accepted strings (`None` = all of them).
///
/// The automaton must be acyclic; check with [`super::is_finite`] first.
/// The walk is iterative, so long paths cannot overflow the call stack.
pub fn finite_strings(a: &Automaton, limit: Option<usize>) -> FiniteStrings {
    let mut out = FiniteStrings::default();
    if a.num_states() == 0 || limit == Some(0) {
        return out;
    }

    let mut seen: HashSet<Vec<u32>> = HashSet::new();
    let mut limit_hit = false;

    if a.is_accept(0) {
        seen.insert(Vec::new());
        out.strings.push(Vec::new());
        limit_hit = limit == Some(1);
    }

    let mut path: Vec<u32> = Vec::new();
    let mut stack = vec![Frame::at(a, 0)];

    while let Some(frame) = stack.last_mut() {
        let transitions = a.transitions(frame.state);
        let Some(t) = transitions.get(frame.transition).copied() else {
            stack.pop();
            path.pop();
            continue;
        };

        let label = frame.label;
        if label >= t.max {
            frame.transition += 1;
            frame.label = transitions.get(frame.transition).map_or(0, |next| next.min);
        } else {
            frame.label += 1;
        }

        path.push(label);
        if a.is_accept(t.dest) && !seen.contains(&path) {
            if limit_hit {
                out.truncated = true;
                return out;
            }
            seen.insert(path.clone());
            out.strings.push(path.clone());
            limit_hit = limit.is_some_and(|max| out.strings.len() >= max);
        }
        stack.push(Frame::at(a, t.dest));
    }

    out
}
