// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Automaton × FST prefix intersection.
//!
//! Depth-first over `(automaton state, FST node)` pairs. A transition on a
//! single label is one `find_arc`. A range transition walks the FST arcs
//! from the ceiling of its lower bound until the label passes the upper
//! bound, so the cost follows the FST's branching factor, not the width of
//! the range (a fuzzy "anything else" range spans all 256 bytes).
//!
//! As soon as a pair reaches an accepting automaton state it is emitted and
//! not expanded. Callers only need to know the typed text is a valid prefix
//! there; the top-N search explores everything below it anyway.

use crate::automaton::{Automaton, StateId, MAX_BYTE_LABEL};
use crate::fst::{Fst, NodeId, Output, OutputRef};

use super::PrefixPath;

/// Every frontier reachable by a path the automaton accepts.
///
/// The automaton must be deterministic and byte-labeled; this is not
/// re-checked.
pub fn intersect_prefix_paths(a: &Automaton, fst: &Fst) -> Vec<PrefixPath> {
    let mut frontier = Vec::new();
    if a.num_states() == 0 {
        return frontier;
    }
    debug_assert!(a.is_deterministic());

    let mut stack = vec![PrefixPath {
        state: 0,
        node: fst.root(),
        output: Output::default(),
        input: Vec::new(),
    }];

    while let Some(path) = stack.pop() {
        if a.is_accept(path.state) {
            frontier.push(path);
            continue;
        }

        for t in a.transitions(path.state) {
            if t.min > MAX_BYTE_LABEL {
                continue;
            }
            let min = t.min as u8;
            let max = t.max.min(MAX_BYTE_LABEL) as u8;

            if min == max {
                if let Some(arc) = fst.find_arc(path.node, min) {
                    stack.push(path.advance(t.dest, arc.label, arc.target, arc.output));
                }
                continue;
            }

            for index in fst.ceil_arc(path.node, min)..fst.arc_count(path.node) {
                let arc = fst.arc(path.node, index);
                if arc.label > max {
                    break;
                }
                stack.push(path.advance(t.dest, arc.label, arc.target, arc.output));
            }
        }
    }

    frontier
}

impl PrefixPath {
    fn advance(&self, state: StateId, label: u8, node: NodeId, output: OutputRef<'_>) -> PrefixPath {
        let mut input = Vec::with_capacity(self.input.len() + 1);
        input.extend_from_slice(&self.input);
        input.push(label);
        PrefixPath {
            state,
            node,
            output: self.output.append(output),
            input,
        }
    }
}
