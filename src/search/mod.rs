// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search over the weighted FST: where the rubber meets the road.
//!
//! Two steps. First, [`intersect_prefix_paths`] walks the query automaton and
//! the FST together and collects every FST node the typed text can reach
//! (the frontier). Then [`TopNSearcher`] runs a best-first search from that
//! frontier and yields completions in ascending cost, which is descending
//! weight.

mod intersect;
mod top_n;

pub use intersect::*;
pub use top_n::*;

use crate::automaton::StateId;
use crate::fst::{NodeId, Output};

/// A partial walk that the query automaton and the FST agree on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPath {
    /// Automaton state reached.
    pub state: StateId,
    /// FST node reached.
    pub node: NodeId,
    /// Output accumulated along the FST arcs.
    pub output: Output,
    /// FST labels consumed.
    pub input: Vec<u8>,
}
