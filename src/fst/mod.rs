// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Weighted finite state transducer over byte keys.
//!
//! Each key maps to an [`Output`]: a cost plus a byte string. Outputs are
//! spread over the arcs of the key's path and summed on the way down (costs
//! add, bytes concatenate). The builder pushes every output as close to the
//! root as it can, so the cost accumulated on any partial path is exactly
//! the cheapest cost of every key below it. The best-first search relies on
//! that.
//!
//! # Storage
//!
//! ```text
//! nodes: [NodeRecord]  first_arc, num_arcs, final output span
//! arcs:  [ArcRecord]   label, target, cost, byte span    (sorted by label per node)
//! bytes: [u8]          shared pool for every output's bytes
//! ```
//!
//! Children are always compiled before their parents, so every arc target is
//! a smaller node id than its source. The graph is acyclic by construction
//! and the codec can check it cheaply.

mod builder;
mod codec;

pub use builder::*;
pub use codec::*;

/// Index of a node inside one FST.
pub type NodeId = u32;

/// An owned output value: cost plus bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Output {
    pub cost: u64,
    pub bytes: Vec<u8>,
}

impl Output {
    pub fn new(cost: u64, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            cost,
            bytes: bytes.into(),
        }
    }

    /// The identity: zero cost, no bytes.
    pub fn is_empty(&self) -> bool {
        self.cost == 0 && self.bytes.is_empty()
    }

    /// Largest output both start with: the smaller cost and the shared byte prefix.
    pub fn common(&self, other: &Output) -> Output {
        let shared = self
            .bytes
            .iter()
            .zip(&other.bytes)
            .take_while(|(a, b)| a == b)
            .count();
        Output {
            cost: self.cost.min(other.cost),
            bytes: self.bytes[..shared].to_vec(),
        }
    }

    /// Remove `prefix`, which must be a [`common`](Self::common) of `self`.
    pub fn subtract(&self, prefix: &Output) -> Output {
        debug_assert!(self.bytes.starts_with(&prefix.bytes));
        debug_assert!(prefix.cost <= self.cost);
        Output {
            cost: self.cost.saturating_sub(prefix.cost),
            bytes: self.bytes.get(prefix.bytes.len()..).unwrap_or_default().to_vec(),
        }
    }

    /// `self` followed by `suffix`.
    pub fn append(&self, suffix: OutputRef<'_>) -> Output {
        let mut bytes = Vec::with_capacity(self.bytes.len() + suffix.bytes.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(suffix.bytes);
        Output {
            cost: self.cost.saturating_add(suffix.cost),
            bytes,
        }
    }

    pub fn borrowed(&self) -> OutputRef<'_> {
        OutputRef {
            cost: self.cost,
            bytes: &self.bytes,
        }
    }
}

/// An output stored inside an [`Fst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRef<'a> {
    pub cost: u64,
    pub bytes: &'a [u8],
}

impl OutputRef<'_> {
    pub fn to_output(self) -> Output {
        Output::new(self.cost, self.bytes)
    }
}

/// One outgoing arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FstArc<'a> {
    pub label: u8,
    pub target: NodeId,
    pub output: OutputRef<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputSpan {
    cost: u64,
    start: u32,
    len: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeRecord {
    first_arc: u32,
    num_arcs: u32,
    final_output: Option<OutputSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArcRecord {
    label: u8,
    target: NodeId,
    output: OutputSpan,
}

/// An immutable, minimal weighted FST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fst {
    nodes: Vec<NodeRecord>,
    arcs: Vec<ArcRecord>,
    bytes: Vec<u8>,
    root: NodeId,
    len: u64,
}

impl Fst {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Approximate heap footprint.
    pub fn ram_bytes_used(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.nodes.len() * std::mem::size_of::<NodeRecord>()
            + self.arcs.len() * std::mem::size_of::<ArcRecord>()
            + self.bytes.len()
    }

    fn span(&self, span: OutputSpan) -> OutputRef<'_> {
        let start = span.start as usize;
        OutputRef {
            cost: span.cost,
            bytes: &self.bytes[start..start + span.len as usize],
        }
    }

    pub fn is_final(&self, node: NodeId) -> bool {
        self.nodes[node as usize].final_output.is_some()
    }

    /// Output emitted when a key ends at `node`.
    pub fn final_output(&self, node: NodeId) -> Option<OutputRef<'_>> {
        self.nodes[node as usize]
            .final_output
            .map(|span| self.span(span))
    }

    pub fn arc_count(&self, node: NodeId) -> usize {
        self.nodes[node as usize].num_arcs as usize
    }

    /// The `index`-th arc of `node`, in label order.
    pub fn arc(&self, node: NodeId, index: usize) -> FstArc<'_> {
        let record = self.arcs[self.nodes[node as usize].first_arc as usize + index];
        FstArc {
            label: record.label,
            target: record.target,
            output: self.span(record.output),
        }
    }

    pub fn arcs(&self, node: NodeId) -> impl Iterator<Item = FstArc<'_>> + '_ {
        (0..self.arc_count(node)).map(move |i| self.arc(node, i))
    }

    fn arc_records(&self, node: NodeId) -> &[ArcRecord] {
        let record = self.nodes[node as usize];
        let start = record.first_arc as usize;
        &self.arcs[start..start + record.num_arcs as usize]
    }

    /// Index of the first arc of `node` whose label is at least `label`.
    /// Equals [`arc_count`](Self::arc_count) when there is none.
    pub fn ceil_arc(&self, node: NodeId, label: u8) -> usize {
        self.arc_records(node).partition_point(|arc| arc.label < label)
    }

    /// The arc of `node` labeled exactly `label`.
    pub fn find_arc(&self, node: NodeId, label: u8) -> Option<FstArc<'_>> {
        let index = self
            .arc_records(node)
            .binary_search_by_key(&label, |arc| arc.label)
            .ok()?;
        Some(self.arc(node, index))
    }

    /// Output of `key`, if it is in the FST.
    pub fn get(&self, key: &[u8]) -> Option<Output> {
        let mut node = self.root;
        let mut output = Output::default();
        for &label in key {
            let arc = self.find_arc(node, label)?;
            output = output.append(arc.output);
            node = arc.target;
        }
        self.final_output(node).map(|last| output.append(last))
    }

    /// Every `(key, output)` pair in key order.
    pub fn entries(&self) -> Vec<(Vec<u8>, Output)> {
        let mut out = Vec::with_capacity(self.len());
        if let Some(last) = self.final_output(self.root) {
            out.push((Vec::new(), last.to_output()));
        }

        let mut path: Vec<u8> = Vec::new();
        let mut stack: Vec<(NodeId, usize, Output)> = vec![(self.root, 0, Output::default())];
        while let Some(top) = stack.last_mut() {
            let (node, index) = (top.0, top.1);
            if index >= self.arc_count(node) {
                stack.pop();
                path.pop();
                continue;
            }
            top.1 += 1;
            let arc = self.arc(node, index);
            let output = top.2.append(arc.output);
            path.push(arc.label);
            if let Some(last) = self.final_output(arc.target) {
                out.push((path.clone(), output.append(last)));
            }
            stack.push((arc.target, 0, output));
        }
        out
    }
}
