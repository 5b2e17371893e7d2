// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental minimal FST construction from sorted keys.
//!
//! The builder keeps the path of the last inserted key as a stack of
//! unfinished nodes. A new key shares some prefix with the last one; every
//! unfinished node below that prefix can no longer change, so it is frozen:
//! looked up in a registry of already-compiled nodes and reused if an
//! identical node exists, compiled otherwise. That registry is what makes
//! the result minimal.
//!
//! Outputs are pushed up while inserting. Along the shared prefix each arc
//! keeps only the part of its output common to the old and new key; the rest
//! is pushed down onto every arc (and final output) of the child.

use std::collections::HashMap;

use crate::error::{Result, SuggestError};

use super::{ArcRecord, Fst, NodeId, NodeRecord, Output, OutputSpan};

/// Target placeholder for the arc leading to the next unfinished node.
const PENDING: NodeId = NodeId::MAX;

#[derive(Debug, Clone)]
struct UnfinishedArc {
    label: u8,
    target: NodeId,
    output: Output,
}

#[derive(Debug, Clone, Default)]
struct UnfinishedNode {
    arcs: Vec<UnfinishedArc>,
    final_output: Option<Output>,
}

impl UnfinishedNode {
    fn prepend(&mut self, prefix: &Output) {
        for arc in &mut self.arcs {
            arc.output = prefix.append(arc.output.borrowed());
        }
        if let Some(last) = self.final_output.as_mut() {
            *last = prefix.append(last.borrowed());
        }
    }
}

/// Structural identity of a compiled node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NodeKey {
    final_output: Option<Output>,
    arcs: Vec<(u8, NodeId, Output)>,
}

/// Builds an [`Fst`] from keys inserted in strictly increasing order.
#[derive(Debug)]
pub struct FstBuilder {
    unfinished: Vec<UnfinishedNode>,
    registry: HashMap<NodeKey, NodeId>,
    nodes: Vec<NodeRecord>,
    arcs: Vec<ArcRecord>,
    bytes: Vec<u8>,
    last_key: Option<Vec<u8>>,
    len: u64,
}

impl Default for FstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FstBuilder {
    pub fn new() -> Self {
        Self {
            unfinished: vec![UnfinishedNode::default()],
            registry: HashMap::new(),
            nodes: Vec::new(),
            arcs: Vec::new(),
            bytes: Vec::new(),
            last_key: None,
            len: 0,
        }
    }

    /// Keys inserted so far.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add `key → output`. Fails unless `key` sorts strictly after the
    /// previous key.
    pub fn insert(&mut self, key: &[u8], output: Output) -> Result<()> {
        let prefix_len = match &self.last_key {
            Some(last) if key <= last.as_slice() => {
                return Err(SuggestError::invalid_input(format!(
                    "FST keys must be strictly increasing ({:?} after {:?})",
                    key, last
                )));
            }
            Some(last) => last.iter().zip(key).take_while(|(a, b)| a == b).count(),
            None => 0,
        };

        self.freeze_from(prefix_len);

        let mut output = output;
        for depth in 0..prefix_len {
            let (upper, lower) = self.unfinished.split_at_mut(depth + 1);
            let Some(arc) = upper[depth].arcs.last_mut() else {
                break;
            };
            let common = arc.output.common(&output);
            let rest = arc.output.subtract(&common);
            output = output.subtract(&common);
            arc.output = common;
            if !rest.is_empty() {
                lower[0].prepend(&rest);
            }
        }

        if key.len() == prefix_len {
            // Only the very first key can be empty.
            self.unfinished[prefix_len].final_output = Some(output);
        } else {
            self.unfinished[prefix_len].arcs.push(UnfinishedArc {
                label: key[prefix_len],
                target: PENDING,
                output,
            });
            for &label in &key[prefix_len + 1..] {
                self.unfinished.push(UnfinishedNode {
                    arcs: vec![UnfinishedArc {
                        label,
                        target: PENDING,
                        output: Output::default(),
                    }],
                    final_output: None,
                });
            }
            self.unfinished.push(UnfinishedNode {
                arcs: Vec::new(),
                final_output: Some(Output::default()),
            });
        }

        self.last_key = Some(key.to_vec());
        self.len += 1;
        Ok(())
    }

    /// Compile every unfinished node deeper than `depth`.
    fn freeze_from(&mut self, depth: usize) {
        while self.unfinished.len() > depth + 1 {
            let Some(node) = self.unfinished.pop() else {
                break;
            };
            let id = self.compile(node);
            if let Some(arc) = self
                .unfinished
                .last_mut()
                .and_then(|parent| parent.arcs.last_mut())
            {
                arc.target = id;
            }
        }
    }

    fn compile(&mut self, node: UnfinishedNode) -> NodeId {
        let key = NodeKey {
            final_output: node.final_output,
            arcs: node
                .arcs
                .into_iter()
                .map(|arc| {
                    debug_assert_ne!(arc.target, PENDING);
                    (arc.label, arc.target, arc.output)
                })
                .collect(),
        };
        if let Some(&id) = self.registry.get(&key) {
            return id;
        }

        let first_arc = self.arcs.len() as u32;
        for (label, target, output) in &key.arcs {
            let output = self.intern_output(output);
            self.arcs.push(ArcRecord {
                label: *label,
                target: *target,
                output,
            });
        }
        let final_output = key.final_output.as_ref().map(|out| self.intern_output(out));
        let id = self.nodes.len() as NodeId;
        self.nodes.push(NodeRecord {
            first_arc,
            num_arcs: key.arcs.len() as u32,
            final_output,
        });
        self.registry.insert(key, id);
        id
    }

    fn intern_output(&mut self, output: &Output) -> OutputSpan {
        let start = self.bytes.len() as u32;
        self.bytes.extend_from_slice(&output.bytes);
        OutputSpan {
            cost: output.cost,
            start,
            len: output.bytes.len() as u32,
        }
    }

    pub fn finish(mut self) -> Fst {
        self.freeze_from(0);
        let root = self.unfinished.pop().unwrap_or_default();
        let root = self.compile(root);
        Fst {
            nodes: self.nodes,
            arcs: self.arcs,
            bytes: self.bytes,
            root,
            len: self.len,
        }
    }
}
