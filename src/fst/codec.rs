// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Self-describing binary encoding of an [`Fst`].
//!
//! ```text
//! FstHeader (36 bytes)   magic, version, node/arc/key counts, root, body length
//! body                   per node, in id order:
//!                          flags u8 (bit 0 = final)
//!                          [final output]            if final
//!                          varint arc count
//!                          per arc: label u8, varint (node id - target), output
//!                        output = varint cost, varint byte length, bytes
//! FstFooter (8 bytes)    CRC32 over header + body, footer magic
//! ```
//!
//! Targets are stored as backward deltas. A delta of zero, or one reaching
//! past node 0, cannot come from the builder and fails the load, which also
//! rules out cycles in anything that decodes.

use std::io::{Read, Write};

use crate::binary::{
    decode_bytes, decode_varint, encode_bytes, encode_varint, FstFooter, FstHeader, VERSION,
};
use crate::error::{Result, SuggestError};

use super::{ArcRecord, Fst, NodeId, NodeRecord, OutputSpan};

const FLAG_FINAL: u8 = 0b0000_0001;

/// Costs are weights inverted against `i32::MAX`, so nothing above it is valid.
const MAX_COST: u64 = i32::MAX as u64;

impl Fst {
    fn encode_output(&self, span: OutputSpan, buf: &mut Vec<u8>) {
        encode_varint(span.cost, buf);
        let start = span.start as usize;
        encode_bytes(&self.bytes[start..start + span.len as usize], buf);
    }

    /// Write the FST, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<u64> {
        let mut body = Vec::with_capacity(self.arcs.len() * 4 + self.nodes.len() * 2);
        for (id, node) in self.nodes.iter().enumerate() {
            match node.final_output {
                Some(span) => {
                    body.push(FLAG_FINAL);
                    self.encode_output(span, &mut body);
                }
                None => body.push(0),
            }
            encode_varint(u64::from(node.num_arcs), &mut body);
            let start = node.first_arc as usize;
            for arc in &self.arcs[start..start + node.num_arcs as usize] {
                body.push(arc.label);
                encode_varint(id as u64 - u64::from(arc.target), &mut body);
                self.encode_output(arc.output, &mut body);
            }
        }

        let header = FstHeader {
            version: VERSION,
            node_count: self.nodes.len() as u32,
            arc_count: self.arcs.len() as u32,
            key_count: self.len,
            root: self.root,
            body_len: body.len() as u64,
        };
        let mut head = Vec::with_capacity(FstHeader::SIZE);
        header.write(&mut head)?;
        let footer = FstFooter {
            crc32: FstFooter::compute_crc32(&head, &body),
        };

        w.write_all(&head)?;
        w.write_all(&body)?;
        footer.write(w)?;
        Ok((head.len() + body.len() + FstFooter::SIZE) as u64)
    }

    /// Read an FST written by [`write_to`](Self::write_to), validating the
    /// checksum and every structural bound.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Fst> {
        let mut head = [0u8; FstHeader::SIZE];
        r.read_exact(&mut head).map_err(SuggestError::from_read)?;
        let header = FstHeader::read(&mut &head[..]).map_err(SuggestError::from_read)?;

        // Every node takes at least two body bytes and every arc at least four;
        // bounding the counts by the body keeps allocations honest.
        if u64::from(header.node_count) * 2 > header.body_len
            || u64::from(header.arc_count) * 4 > header.body_len
        {
            return Err(SuggestError::corrupt("node or arc count exceeds FST body"));
        }

        let mut body = Vec::new();
        r.by_ref()
            .take(header.body_len)
            .read_to_end(&mut body)
            .map_err(SuggestError::from_read)?;
        if body.len() as u64 != header.body_len {
            return Err(SuggestError::corrupt(format!(
                "truncated FST body ({} of {} bytes)",
                body.len(),
                header.body_len
            )));
        }

        let footer = FstFooter::read(r).map_err(SuggestError::from_read)?;
        if footer.crc32 != FstFooter::compute_crc32(&head, &body) {
            return Err(SuggestError::corrupt("FST checksum mismatch"));
        }

        decode_body(&header, &body)
    }
}

struct BodyReader<'a> {
    body: &'a [u8],
    pos: usize,
    pool: Vec<u8>,
}

impl BodyReader<'_> {
    fn byte(&mut self) -> Result<u8> {
        let byte = *self
            .body
            .get(self.pos)
            .ok_or_else(|| SuggestError::corrupt("unexpected end of FST body"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn varint(&mut self) -> Result<u64> {
        let (value, used) = decode_varint(&self.body[self.pos..]).map_err(SuggestError::from_read)?;
        self.pos += used;
        Ok(value)
    }

    fn output(&mut self) -> Result<OutputSpan> {
        let cost = self.varint()?;
        if cost > MAX_COST {
            return Err(SuggestError::corrupt(format!(
                "output cost {} exceeds {}",
                cost, MAX_COST
            )));
        }
        let (bytes, used) = decode_bytes(&self.body[self.pos..]).map_err(SuggestError::from_read)?;
        self.pos += used;
        let start = self.pool.len() as u32;
        self.pool.extend_from_slice(bytes);
        Ok(OutputSpan {
            cost,
            start,
            len: bytes.len() as u32,
        })
    }
}

fn decode_body(header: &FstHeader, body: &[u8]) -> Result<Fst> {
    let node_count = header.node_count as usize;
    if node_count == 0 || header.root as usize >= node_count {
        return Err(SuggestError::corrupt(format!(
            "root {} outside {} nodes",
            header.root, node_count
        )));
    }

    let mut reader = BodyReader {
        body,
        pos: 0,
        pool: Vec::new(),
    };
    let mut nodes = Vec::with_capacity(node_count);
    let mut arcs: Vec<ArcRecord> = Vec::with_capacity(header.arc_count as usize);

    for id in 0..node_count {
        let flags = reader.byte()?;
        if flags & !FLAG_FINAL != 0 {
            return Err(SuggestError::corrupt(format!("unknown node flags {:#04x}", flags)));
        }
        let final_output = if flags & FLAG_FINAL != 0 {
            Some(reader.output()?)
        } else {
            None
        };

        let num_arcs = reader.varint()?;
        if num_arcs > 256 {
            return Err(SuggestError::corrupt(format!("node {} has {} arcs", id, num_arcs)));
        }
        let first_arc = arcs.len() as u32;
        let mut previous: Option<u8> = None;
        for _ in 0..num_arcs {
            let label = reader.byte()?;
            if previous.is_some_and(|prev| prev >= label) {
                return Err(SuggestError::corrupt(format!("node {} arcs out of order", id)));
            }
            previous = Some(label);

            let delta = reader.varint()?;
            let target = (id as u64)
                .checked_sub(delta)
                .filter(|_| delta > 0)
                .ok_or_else(|| {
                    SuggestError::corrupt(format!("node {} has invalid arc delta {}", id, delta))
                })?;
            let output = reader.output()?;
            arcs.push(ArcRecord {
                label,
                target: target as NodeId,
                output,
            });
        }

        nodes.push(NodeRecord {
            first_arc,
            num_arcs: num_arcs as u32,
            final_output,
        });
    }

    if reader.pos != body.len() {
        return Err(SuggestError::corrupt(format!(
            "{} trailing bytes after FST nodes",
            body.len() - reader.pos
        )));
    }
    if arcs.len() != header.arc_count as usize {
        return Err(SuggestError::corrupt(format!(
            "arc count {} does not match header {}",
            arcs.len(),
            header.arc_count
        )));
    }

    Ok(Fst {
        nodes,
        arcs,
        bytes: reader.pool,
        root: header.root,
        len: header.key_count,
    })
}
