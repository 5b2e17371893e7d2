// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! FST build: sorted records in, weighted FST out.
//!
//! The suggester turns each entry into one [`BuildRecord`] per analyzed path
//! and feeds them to an [`ExternalSorter`]. [`assemble_fst`] then makes one
//! streaming pass over the sorted records:
//!
//! 1. Records sharing an analyzed form are adjacent, cheapest first.
//! 2. Within such a group, keep at most `max_surface_forms` records and skip
//!    any surface form already kept.
//! 3. Each kept record becomes the FST key `analyzed ++ END_BYTE ++ rank`,
//!    where `rank` counts the records kept so far in the group. The rank
//!    keeps keys distinct when several surface forms share an analyzed form.
//!
//! Analyzed forms never contain `END_BYTE`, so a shorter analyzed form's key
//! sorts before every key it prefixes and the FST sees keys in order.

mod record;
mod sort;

pub use record::*;
pub use sort::*;

use std::collections::HashSet;

use crate::error::Result;
use crate::fst::{Fst, FstBuilder, Output};

/// Terminates the analyzed form inside an FST key.
pub const END_BYTE: u8 = 0x00;

/// Separates surface and payload inside an FST output.
pub const PAYLOAD_SEP: u8 = 0x1F;

/// Longest analyzed form: the key adds END_BYTE and the rank byte and must
/// still fit a u16 length.
pub const MAX_ANALYZED_LEN: usize = u16::MAX as usize - 2;

/// Longest surface form.
pub const MAX_SURFACE_LEN: usize = u16::MAX as usize - 1;

/// Convert a weight (0..=i32::MAX) into an FST cost: heavier is cheaper.
pub fn encode_weight(weight: i64) -> u32 {
    (i64::from(i32::MAX) - weight).clamp(0, i64::from(i32::MAX)) as u32
}

/// Inverse of [`encode_weight`]. Costs summed past `i32::MAX` along a
/// path floor at weight 0.
pub fn decode_weight(cost: u64) -> i64 {
    let max = i32::MAX as u64;
    (max - cost.min(max)) as i64
}

/// Output bytes stored for one record.
pub fn encode_output_bytes(surface: &[u8], payload: Option<&[u8]>) -> Vec<u8> {
    match payload {
        Some(payload) => {
            let mut bytes = Vec::with_capacity(surface.len() + 1 + payload.len());
            bytes.extend_from_slice(surface);
            bytes.push(PAYLOAD_SEP);
            bytes.extend_from_slice(payload);
            bytes
        }
        None => surface.to_vec(),
    }
}

/// Split output bytes back into `(surface, payload)`.
pub fn decode_output_bytes(bytes: &[u8], has_payloads: bool) -> (&[u8], Option<&[u8]>) {
    if !has_payloads {
        return (bytes, None);
    }
    match bytes.iter().position(|&b| b == PAYLOAD_SEP) {
        Some(sep) => (&bytes[..sep], Some(&bytes[sep + 1..])),
        None => (bytes, Some(&[])),
    }
}

/// Stream sorted records into a minimal FST, applying the per-group dedup.
pub fn assemble_fst<I>(records: I, has_payloads: bool, max_surface_forms: u32) -> Result<Fst>
where
    I: IntoIterator<Item = Result<Vec<u8>>>,
{
    let mut builder = FstBuilder::new();
    let mut previous: Option<Vec<u8>> = None;
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut kept = 0u32;
    let mut key = Vec::new();

    for encoded in records {
        let encoded = encoded?;
        let record = BuildRecord::decode(&encoded, has_payloads)?;

        if previous.as_deref() == Some(record.analyzed) {
            if kept >= max_surface_forms || seen.contains(record.surface) {
                continue;
            }
        } else {
            previous = Some(record.analyzed.to_vec());
            seen.clear();
            kept = 0;
        }

        key.clear();
        key.extend_from_slice(record.analyzed);
        key.push(END_BYTE);
        key.push(kept as u8);
        builder.insert(
            &key,
            Output::new(
                u64::from(record.cost),
                encode_output_bytes(record.surface, record.payload),
            ),
        )?;

        seen.insert(record.surface.to_vec());
        kept += 1;
    }

    Ok(builder.finish())
}
