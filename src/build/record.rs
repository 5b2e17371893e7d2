// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build records: one analyzed path of one entry, flattened for sorting.
//!
//! ```text
//! u16 BE  analyzed length
//! [u8]    analyzed bytes
//! u32 BE  cost (i32::MAX - weight)
//! u16 BE  surface length     only when payloads are present
//! [u8]    surface bytes
//! [u8]    payload bytes      only when payloads are present, runs to the end
//! ```
//!
//! Records sort by analyzed bytes, then cost, then surface (then payload).
//! That puts every surface form sharing an analyzed form next to each other,
//! cheapest first, which is exactly what the dedup pass needs.

use std::cmp::Ordering;

use crate::error::{Result, SuggestError};

/// A decoded view of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRecord<'a> {
    pub analyzed: &'a [u8],
    pub cost: u32,
    pub surface: &'a [u8],
    pub payload: Option<&'a [u8]>,
}

impl<'a> BuildRecord<'a> {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.analyzed.len() as u16).to_be_bytes());
        buf.extend_from_slice(self.analyzed);
        buf.extend_from_slice(&self.cost.to_be_bytes());
        match self.payload {
            Some(payload) => {
                buf.extend_from_slice(&(self.surface.len() as u16).to_be_bytes());
                buf.extend_from_slice(self.surface);
                buf.extend_from_slice(payload);
            }
            None => buf.extend_from_slice(self.surface),
        }
    }

    pub fn decode(bytes: &'a [u8], has_payloads: bool) -> Result<Self> {
        let truncated = || SuggestError::corrupt("truncated build record");

        let analyzed_len = read_u16(bytes, 0).ok_or_else(truncated)? as usize;
        let analyzed = bytes.get(2..2 + analyzed_len).ok_or_else(truncated)?;
        let pos = 2 + analyzed_len;
        let cost = bytes
            .get(pos..pos + 4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
            .ok_or_else(truncated)?;
        let pos = pos + 4;

        if !has_payloads {
            return Ok(Self {
                analyzed,
                cost,
                surface: &bytes[pos..],
                payload: None,
            });
        }

        let surface_len = read_u16(bytes, pos).ok_or_else(truncated)? as usize;
        let pos = pos + 2;
        let surface = bytes.get(pos..pos + surface_len).ok_or_else(truncated)?;
        Ok(Self {
            analyzed,
            cost,
            surface,
            payload: Some(&bytes[pos + surface_len..]),
        })
    }
}

fn read_u16(bytes: &[u8], pos: usize) -> Option<u16> {
    bytes.get(pos..pos + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

/// Order two encoded records: analyzed, cost, surface, payload.
///
/// Undecodable records sort last; they never occur for records this crate
/// wrote itself.
pub fn compare_records(a: &[u8], b: &[u8], has_payloads: bool) -> Ordering {
    match (
        BuildRecord::decode(a, has_payloads),
        BuildRecord::decode(b, has_payloads),
    ) {
        (Ok(a), Ok(b)) => a
            .analyzed
            .cmp(b.analyzed)
            .then(a.cost.cmp(&b.cost))
            .then_with(|| a.surface.cmp(b.surface))
            .then_with(|| a.payload.cmp(&b.payload)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
