// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varints and length-prefixed byte strings.
//!
//! Nothing fancy here. Varint for integers that are usually small (node ids,
//! costs, arc counts), length-prefixed slices for surface forms and payloads.
//! Every other codec in the crate is built out of these two.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   See DWARF4 §7.6 "Variable Length Data" and
//!   <https://protobuf.dev/programming-guides/encoding/>

use std::io::{self, Read, Write};

/// A u64 needs at most ten 7-bit groups.
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// VARINTS
// ============================================================================

/// Append `value` as LEB128.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Decode a varint at the start of `bytes`, returning (value, bytes consumed).
///
/// Running out of input is `UnexpectedEof`; an eleventh continuation byte or
/// bits beyond 64 are `InvalidData`.
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    let mut rest = bytes;
    let value = read_varint(&mut rest)?;
    Ok((value, bytes.len() - rest.len()))
}

pub fn write_varint<W: Write>(out: &mut W, value: u64) -> io::Result<()> {
    let mut buf = Vec::with_capacity(MAX_VARINT_BYTES);
    encode_varint(value, &mut buf);
    out.write_all(&buf)
}

/// Read one varint from a stream, a byte at a time.
pub fn read_varint<R: Read>(input: &mut R) -> io::Result<u64> {
    let mut value = 0u64;
    for group in 0..MAX_VARINT_BYTES {
        let mut byte = [0u8; 1];
        input.read_exact(&mut byte)?;
        let bits = u64::from(byte[0] & 0x7F);
        // The tenth group only has room for the top bit.
        if group == MAX_VARINT_BYTES - 1 && bits > 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "varint overflows u64",
            ));
        }
        value |= bits << (7 * group);
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("varint longer than {} bytes", MAX_VARINT_BYTES),
    ))
}

// ============================================================================
// LENGTH-PREFIXED BYTES
// ============================================================================

/// Encode a byte string as `varint(len) ++ bytes`.
pub fn encode_bytes(bytes: &[u8], buf: &mut Vec<u8>) {
    encode_varint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
}

/// Decode a length-prefixed byte string, returning (slice, bytes_consumed).
pub fn decode_bytes(bytes: &[u8]) -> io::Result<(&[u8], usize)> {
    let (len, pos) = decode_varint(bytes)?;
    // Use checked arithmetic to prevent overflow
    let end = usize::try_from(len)
        .ok()
        .and_then(|len| pos.checked_add(len))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Byte string length {} causes overflow", len),
            )
        })?;
    if end > bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated byte string (expected {} bytes)", len),
        ));
    }
    Ok((&bytes[pos..end], end))
}
