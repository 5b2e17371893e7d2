// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! FST header and footer structures.
//!
//! The header is 36 bytes of fixed-size fields, parsed in one read before
//! anything else. It says how many nodes, arcs and keys follow and how long
//! the body is, so a reader can bound its allocations before touching the
//! body.
//!
//! The footer is 8 bytes: a CRC32 over header and body, plus a magic number
//! ("TSFW", the header magic reversed). If the footer is wrong, something got
//! corrupted or truncated. Don't trust the data.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "WFST" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x57, 0x46, 0x53, 0x54];

/// Footer magic: "TSFW" (reversed, marks valid end of the FST)
pub const FOOTER_MAGIC: [u8; 4] = [0x54, 0x53, 0x46, 0x57];

/// Current format version
pub const VERSION: u8 = 1;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum FST body: 4 GiB
pub const MAX_BODY_SIZE: u64 = 4 * 1024 * 1024 * 1024;

// ============================================================================
// HEADER
// ============================================================================

/// FST header (36 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstHeader {
    pub version: u8,
    pub node_count: u32,
    pub arc_count: u32,
    pub key_count: u64,
    pub root: u32,
    pub body_len: u64,
}

impl FstHeader {
    // 4 (magic) + 1 (version) + 1 (reserved) + 4 + 4 + 8 + 4 + 8 + 2 (reserved) = 36
    pub const SIZE: usize = 36;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version, 0])?;
        w.write_all(&self.node_count.to_le_bytes())?;
        w.write_all(&self.arc_count.to_le_bytes())?;
        w.write_all(&self.key_count.to_le_bytes())?;
        w.write_all(&self.root.to_le_bytes())?;
        w.write_all(&self.body_len.to_le_bytes())?;
        w.write_all(&[0u8; 2])?; // reserved
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected WFST, got {:?}", magic),
            ));
        }

        let mut buf = [0u8; 32]; // 36 - 4 (magic)
        r.read_exact(&mut buf)?;

        let version = buf[0];
        if version != VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported FST version {} (expected {})", version, VERSION),
            ));
        }

        let u32_at = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        let u64_at = |i: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&buf[i..i + 8]);
            u64::from_le_bytes(bytes)
        };

        let header = Self {
            version,
            node_count: u32_at(2),
            arc_count: u32_at(6),
            key_count: u64_at(10),
            root: u32_at(18),
            body_len: u64_at(22),
            // buf[30..32] is reserved
        };

        if header.body_len > MAX_BODY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("FST body of {} bytes exceeds limit", header.body_len),
            ));
        }
        Ok(header)
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstFooter {
    /// CRC32 checksum of header + body
    pub crc32: u32,
}

impl FstFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; Self::SIZE];
        r.read_exact(&mut bytes)?;

        if bytes[4..] != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected TSFW, got {:?}", &bytes[4..]),
            ));
        }

        Ok(Self {
            crc32: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }

    /// Compute CRC32 over header and body
    pub fn compute_crc32(header: &[u8], body: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(header);
        hasher.update(body);
        hasher.finalize()
    }
}
