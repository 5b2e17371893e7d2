// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Code-point automaton → UTF-8 byte automaton.
//!
//! The FST is keyed by bytes, so an automaton built over code points (fuzzy
//! matching in unicode-aware mode) has to be re-expanded before intersection.
//! Each code-point range transition becomes one or more chains of byte-range
//! transitions whose concatenated ranges match exactly the UTF-8 encodings of
//! the original range.
//!
//! The result is usually nondeterministic (two chains may share a lead byte);
//! callers determinize it afterwards.

use super::{Automaton, AutomatonBuilder, StateId};

const MAX_SCALAR: u32 = 0x10_FFFF;
const SURROGATE_MIN: u32 = 0xD800;
const SURROGATE_MAX: u32 = 0xDFFF;

/// One chain of byte ranges, at most four long.
pub type Utf8Sequence = Vec<(u8, u8)>;

/// Cut `min..=max` into byte-range sequences covering exactly its UTF-8
/// encodings. Surrogates and values above U+10FFFF are dropped.
pub fn utf8_sequences(min: u32, max: u32) -> Vec<Utf8Sequence> {
    let mut out = Vec::new();
    split(min, max.min(MAX_SCALAR), &mut out);
    out
}

fn encoded_len(cp: u32) -> usize {
    match cp {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        _ => 4,
    }
}

fn split(min: u32, max: u32, out: &mut Vec<Utf8Sequence>) {
    if min > max {
        return;
    }
    if min <= SURROGATE_MAX && max >= SURROGATE_MIN {
        if min < SURROGATE_MIN {
            split(min, SURROGATE_MIN - 1, out);
        }
        if max > SURROGATE_MAX {
            split(SURROGATE_MAX + 1, max, out);
        }
        return;
    }
    for boundary in [0x7F, 0x7FF, 0xFFFF] {
        if min <= boundary && max > boundary {
            split(min, boundary, out);
            split(boundary + 1, max, out);
            return;
        }
    }

    let len = encoded_len(min);
    // Every continuation byte position must either be shared between min and
    // max or span its full 0x80..=0xBF range; otherwise cut the range.
    for i in 1..len {
        let mask = (1u32 << (6 * i)) - 1;
        if min & !mask != max & !mask {
            if min & mask != 0 {
                split(min, min | mask, out);
                split((min | mask) + 1, max, out);
                return;
            }
            if max & mask != mask {
                split(min, (max & !mask) - 1, out);
                split(max & !mask, max, out);
                return;
            }
        }
    }

    let (Some(lo), Some(hi)) = (char::from_u32(min), char::from_u32(max)) else {
        return;
    };
    let mut lo_buf = [0u8; 4];
    let mut hi_buf = [0u8; 4];
    let lo = lo.encode_utf8(&mut lo_buf).as_bytes();
    let hi = hi.encode_utf8(&mut hi_buf).as_bytes();
    out.push(lo.iter().copied().zip(hi.iter().copied()).collect());
}

/// Re-expand a code-point automaton into an equivalent byte automaton.
///
/// State ids of the input are preserved; intermediate states for multi-byte
/// chains are appended after them.
pub fn utf32_to_utf8(a: &Automaton) -> Automaton {
    let mut b = AutomatonBuilder::new();
    for state in 0..a.num_states() as StateId {
        let s = b.create_state();
        b.set_accept(s, a.is_accept(state));
    }

    for state in 0..a.num_states() as StateId {
        for t in a.transitions(state) {
            for sequence in utf8_sequences(t.min, t.max) {
                let mut current = state;
                for (i, &(lo, hi)) in sequence.iter().enumerate() {
                    let next = if i + 1 == sequence.len() {
                        t.dest
                    } else {
                        b.create_state()
                    };
                    b.add_range(current, next, u32::from(lo), u32::from(hi));
                    current = next;
                }
            }
        }
    }

    b.finish()
}
