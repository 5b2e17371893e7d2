// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: typo tolerance via edit distance.
//!
//! Two pieces: a bounded edit distance for one-off comparisons, and
//! Levenshtein automata for matching against every key of an FST at once.

mod distance;
mod levenshtein;

pub use distance::*;
pub use levenshtein::*;
