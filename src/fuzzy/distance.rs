// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded edit distance over label sequences.
//!
//! The automaton in [`super::levenshtein`] answers "is this within k edits"
//! for every string at once; this is the one-pair version. The suggester
//! never calls it on the lookup path, but it is the reference the automaton
//! is checked against.
//!
//! `|len(a) - len(b)|` is a lower bound on the distance, so pairs that differ
//! in length by more than `max` are rejected before any DP is allocated.

/// Are `a` and `b` within `max` edits of each other?
///
/// With `transpositions`, swapping two adjacent labels counts as one edit
/// (optimal string alignment distance). Otherwise plain Levenshtein.
pub fn within_edits(a: &[u32], b: &[u32], max: usize, transpositions: bool) -> bool {
    if a.len().abs_diff(b.len()) > max {
        return false;
    }
    edit_distance(a, b, transpositions) <= max
}

/// Full edit distance between two label sequences.
pub fn edit_distance(a: &[u32], b: &[u32], transpositions: bool) -> usize {
    let cols = b.len() + 1;
    // Three rows: two back for transpositions, one back, current.
    let mut before: Vec<usize> = vec![0; cols];
    let mut prev: Vec<usize> = (0..cols).collect();
    let mut row: Vec<usize> = vec![0; cols];

    for i in 1..=a.len() {
        row[0] = i;
        for j in 1..cols {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
            if transpositions && i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(before[j - 2] + 1);
            }
            row[j] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut row);
    }

    prev[b.len()]
}
