// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! How typed text is allowed to match analyzed forms.
//!
//! The exact and fuzzy suggesters share every step except three: whether
//! token automata carry code points, how they get down to bytes, and which
//! automaton is intersected with the FST for the general search. Those three
//! hooks live here.

use crate::automaton::{
    determinize_scaled, finite_strings, is_finite, make_empty, make_string, union,
    utf32_to_utf8, Automaton, TokenStreamToAutomaton, MAX_BYTE_LABEL, MAX_CODE_POINT,
};
use crate::config::FuzzyConfig;
use crate::error::{Result, SuggestError};
use crate::fst::Fst;
use crate::fuzzy::LevenshteinAutomata;
use crate::search::{intersect_prefix_paths, PrefixPath};

/// Matching mode of a suggester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The query's analyzed form must be a prefix of an indexed one.
    Exact,
    /// Up to `max_edits` edits per analyzed path, past the fixed prefix.
    Fuzzy(FuzzyConfig),
}

impl MatchStrategy {
    /// Token automata carry code points instead of bytes.
    pub fn unicode_arcs(&self) -> bool {
        matches!(self, MatchStrategy::Fuzzy(config) if config.unicode_aware)
    }

    pub fn token_stream_to_automaton(
        &self,
        preserve_position_increments: bool,
    ) -> TokenStreamToAutomaton {
        TokenStreamToAutomaton::new()
            .with_preserve_position_increments(preserve_position_increments)
            .with_unicode_arcs(self.unicode_arcs())
    }

    /// Bring an automaton down to byte labels, as the FST needs.
    pub fn convert_automaton(&self, a: Automaton) -> Result<Automaton> {
        if self.unicode_arcs() {
            determinize_scaled(utf32_to_utf8(&a))
        } else {
            Ok(a)
        }
    }

    /// Frontier for the general search.
    ///
    /// `exact` is what the unmodified lookup automaton reached; the exact
    /// strategy reuses it, the fuzzy one intersects its Levenshtein
    /// expansion instead.
    pub fn full_prefix_paths(
        &self,
        exact: Vec<PrefixPath>,
        lookup: &Automaton,
        fst: &Fst,
    ) -> Result<Vec<PrefixPath>> {
        match self {
            MatchStrategy::Exact => Ok(exact),
            MatchStrategy::Fuzzy(config) => {
                let levenshtein = self.convert_automaton(levenshtein_union(lookup, config)?)?;
                Ok(intersect_prefix_paths(&levenshtein, fst))
            }
        }
    }
}

/// Union of one Levenshtein automaton per accepted string of `lookup`.
///
/// Strings no longer than the fixed prefix, or shorter than the minimum
/// fuzzy length, are matched exactly.
pub fn levenshtein_union(lookup: &Automaton, config: &FuzzyConfig) -> Result<Automaton> {
    if !is_finite(lookup) {
        return Err(SuggestError::invalid_input(
            "query analysis produced a cyclic token graph",
        ));
    }
    let alpha_max = if config.unicode_aware {
        MAX_CODE_POINT
    } else {
        MAX_BYTE_LABEL
    };
    let prefix = config.non_fuzzy_prefix;

    let mut subs: Vec<Automaton> = finite_strings(lookup, None)
        .strings
        .iter()
        .map(|s| {
            if s.len() <= prefix || s.len() < config.min_fuzzy_length {
                make_string(s)
            } else {
                LevenshteinAutomata::new(&s[prefix..], alpha_max, config.transpositions)
                    .to_automaton(config.max_edits, &s[..prefix])
            }
        })
        .collect();

    match subs.len() {
        0 => Ok(make_empty()),
        1 => Ok(subs.pop().unwrap_or_else(make_empty)),
        _ => determinize_scaled(union(&subs)),
    }
}
