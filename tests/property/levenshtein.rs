//! Property tests for Levenshtein automata and fuzzy lookups.
//!
//! The automaton must accept exactly the strings the dynamic-programming
//! distance puts within `max_edits` of the word, behind an exact prefix.

use proptest::prelude::*;
use wfst_suggest::fuzzy::within_edits;
use wfst_suggest::{Entry, FuzzyConfig, LevenshteinAutomata};

use crate::common::*;

// ============================================================================
// STRATEGIES
// ============================================================================

fn labels(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..4, 0..=max_len)
}

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]{3,6}").unwrap()
}

/// Replace the label at `at` with one that differs.
fn substitute(word: &str, at: usize) -> String {
    word.chars()
        .enumerate()
        .map(|(i, c)| if i == at { if c == 'z' { 'y' } else { 'z' } } else { c })
        .collect()
}

// ============================================================================
// AUTOMATON PROPERTIES
// ============================================================================

proptest! {
    /// Property: the automaton agrees with the DP oracle on every candidate.
    #[test]
    fn prop_automaton_matches_distance(
        word in labels(5),
        candidate in labels(7),
        max_edits in 0u32..=2,
        transpositions in any::<bool>()
    ) {
        let automaton = LevenshteinAutomata::new(&word, 0xFF, transpositions)
            .to_automaton(max_edits, &[]);
        let expected = within_edits(&word, &candidate, max_edits as usize, transpositions);
        prop_assert_eq!(
            automaton.run(&candidate),
            expected,
            "word {:?} candidate {:?} edits {}",
            word, candidate, max_edits
        );
    }

    /// Property: the prefix is matched literally and edits only apply after it.
    #[test]
    fn prop_prefix_is_exact(
        prefix in labels(3),
        word in labels(4),
        candidate in labels(5),
        max_edits in 1u32..=2
    ) {
        let automaton = LevenshteinAutomata::new(&word, 0xFF, true)
            .to_automaton(max_edits, &prefix);

        let mut full = prefix.clone();
        full.extend_from_slice(&candidate);
        let expected = within_edits(&word, &candidate, max_edits as usize, true);
        prop_assert_eq!(automaton.run(&full), expected);
    }

    /// Property: the automaton is deterministic.
    #[test]
    fn prop_automaton_is_deterministic(word in labels(6), max_edits in 0u32..=2) {
        let automaton = LevenshteinAutomata::new(&word, 0xFF, true).to_automaton(max_edits, &[]);
        prop_assert!(automaton.is_deterministic());
    }
}

// ============================================================================
// SUGGESTER PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: one substitution anywhere still finds the surface.
    #[test]
    fn prop_single_substitution_is_found(
        words in prop::collection::btree_set(word_strategy(), 1..12),
        pick in any::<prop::sample::Index>(),
        at in any::<prop::sample::Index>()
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let target = &words[pick.index(words.len())];
        let typo = substitute(target, at.index(target.chars().count()));
        let entries: Vec<Entry> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Entry::new(w.clone(), i as i64 + 1))
            .collect();

        let config = FuzzyConfig {
            max_edits: 1,
            transpositions: true,
            non_fuzzy_prefix: 0,
            min_fuzzy_length: 0,
            unicode_aware: false,
        };
        let suggester = built(fuzzy(keyword(), no_exact_first(), config), entries);
        let found = lookup_keys(&suggester, &typo, words.len());
        prop_assert!(found.contains(target), "{:?} not found for {:?}: {:?}", target, typo, found);
    }
}
