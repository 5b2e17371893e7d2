//! Property tests for lookup ordering against a brute-force oracle.
//!
//! Corpora are small sets of distinct keyword surfaces over a four-letter
//! alphabet with distinct weights, so the expected top-n is unambiguous.

use proptest::prelude::*;
use wfst_suggest::{Entry, SuggesterConfig};

use crate::common::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Distinct surfaces paired with distinct weights.
fn corpus_strategy() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::btree_set("[a-d]{1,5}", 1..40).prop_flat_map(|surfaces| {
        let n = surfaces.len();
        let weights: Vec<i64> = (0..n as i64).map(|w| w * 7 + 1).collect();
        (Just(surfaces), Just(weights).prop_shuffle()).prop_map(|(surfaces, weights)| {
            surfaces
                .into_iter()
                .zip(weights)
                .map(|(surface, weight)| Entry::new(surface, weight))
                .collect()
        })
    })
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]{1,3}").unwrap()
}

// ============================================================================
// ORACLE
// ============================================================================

/// Entries starting with `prefix`, heaviest first, capped at `num`.
fn oracle(entries: &[Entry], prefix: &str, num: usize) -> Vec<(String, i64)> {
    let mut matches: Vec<(String, i64)> = entries
        .iter()
        .filter(|e| e.surface.starts_with(prefix))
        .map(|e| (e.surface.clone(), e.weight))
        .collect();
    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches.truncate(num);
    matches
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    /// Property: weights never increase down the result list without exact-first.
    #[test]
    fn prop_lookup_weights_descend(
        entries in corpus_strategy(),
        prefix in prefix_strategy(),
        num in 1usize..20
    ) {
        let suggester = built(exact(keyword(), no_exact_first()), entries);
        let results = suggester.lookup(&prefix, num).unwrap();
        prop_assert!(results.len() <= num);
        for pair in results.windows(2) {
            prop_assert!(
                pair[0].weight >= pair[1].weight,
                "{} ({}) ranked above {} ({})",
                pair[0].key, pair[0].weight, pair[1].key, pair[1].weight
            );
        }
    }

    /// Property: the top-n equals a sort-and-filter over every entry.
    #[test]
    fn prop_lookup_matches_oracle(
        entries in corpus_strategy(),
        prefix in prefix_strategy(),
        num in 1usize..20
    ) {
        let suggester = built(exact(keyword(), no_exact_first()), entries.clone());
        let actual: Vec<(String, i64)> = suggester
            .lookup(&prefix, num)
            .unwrap()
            .into_iter()
            .map(|r| (r.key, r.weight))
            .collect();
        prop_assert_eq!(actual, oracle(&entries, &prefix, num));
    }

    /// Property: with exact-first, an entry equal to the key leads the results
    /// and the rest keep oracle order.
    #[test]
    fn prop_exact_first_leads(
        entries in corpus_strategy(),
        pick in any::<prop::sample::Index>(),
        num in 1usize..20
    ) {
        let key = entries[pick.index(entries.len())].surface.clone();
        let suggester = built(exact(keyword(), SuggesterConfig::default()), entries.clone());
        let results = suggester.lookup(&key, num).unwrap();

        prop_assert_eq!(&results[0].key, &key);
        let rest: Vec<(String, i64)> = results[1..]
            .iter()
            .map(|r| (r.key.clone(), r.weight))
            .collect();
        let expected: Vec<(String, i64)> = oracle(&entries, &key, entries.len())
            .into_iter()
            .filter(|(surface, _)| *surface != key)
            .take(num - 1)
            .collect();
        prop_assert_eq!(rest, expected);
    }

    /// Property: case variants of one analyzed form are capped at the heaviest k.
    #[test]
    fn prop_surface_forms_capped(
        cap in 1u32..5,
        weights in Just((1..=8i64).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let variants = ["paris", "Paris", "PARIS", "pAris", "paRis", "parIs", "pariS", "PaRiS"];
        let entries: Vec<Entry> = variants
            .iter()
            .zip(&weights)
            .map(|(surface, &weight)| Entry::new(*surface, weight))
            .collect();
        let config = SuggesterConfig {
            exact_first: false,
            max_surface_forms_per_analyzed_form: cap,
            ..SuggesterConfig::default()
        };
        let suggester = built(exact(standard(), config), entries);
        let results = suggester.lookup("par", 10).unwrap();

        let mut expected = weights.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(cap as usize);
        prop_assert_eq!(crate::common::weights(&results), expected);
    }
}
