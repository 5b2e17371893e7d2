//! Typo-tolerant lookups.

use wfst_suggest::{Entry, FuzzyConfig, SuggesterConfig};

use crate::common::*;

fn loose() -> FuzzyConfig {
    FuzzyConfig {
        non_fuzzy_prefix: 0,
        min_fuzzy_length: 0,
        ..FuzzyConfig::default()
    }
}

#[test]
fn one_substitution_still_completes() {
    let suggester = built(
        fuzzy(keyword(), no_exact_first(), FuzzyConfig::default()),
        cities(),
    );
    assert_eq!(
        lookup_keys(&suggester, "nrw york", 5),
        vec!["new york", "new york city"]
    );
}

#[test]
fn non_fuzzy_prefix_must_match_exactly() {
    let strict = built(
        fuzzy(keyword(), no_exact_first(), FuzzyConfig::default()),
        cities(),
    );
    assert!(strict.lookup("mew york", 5).unwrap().is_empty());

    let relaxed = built(fuzzy(keyword(), no_exact_first(), loose()), cities());
    assert_eq!(
        lookup_keys(&relaxed, "mew york", 5),
        vec!["new york", "new york city"]
    );
}

#[test]
fn short_keys_are_matched_exactly() {
    let suggester = built(
        fuzzy(keyword(), no_exact_first(), FuzzyConfig::default()),
        cities(),
    );
    // Two labels is under the default minimum fuzzy length of three.
    assert!(suggester.lookup("nw", 5).unwrap().is_empty());
    assert_eq!(suggester.lookup("ne", 5).unwrap().len(), 4);
}

#[test]
fn transposition_counts_once_when_enabled() {
    let swaps = built(
        fuzzy(keyword(), no_exact_first(), FuzzyConfig::default()),
        cities(),
    );
    assert_eq!(lookup_keys(&swaps, "nwe york", 1), vec!["new york"]);

    let no_swaps = FuzzyConfig {
        transpositions: false,
        non_fuzzy_prefix: 0,
        ..FuzzyConfig::default()
    };
    let plain = built(fuzzy(keyword(), no_exact_first(), no_swaps), cities());
    assert!(plain.lookup("nwe york", 5).unwrap().is_empty());
}

#[test]
fn unicode_aware_edits_count_code_points() {
    let entries = || vec![Entry::new("über", 10)];
    let code_points = FuzzyConfig {
        unicode_aware: true,
        ..loose()
    };
    let unicode = built(fuzzy(keyword(), no_exact_first(), code_points), entries());
    assert_eq!(lookup_keys(&unicode, "uber", 5), vec!["über"]);

    // In bytes, "ü" is two labels away from "u".
    let bytes = built(fuzzy(keyword(), no_exact_first(), loose()), entries());
    assert!(bytes.lookup("uber", 5).unwrap().is_empty());
}

#[test]
fn exact_match_leads_fuzzy_results() {
    let suggester = built(
        fuzzy(keyword(), SuggesterConfig::default(), FuzzyConfig::default()),
        vec![
            Entry::new("new york", 1),
            Entry::new("new yorker", 100),
            Entry::new("new yolk", 50),
        ],
    );
    assert_eq!(
        lookup_keys(&suggester, "new york", 5),
        vec!["new york", "new yorker", "new yolk"]
    );
}

#[test]
fn fuzzy_results_contain_exact_results() {
    let exact_suggester = built(exact(standard(), no_exact_first()), cities());
    let fuzzy_suggester = built(
        fuzzy(standard(), no_exact_first(), FuzzyConfig::default()),
        cities(),
    );
    for key in ["n", "new", "new y", "new york", "nash", "bos"] {
        let exact_keys = lookup_keys(&exact_suggester, key, 10);
        let fuzzy_keys = lookup_keys(&fuzzy_suggester, key, 10);
        for found in &exact_keys {
            assert!(fuzzy_keys.contains(found), "{:?} missing for {:?}", found, key);
        }
    }
}

#[test]
fn zero_edits_behaves_like_exact() {
    let exact_suggester = built(exact(standard(), no_exact_first()), cities());
    let zero = FuzzyConfig {
        max_edits: 0,
        ..loose()
    };
    let fuzzy_suggester = built(fuzzy(standard(), no_exact_first(), zero), cities());
    for key in ["n", "new y", "nrw", "boston", "bostn"] {
        assert_eq!(
            fuzzy_suggester.lookup(key, 10).unwrap(),
            exact_suggester.lookup(key, 10).unwrap(),
            "key {:?}",
            key
        );
    }
}

#[test]
fn fuzzy_lookup_through_standard_analysis() {
    let suggester = built(
        fuzzy(standard(), no_exact_first(), FuzzyConfig::default()),
        cities(),
    );
    assert_eq!(
        lookup_keys(&suggester, "Bostn", 5),
        vec!["boston"]
    );
}
