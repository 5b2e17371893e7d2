//! Property tests for persistence: a loaded suggester answers exactly like
//! the one that was stored.

use proptest::prelude::*;
use wfst_suggest::{Entry, SuggesterConfig};

use crate::common::*;

fn entry_strategy() -> impl Strategy<Value = Entry> {
    (
        prop::string::string_regex("[a-c]{1,4}( [a-c]{1,4}){0,2}").unwrap(),
        0i64..=i64::from(i32::MAX),
    )
        .prop_map(|(surface, weight)| Entry::new(surface, weight))
}

fn all_prefixes(entries: &[Entry]) -> Vec<String> {
    let mut prefixes: Vec<String> = entries
        .iter()
        .flat_map(|e| {
            e.surface
                .char_indices()
                .map(move |(i, c)| e.surface[..i + c.len_utf8()].to_string())
        })
        .collect();
    prefixes.sort();
    prefixes.dedup();
    prefixes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every prefix of every surface gets the same answer after load.
    #[test]
    fn prop_store_load_preserves_lookups(
        entries in prop::collection::vec(entry_strategy(), 0..30),
        exact_first in any::<bool>()
    ) {
        let config = SuggesterConfig { exact_first, ..SuggesterConfig::default() };
        let suggester = built(exact(standard(), config.clone()), entries.clone());

        let mut bytes = Vec::new();
        prop_assert!(suggester.store(&mut bytes).unwrap());
        let mut loaded = exact(standard(), config);
        loaded.load(&mut bytes.as_slice()).unwrap();

        prop_assert_eq!(loaded.count(), entries.len() as u64);
        for prefix in all_prefixes(&entries) {
            prop_assert_eq!(
                loaded.lookup(&prefix, 5).unwrap(),
                suggester.lookup(&prefix, 5).unwrap()
            );
        }
    }

    /// Property: storing a loaded suggester reproduces the original bytes.
    #[test]
    fn prop_store_is_stable(entries in prop::collection::vec(entry_strategy(), 1..30)) {
        let suggester = built(exact(keyword(), SuggesterConfig::default()), entries);
        let mut first = Vec::new();
        suggester.store(&mut first).unwrap();

        let mut loaded = exact(keyword(), SuggesterConfig::default());
        loaded.load(&mut first.as_slice()).unwrap();
        let mut second = Vec::new();
        loaded.store(&mut second).unwrap();
        prop_assert_eq!(first, second);
    }
}
