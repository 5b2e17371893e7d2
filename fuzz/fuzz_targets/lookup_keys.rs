// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary keys and corpora through build and lookup.
//!
//! Any text may be typed into a search box. Build must either accept an
//! entry or reject it with an error, and lookup must return at most `num`
//! results, each one a surface that was actually indexed.

#![no_main]

use std::collections::HashSet;
use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wfst_suggest::{
    AnalyzingSuggester, Analyzer, Entry, FuzzyConfig, StandardAnalyzer, SuggesterConfig,
};

#[derive(Debug, Arbitrary)]
struct Input {
    entries: Vec<(String, u16)>,
    keys: Vec<String>,
    num: u8,
    fuzzy: bool,
    exact_first: bool,
    preserve_sep: bool,
}

fuzz_target!(|input: Input| {
    let analyzer: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::with_stop_words(["the"]));
    let config = SuggesterConfig {
        exact_first: input.exact_first,
        preserve_sep: input.preserve_sep,
        max_graph_expansions: 16,
        ..SuggesterConfig::default()
    };
    let suggester = if input.fuzzy {
        AnalyzingSuggester::fuzzy(analyzer.clone(), analyzer, config, FuzzyConfig::default())
    } else {
        AnalyzingSuggester::new(analyzer.clone(), analyzer, config)
    };
    let Ok(mut suggester) = suggester else {
        return;
    };

    let entries: Vec<Entry> = input
        .entries
        .iter()
        .take(64)
        .map(|(surface, weight)| Entry::new(surface.clone(), i64::from(*weight)))
        .collect();
    let surfaces: HashSet<&str> = entries.iter().map(|e| e.surface.as_str()).collect();
    if suggester.build(entries.clone()).is_err() {
        return;
    }

    let num = usize::from(input.num.max(1));
    for key in input.keys.iter().take(8) {
        let Ok(results) = suggester.lookup(key, num) else {
            continue;
        };
        assert!(results.len() <= num, "{} results for num {}", results.len(), num);
        let mut seen = HashSet::new();
        for result in &results {
            assert!(
                surfaces.contains(result.key.as_str()),
                "{:?} was never indexed",
                result.key
            );
            assert!(seen.insert(result.key.as_str()), "{:?} returned twice", result.key);
        }
    }
});
