// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Loading persisted suggesters from adversarial bytes.
//!
//! A crafted `.wfst` file should produce an error, never a panic, a hang, or
//! an allocation sized by a lying header. When the bytes do load, the result
//! must be usable: lookups terminate and storing it again round-trips.

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use wfst_suggest::{AnalyzingSuggester, Analyzer, KeywordAnalyzer, SuggesterConfig};

fuzz_target!(|data: &[u8]| {
    let analyzer: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer);
    let Ok(mut suggester) =
        AnalyzingSuggester::new(analyzer.clone(), analyzer, SuggesterConfig::default())
    else {
        return;
    };

    if suggester.load(&mut &data[..]).is_err() {
        return;
    }

    let keys = ["", "a", "ab", "\u{ff}"];
    let before: Vec<_> = keys.iter().map(|key| suggester.lookup(key, 5).ok()).collect();

    let mut stored = Vec::new();
    let wrote = suggester.store(&mut stored).expect("store into a Vec cannot fail");
    assert!(wrote, "a loaded suggester always has contents to store");

    suggester
        .load(&mut stored.as_slice())
        .expect("re-stored suggester must load");
    let after: Vec<_> = keys.iter().map(|key| suggester.lookup(key, 5).ok()).collect();
    assert_eq!(before, after, "lookups changed across store and load");
});
