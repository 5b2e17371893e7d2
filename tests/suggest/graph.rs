//! Token graphs: separators, stop-word holes, synonyms and expansion caps.

use std::sync::Arc;

use wfst_suggest::{AnalyzingSuggester, Entry, SuggesterConfig, SynonymAnalyzer, Token};

use crate::common::*;

fn config(f: impl FnOnce(&mut SuggesterConfig)) -> SuggesterConfig {
    let mut config = no_exact_first();
    f(&mut config);
    config
}

fn ghost() -> Vec<Entry> {
    vec![
        Entry::new("the ghost of christmas past", 10),
        Entry::new("ghostbusters", 5),
    ]
}

#[test]
fn dropping_separators_joins_words() {
    let suggester = built(
        exact(standard(), config(|c| c.preserve_sep = false)),
        vec![
            Entry::new("new york", 100),
            Entry::new("new york city", 90),
            Entry::new("new jersey", 50),
        ],
    );
    assert_eq!(
        lookup_keys(&suggester, "newy", 5),
        vec!["new york", "new york city"]
    );
    assert_eq!(lookup_keys(&suggester, "new y", 5).len(), 2);
}

#[test]
fn stop_word_holes_are_part_of_the_path() {
    let analyzer = standard_with_stop_words(&["the", "of"]);
    let suggester = built(exact(analyzer, no_exact_first()), ghost());

    assert_eq!(
        lookup_keys(&suggester, "the ghost of chris", 5),
        vec!["the ghost of christmas past"]
    );
    assert_eq!(
        lookup_keys(&suggester, "the ghost of", 5),
        vec!["the ghost of christmas past"]
    );
    assert!(suggester.lookup("ghost chris", 5).unwrap().is_empty());
}

#[test]
fn ignoring_position_gaps_closes_holes() {
    let analyzer = standard_with_stop_words(&["the", "of"]);
    let suggester = built(
        exact(analyzer, config(|c| c.preserve_position_increments = false)),
        ghost(),
    );
    assert_eq!(
        lookup_keys(&suggester, "ghost chris", 5),
        vec!["the ghost of christmas past"]
    );
    assert_eq!(
        lookup_keys(&suggester, "ghost", 5),
        vec!["the ghost of christmas past", "ghostbusters"]
    );
}

fn nyc() -> Arc<SynonymAnalyzer> {
    Arc::new(SynonymAnalyzer::new(standard()).with_rule("new york", "nyc"))
}

#[test]
fn synonym_branch_is_searchable() {
    let suggester = built(
        exact(nyc(), no_exact_first()),
        vec![Entry::new("new york", 10), Entry::new("newark", 5)],
    );
    assert_eq!(suggester.max_analyzed_paths(), 2);
    assert_eq!(lookup_keys(&suggester, "nyc", 5), vec!["new york"]);
    assert_eq!(lookup_keys(&suggester, "new y", 5), vec!["new york"]);
    assert_eq!(lookup_keys(&suggester, "ny", 5), vec!["new york"]);
}

#[test]
fn expansion_cap_truncates_analyzed_paths() {
    let suggester = built(
        exact(nyc(), config(|c| c.max_graph_expansions = 1)),
        vec![Entry::new("new york", 10)],
    );
    assert_eq!(suggester.max_analyzed_paths(), 1);
    let via_words = suggester.lookup("new y", 5).unwrap();
    let via_synonym = suggester.lookup("nyc", 5).unwrap();
    assert_eq!(via_words.len() + via_synonym.len(), 1);
}

#[test]
fn query_analyzer_may_differ_from_index_analyzer() {
    let index = Arc::new(CannedAnalyzer::default());
    let query = Arc::new(
        CannedAnalyzer::default().with("big apple", vec![Token::new("new"), Token::new("york")]),
    );
    let mut suggester = AnalyzingSuggester::new(index, query, no_exact_first()).unwrap();
    suggester
        .build(vec![
            Entry::new("new york", 10),
            Entry::new("new york city", 8),
            Entry::new("big sur", 3),
        ])
        .unwrap();
    assert_eq!(
        lookup_keys(&suggester, "big apple", 5),
        vec!["new york", "new york city"]
    );
    assert_eq!(lookup_keys(&suggester, "big", 5), vec!["big sur"]);
}

#[test]
fn query_side_synonyms_widen_the_frontier() {
    let index = standard();
    let query = Arc::new(
        CannedAnalyzer::default().with(
            "nyc",
            vec![
                Token::new("nyc"),
                Token::new("new").with_position_increment(0),
            ],
        ),
    );
    let mut suggester = AnalyzingSuggester::new(index, query, no_exact_first()).unwrap();
    suggester
        .build(vec![Entry::new("nyc marathon", 4), Entry::new("new york", 10)])
        .unwrap();
    assert_eq!(
        lookup_keys(&suggester, "nyc", 5),
        vec!["new york", "nyc marathon"]
    );
}
