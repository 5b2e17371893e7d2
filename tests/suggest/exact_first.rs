//! Promotion of the entry whose surface form equals the key.

use wfst_suggest::{Entry, SuggesterConfig};

use crate::common::*;

fn light_exact() -> Vec<Entry> {
    vec![
        Entry::new("new york city", 500),
        Entry::new("new york state", 300),
        Entry::new("new york", 1),
    ]
}

#[test]
fn light_exact_match_is_promoted() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), light_exact());
    let results = suggester.lookup("new york", 3).unwrap();
    assert_eq!(
        keys(&results),
        vec!["new york", "new york city", "new york state"]
    );
    assert_eq!(results[0].weight, 1);
}

#[test]
fn without_exact_first_weight_wins() {
    let suggester = built(exact(keyword(), no_exact_first()), light_exact());
    let results = suggester.lookup("new york", 3).unwrap();
    assert_eq!(
        keys(&results),
        vec!["new york city", "new york state", "new york"]
    );
}

#[test]
fn exact_match_alone_fills_num_one() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), light_exact());
    let results = suggester.lookup("new york", 1).unwrap();
    assert_eq!(keys(&results), vec!["new york"]);
}

#[test]
fn exact_match_appears_once() {
    let suggester = built(exact(standard(), SuggesterConfig::default()), light_exact());
    let results = suggester.lookup("new york", 10).unwrap();
    let hits = results.iter().filter(|r| r.key == "new york").count();
    assert_eq!(hits, 1);
    assert_eq!(results.len(), 3);
}

#[test]
fn promotion_compares_surface_forms() {
    // The analyzed forms match, but the typed key differs from the surface.
    let suggester = built(
        exact(standard(), SuggesterConfig::default()),
        vec![Entry::new("New York City", 500), Entry::new("New York", 1)],
    );
    assert_eq!(
        lookup_keys(&suggester, "new york", 2),
        vec!["New York City", "New York"]
    );
    assert_eq!(
        lookup_keys(&suggester, "New York", 2),
        vec!["New York", "New York City"]
    );
}

#[test]
fn heaviest_duplicate_surface_is_the_one_promoted() {
    let suggester = built(
        exact(keyword(), SuggesterConfig::default()),
        vec![
            Entry::new("paris", 2),
            Entry::new("paris", 7),
            Entry::new("paris texas", 9),
        ],
    );
    let results = suggester.lookup("paris", 5).unwrap();
    assert_eq!(keys(&results), vec!["paris", "paris texas"]);
    assert_eq!(results[0].weight, 7);
}
