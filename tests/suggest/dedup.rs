//! Surface forms sharing one analyzed form.

use wfst_suggest::{Entry, SuggesterConfig};

use crate::common::*;

fn paris_variants() -> Vec<Entry> {
    vec![
        Entry::new("Paris", 40),
        Entry::new("PARIS", 30),
        Entry::new("paris", 20),
        Entry::new("PaRiS", 10),
    ]
}

fn capped(max_surface_forms: u32) -> SuggesterConfig {
    SuggesterConfig {
        exact_first: false,
        max_surface_forms_per_analyzed_form: max_surface_forms,
        ..SuggesterConfig::default()
    }
}

#[test]
fn heaviest_surface_forms_survive_the_cap() {
    let suggester = built(exact(standard(), capped(2)), paris_variants());
    let results = suggester.lookup("par", 10).unwrap();
    assert_eq!(keys(&results), vec!["Paris", "PARIS"]);
    assert_eq!(weights(&results), vec![40, 30]);
}

#[test]
fn cap_of_one_keeps_a_single_surface() {
    let suggester = built(exact(standard(), capped(1)), paris_variants());
    assert_eq!(lookup_keys(&suggester, "paris", 10), vec!["Paris"]);
}

#[test]
fn default_cap_keeps_every_variant() {
    let suggester = built(exact(standard(), no_exact_first()), paris_variants());
    assert_eq!(suggester.lookup("p", 10).unwrap().len(), 4);
}

#[test]
fn duplicate_surface_keeps_its_heaviest_weight() {
    let suggester = built(
        exact(keyword(), no_exact_first()),
        vec![
            Entry::new("lyon", 3),
            Entry::new("lyon", 12),
            Entry::new("lyon", 7),
        ],
    );
    let results = suggester.lookup("ly", 10).unwrap();
    assert_eq!(keys(&results), vec!["lyon"]);
    assert_eq!(weights(&results), vec![12]);
    assert_eq!(suggester.count(), 3);
}

#[test]
fn surfaces_on_different_analyzed_forms_are_not_capped() {
    let suggester = built(
        exact(standard(), capped(1)),
        vec![
            Entry::new("Paris", 40),
            Entry::new("Paris Texas", 30),
            Entry::new("Parish", 20),
        ],
    );
    assert_eq!(
        lookup_keys(&suggester, "par", 10),
        vec!["Paris", "Paris Texas", "Parish"]
    );
}

#[test]
fn synonym_paths_return_the_surface_once() {
    let analyzer = std::sync::Arc::new(
        wfst_suggest::SynonymAnalyzer::new(standard()).with_rule("new york", "nyc"),
    );
    let suggester = built(
        exact(analyzer, no_exact_first()),
        vec![Entry::new("new york", 10), Entry::new("newark", 5)],
    );
    // "n" reaches both the "new york" and the "nyc" path of the same entry.
    assert_eq!(lookup_keys(&suggester, "n", 10), vec!["new york", "newark"]);
}
