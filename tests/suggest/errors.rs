//! Rejected arguments, entries and configurations.

use std::sync::Arc;

use wfst_suggest::{
    AnalyzingSuggester, Entry, FuzzyConfig, SuggestError, SuggesterConfig, Token,
};

use crate::common::*;

#[test]
fn contexts_are_unsupported_at_build() {
    let mut suggester = exact(keyword(), SuggesterConfig::default());
    let err = suggester
        .build(vec![Entry::new("rome", 1).with_contexts(["it"])])
        .unwrap_err();
    assert!(matches!(err, SuggestError::Unsupported("contexts")));
}

#[test]
fn contexts_and_popularity_are_unsupported_at_lookup() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), cities());
    let contexts = vec![b"us".to_vec()];
    assert!(matches!(
        suggester.lookup_with("new", Some(&contexts), false, 5),
        Err(SuggestError::Unsupported("contexts"))
    ));
    assert!(matches!(
        suggester.lookup_with("new", None, true, 5),
        Err(SuggestError::Unsupported("onlyMorePopular"))
    ));
}

#[test]
fn weights_must_fit_a_non_negative_i32() {
    let mut suggester = exact(keyword(), SuggesterConfig::default());
    for weight in [-1, i64::from(i32::MAX) + 1, i64::MIN] {
        let err = suggester.build(vec![Entry::new("rome", weight)]).unwrap_err();
        assert!(matches!(err, SuggestError::InvalidInput(_)), "weight {}", weight);
    }
    suggester
        .build(vec![
            Entry::new("rome", 0),
            Entry::new("roma", i64::from(i32::MAX)),
        ])
        .unwrap();
    assert_eq!(weights(&suggester.lookup("rom", 2).unwrap()), vec![i64::from(i32::MAX), 0]);
}

#[test]
fn reserved_characters_in_key_are_rejected() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), cities());
    for key in ["new\u{1E}york", "new\u{1F}york"] {
        assert!(matches!(
            suggester.lookup(key, 5),
            Err(SuggestError::InvalidInput(_))
        ));
    }
}

#[test]
fn reserved_characters_in_surface_are_rejected() {
    for preserve_sep in [true, false] {
        let config = SuggesterConfig {
            preserve_sep,
            ..SuggesterConfig::default()
        };
        for surface in ["a\u{1E}b", "x\u{1F}y"] {
            let mut suggester = exact(keyword(), config.clone());
            let err = suggester
                .build(vec![Entry::new("ab", 3), Entry::new(surface, 10)])
                .unwrap_err();
            assert!(matches!(err, SuggestError::InvalidInput(_)), "{:?}: {}", surface, err);
            assert!(suggester.lookup("ab", 5).unwrap().is_empty());
        }
    }
}

#[test]
fn reserved_bytes_from_analysis_are_rejected() {
    let analyzer = Arc::new(
        CannedAnalyzer::default().with("x y", vec![Token::new(&b"x\x1fy"[..])]),
    );
    let mut suggester = exact(analyzer, SuggesterConfig::default());
    let err = suggester.build(vec![Entry::new("x y", 1)]).unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(_)));
}

#[test]
fn num_must_be_positive() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), cities());
    assert!(matches!(
        suggester.lookup("new", 0),
        Err(SuggestError::InvalidInput(_))
    ));
}

#[test]
fn out_of_range_options_fail_construction() {
    let config = SuggesterConfig {
        max_surface_forms_per_analyzed_form: 0,
        ..SuggesterConfig::default()
    };
    assert!(matches!(
        AnalyzingSuggester::new(keyword(), keyword(), config),
        Err(SuggestError::InvalidConfig(_))
    ));

    let fuzzy = FuzzyConfig {
        max_edits: 3,
        ..FuzzyConfig::default()
    };
    assert!(matches!(
        AnalyzingSuggester::fuzzy(keyword(), keyword(), SuggesterConfig::default(), fuzzy),
        Err(SuggestError::InvalidConfig(_))
    ));
}

#[test]
fn oversized_surface_is_rejected() {
    let mut suggester = exact(standard(), SuggesterConfig::default());
    let surface = "a".repeat(65535);
    let err = suggester.build(vec![Entry::new(surface, 1)]).unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(_)));
}

#[test]
fn oversized_analyzed_form_is_rejected() {
    let mut suggester = exact(keyword(), SuggesterConfig::default());
    let surface = "a".repeat(65534);
    let err = suggester.build(vec![Entry::new(surface, 1)]).unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(_)));
}

#[test]
fn nul_in_analyzed_form_is_rejected() {
    let mut suggester = exact(keyword(), SuggesterConfig::default());
    let err = suggester.build(vec![Entry::new("a\0b", 1)]).unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(_)));
}

#[test]
fn failed_build_leaves_previous_contents_live() {
    let mut suggester = built(exact(keyword(), no_exact_first()), cities());
    let before = suggester.lookup("n", 10).unwrap();

    let err = suggester
        .build(vec![Entry::new("nice", 10), Entry::new("nantes", -5)])
        .unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(_)));
    assert_eq!(suggester.count(), cities().len() as u64);
    assert_eq!(suggester.lookup("n", 10).unwrap(), before);
}

#[test]
fn errors_render_readable_messages() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), cities());
    let err = suggester.lookup("new", 0).unwrap_err();
    assert!(err.to_string().starts_with("invalid input"));
}
