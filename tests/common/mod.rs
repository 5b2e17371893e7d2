//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use wfst_suggest::{
    AnalyzingSuggester, Analyzer, Entry, FuzzyConfig, KeywordAnalyzer, LookupResult,
    StandardAnalyzer, SuggesterConfig, Token, TokenStream,
};

// ============================================================================
// ANALYZERS
// ============================================================================

pub fn keyword() -> Arc<dyn Analyzer> {
    Arc::new(KeywordAnalyzer)
}

pub fn standard() -> Arc<dyn Analyzer> {
    Arc::new(StandardAnalyzer::new())
}

pub fn standard_with_stop_words(words: &[&str]) -> Arc<dyn Analyzer> {
    Arc::new(StandardAnalyzer::with_stop_words(words))
}

/// Replays canned token streams, keyed by input text. Unknown text falls
/// back to one token per whitespace-separated word.
#[derive(Debug, Default)]
pub struct CannedAnalyzer {
    streams: Vec<(String, TokenStream)>,
}

impl CannedAnalyzer {
    pub fn with(mut self, text: &str, tokens: Vec<Token>) -> Self {
        self.streams.push((text.to_string(), TokenStream::new(tokens)));
        self
    }

    pub fn with_stream(mut self, text: &str, stream: TokenStream) -> Self {
        self.streams.push((text.to_string(), stream));
        self
    }
}

impl Analyzer for CannedAnalyzer {
    fn analyze(&self, text: &str) -> TokenStream {
        if let Some((_, stream)) = self.streams.iter().find(|(t, _)| t == text) {
            return stream.clone();
        }
        TokenStream::new(
            text.split_whitespace()
                .map(|word| Token::new(word.as_bytes()))
                .collect(),
        )
    }
}

// ============================================================================
// SUGGESTERS
// ============================================================================

pub fn exact(analyzer: Arc<dyn Analyzer>, config: SuggesterConfig) -> AnalyzingSuggester {
    AnalyzingSuggester::new(analyzer.clone(), analyzer, config).expect("valid config")
}

pub fn fuzzy(
    analyzer: Arc<dyn Analyzer>,
    config: SuggesterConfig,
    fuzzy: FuzzyConfig,
) -> AnalyzingSuggester {
    AnalyzingSuggester::fuzzy(analyzer.clone(), analyzer, config, fuzzy).expect("valid config")
}

pub fn built(mut suggester: AnalyzingSuggester, entries: Vec<Entry>) -> AnalyzingSuggester {
    suggester.build(entries).expect("build succeeds");
    suggester
}

pub fn no_exact_first() -> SuggesterConfig {
    SuggesterConfig {
        exact_first: false,
        ..SuggesterConfig::default()
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn cities() -> Vec<Entry> {
    vec![
        Entry::new("new york", 100),
        Entry::new("new york city", 50),
        Entry::new("new jersey", 80),
        Entry::new("newark", 30),
        Entry::new("nashville", 60),
        Entry::new("boston", 90),
    ]
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

pub fn keys(results: &[LookupResult]) -> Vec<&str> {
    results.iter().map(|r| r.key.as_str()).collect()
}

pub fn weights(results: &[LookupResult]) -> Vec<i64> {
    results.iter().map(|r| r.weight).collect()
}

pub fn lookup_keys(suggester: &AnalyzingSuggester, key: &str, num: usize) -> Vec<String> {
    suggester
        .lookup(key, num)
        .expect("lookup succeeds")
        .into_iter()
        .map(|r| r.key)
        .collect()
}
