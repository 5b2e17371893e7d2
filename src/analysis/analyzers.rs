// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Concrete analyzers: keyword, standard (with stop words) and synonyms.

use std::collections::HashSet;
use std::sync::Arc;

use super::{normalize_term, Analyzer, Token, TokenStream};

/// Emits the whole input as a single token, untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> TokenStream {
        if text.is_empty() {
            return TokenStream::default();
        }
        TokenStream::new(vec![Token::new(text.as_bytes())])
    }
}

/// Splits on anything that is not alphanumeric, normalizes each word and
/// drops stop words.
///
/// A dropped stop word still consumes a position: the next token's position
/// increment grows by one, and trailing stop words land in
/// `final_position_increment`.
#[derive(Debug, Clone, Default)]
pub struct StandardAnalyzer {
    stop_words: HashSet<String>,
}

impl StandardAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|word| normalize_term(word.as_ref()))
                .collect(),
        }
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> TokenStream {
        let mut tokens = Vec::new();
        let mut skipped = 0u32;

        for word in text.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            let term = normalize_term(word);
            if term.is_empty() {
                continue;
            }
            if self.stop_words.contains(&term) {
                skipped += 1;
                continue;
            }
            tokens.push(Token::new(term.into_bytes()).with_position_increment(1 + skipped));
            skipped = 0;
        }

        TokenStream {
            tokens,
            final_position_increment: skipped,
        }
    }
}

#[derive(Debug, Clone)]
struct SynonymRule {
    phrase: Vec<Vec<u8>>,
    synonym: Vec<u8>,
}

/// Wraps another analyzer and stacks synonym tokens on top of its output.
///
/// A rule maps a phrase of one or more words to a single synonym term. When
/// the phrase matches consecutive tokens, the synonym is emitted at the first
/// token's position with a position length equal to the phrase length, so a
/// two-word phrase turns into a branch in the token graph.
#[derive(Debug, Clone)]
pub struct SynonymAnalyzer {
    inner: Arc<dyn Analyzer>,
    rules: Vec<SynonymRule>,
}

impl SynonymAnalyzer {
    pub fn new(inner: Arc<dyn Analyzer>) -> Self {
        Self {
            inner,
            rules: Vec::new(),
        }
    }

    /// Add a rule; both sides go through the wrapped analyzer first.
    /// Rules whose phrase or synonym analyze to nothing are ignored.
    pub fn with_rule(mut self, phrase: &str, synonym: &str) -> Self {
        let phrase: Vec<Vec<u8>> = self
            .inner
            .analyze(phrase)
            .tokens
            .into_iter()
            .map(|token| token.term)
            .collect();
        let synonym = self.inner.analyze(synonym).tokens.into_iter().next();
        match synonym {
            Some(synonym) if !phrase.is_empty() => self.rules.push(SynonymRule {
                phrase,
                synonym: synonym.term,
            }),
            _ => {}
        }
        self
    }

    fn matches_at(rule: &SynonymRule, tokens: &[Token], start: usize) -> bool {
        let Some(window) = tokens.get(start..start + rule.phrase.len()) else {
            return false;
        };
        window.iter().zip(&rule.phrase).enumerate().all(|(i, (token, term))| {
            token.term == *term && (i == 0 || token.position_increment == 1)
        })
    }
}

impl Analyzer for SynonymAnalyzer {
    fn analyze(&self, text: &str) -> TokenStream {
        let base = self.inner.analyze(text);
        let mut tokens = Vec::with_capacity(base.tokens.len());

        for (i, token) in base.tokens.iter().enumerate() {
            tokens.push(token.clone());
            for rule in &self.rules {
                if Self::matches_at(rule, &base.tokens, i) {
                    tokens.push(
                        Token::new(rule.synonym.clone())
                            .with_position_increment(0)
                            .with_position_length(rule.phrase.len() as u32),
                    );
                }
            }
        }

        TokenStream {
            tokens,
            final_position_increment: base.final_position_increment,
        }
    }
}
