// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis: the boundary between raw text and token graphs.
//!
//! The suggester never looks at characters directly. It asks an [`Analyzer`]
//! for a [`TokenStream`] and turns that into an automaton. A token carries its
//! term bytes plus two position attributes:
//!
//! - **position increment**: how far this token moves the position cursor.
//!   `0` stacks it on the previous position (a synonym), `>1` leaves a gap
//!   (a removed stop word), which becomes a hole in the automaton.
//! - **position length**: how many positions the token spans. Anything above
//!   `1` creates a side path, e.g. "nyc" spanning "new york".
//!
//! The analyzers here are deliberately small. Real deployments plug in their
//! own implementation of the trait.

mod analyzers;

pub use analyzers::*;

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// One analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// UTF-8 bytes of the term.
    pub term: Vec<u8>,
    pub position_increment: u32,
    pub position_length: u32,
}

impl Token {
    /// A token that advances one position and spans one position.
    pub fn new(term: impl Into<Vec<u8>>) -> Self {
        Self {
            term: term.into(),
            position_increment: 1,
            position_length: 1,
        }
    }

    pub fn with_position_increment(mut self, increment: u32) -> Self {
        self.position_increment = increment;
        self
    }

    pub fn with_position_length(mut self, length: u32) -> Self {
        self.position_length = length;
        self
    }
}

/// The complete output of analyzing one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    /// Positions skipped after the last token (trailing stop words).
    pub final_position_increment: u32,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            final_position_increment: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Produces token streams from text.
///
/// Implementations must be deterministic: the index analyzer runs once per
/// entry at build time and the query analyzer once per lookup, and both must
/// agree on how the same text is tokenized.
pub trait Analyzer: Send + Sync + std::fmt::Debug {
    fn analyze(&self, text: &str) -> TokenStream;
}

/// Normalize a term: lowercase and strip diacritics.
///
/// - "Café" → "cafe"
/// - "naïve" → "naive"
///
/// Without the `unicode-normalization` feature this only lowercases.
#[cfg(feature = "unicode-normalization")]
pub fn normalize_term(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize_term(value: &str) -> String {
    value.to_lowercase()
}

/// Combining marks (Unicode category Mn) for the common diacritic blocks.
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
