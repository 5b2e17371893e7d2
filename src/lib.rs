// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Weighted-FST autocomplete with analysis graphs and typo tolerance.
//!
//! An [`AnalyzingSuggester`] indexes `(surface form, weight)` entries. Each
//! surface form is run through an [`Analyzer`]; the resulting token graph
//! (synonyms, removed stop words and all) is expanded into analyzed paths,
//! and every path becomes a key in a weighted FST whose output is the
//! surface form. A lookup analyzes the typed prefix the same way, walks the
//! FST along it, and pulls the heaviest completions out with a best-first
//! search.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌──────────┐   ┌──────────────┐
//! │  analysis  │──▶│  automaton  │──▶│  build   │──▶│     fst      │
//! │ (Analyzer, │   │ (token graph│   │ (records,│   │ (builder,    │
//! │  Token)    │   │  utf8, det) │   │  sort)   │   │  codec)      │
//! └────────────┘   └─────────────┘   └──────────┘   └──────────────┘
//!        │                │                                │
//!        ▼                ▼                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  suggest (AnalyzingSuggester)  ◀──  search (frontier, top-N)    │
//! │                                ◀──  fuzzy (Levenshtein DFA)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use wfst_suggest::{AnalyzingSuggester, Analyzer, Entry, StandardAnalyzer, SuggesterConfig};
//!
//! let analyzer: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::new());
//! let mut suggester =
//!     AnalyzingSuggester::new(analyzer.clone(), analyzer, SuggesterConfig::default())?;
//! suggester.build(vec![Entry::new("New York", 100), Entry::new("Newark", 40)])?;
//!
//! let results = suggester.lookup("new", 5)?;
//! assert_eq!(results[0].key, "New York");
//! # Ok::<(), wfst_suggest::SuggestError>(())
//! ```

pub mod analysis;
pub mod automaton;
pub mod binary;
pub mod build;
pub mod config;
pub mod error;
pub mod fst;
pub mod fuzzy;
pub mod search;
pub mod suggest;
mod types;

pub use analysis::{Analyzer, KeywordAnalyzer, StandardAnalyzer, SynonymAnalyzer, Token, TokenStream};
pub use config::{FuzzyConfig, SuggesterConfig};
pub use error::{Result, SuggestError};
pub use fst::{Fst, FstBuilder, Output};
pub use fuzzy::LevenshteinAutomata;
pub use suggest::{AnalyzingSuggester, MatchStrategy};
pub use types::{Entry, LookupResult};
