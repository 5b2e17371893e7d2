// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the wfst-suggest command-line interface.
//!
//! Three subcommands: `build` turns an entry file into a `.wfst` suggester,
//! `lookup` queries one, and `inspect` prints what a file contains. Build and
//! lookup must agree on analysis, so both read the same optional JSON config.

pub mod display;
pub mod input;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use wfst_suggest::{
    AnalyzingSuggester, Analyzer, FuzzyConfig, KeywordAnalyzer, Result, StandardAnalyzer,
    SuggesterConfig, SynonymAnalyzer,
};

#[derive(Parser)]
#[command(
    name = "wfst-suggest",
    about = "Build and query weighted-FST autocomplete suggesters",
    version
)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a suggester from an entry file
    Build {
        /// Entry file: JSON lines or tab-separated
        #[arg(short, long)]
        input: PathBuf,

        /// Output .wfst file
        #[arg(short, long)]
        output: PathBuf,

        /// Input format (guessed from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        /// Analyzer and suggester options (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Typo-tolerant matching with default fuzzy options unless the config sets them
        #[arg(long)]
        fuzzy: bool,
    },

    /// Suggest completions for a prefix
    Lookup {
        /// Path to .wfst file
        file: PathBuf,

        /// Typed prefix
        query: String,

        /// Maximum number of suggestions
        #[arg(short = 'n', long, default_value = "10")]
        num: usize,

        /// Analyzer and suggester options (JSON); must match the build
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Typo-tolerant matching with default fuzzy options unless the config sets them
        #[arg(long)]
        fuzzy: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect a .wfst file
    Inspect {
        /// Path to .wfst file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// `{"text": ..., "weight": ..., "payload": ...}` per line
    Jsonl,
    /// `text<TAB>weight[<TAB>payload]` per line
    Tsv,
}

impl InputFormat {
    pub fn guess(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsv") | Some("txt") => InputFormat::Tsv,
            _ => InputFormat::Jsonl,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Whole input as one token.
    Keyword,
    /// Words, normalized, minus stop words.
    #[default]
    Standard,
}

/// Everything needed to reconstruct a suggester the same way twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    pub analyzer: AnalyzerKind,
    pub stop_words: Vec<String>,
    /// `[phrase, synonym]` pairs stacked on top of the base analyzer.
    pub synonyms: Vec<(String, String)>,
    pub suggester: SuggesterConfig,
    /// Present means the suggester is fuzzy.
    pub fuzzy: Option<FuzzyConfig>,
}

impl CliConfig {
    pub fn load(path: Option<&Path>, fuzzy: bool) -> Result<Self> {
        let mut config: Self = match path {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        if fuzzy {
            config.fuzzy.get_or_insert_with(FuzzyConfig::default);
        }
        Ok(config)
    }

    pub fn analyzer(&self) -> Arc<dyn Analyzer> {
        let base: Arc<dyn Analyzer> = match self.analyzer {
            AnalyzerKind::Keyword => Arc::new(KeywordAnalyzer),
            AnalyzerKind::Standard => Arc::new(StandardAnalyzer::with_stop_words(&self.stop_words)),
        };
        if self.synonyms.is_empty() {
            return base;
        }
        let synonyms = self
            .synonyms
            .iter()
            .fold(SynonymAnalyzer::new(base), |analyzer, (phrase, synonym)| {
                analyzer.with_rule(phrase, synonym)
            });
        Arc::new(synonyms)
    }

    pub fn suggester(&self) -> Result<AnalyzingSuggester> {
        let analyzer = self.analyzer();
        match &self.fuzzy {
            Some(fuzzy) => AnalyzingSuggester::fuzzy(
                analyzer.clone(),
                analyzer,
                self.suggester.clone(),
                fuzzy.clone(),
            ),
            None => AnalyzingSuggester::new(analyzer.clone(), analyzer, self.suggester.clone()),
        }
    }
}
