// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Constructor-level configuration.
//!
//! Both structs deserialize from camelCase JSON with every field optional, so
//! a config file only needs to mention what it changes. Ranges are checked by
//! `validate()`, which the suggester constructors call before anything else.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SuggestError};

/// Upper bound on `max_surface_forms_per_analyzed_form`: the dedup rank is a
/// single byte in the FST key.
pub const MAX_SURFACE_FORMS_LIMIT: u32 = 256;

/// Largest edit distance the Levenshtein construction supports.
pub const MAX_SUPPORTED_EDITS: u32 = 2;

/// Smallest accepted in-memory sort buffer.
pub const MIN_SORT_BUFFER_BYTES: usize = 1024;

/// Options shared by the exact and fuzzy suggesters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggesterConfig {
    /// Return the entry whose surface form equals the key first, regardless of weight.
    pub exact_first: bool,
    /// Keep token separators significant ("ny c" vs "nyc").
    pub preserve_sep: bool,
    /// How many surface forms may share one analyzed form (1..=256).
    pub max_surface_forms_per_analyzed_form: u32,
    /// Cap on analyzed paths per entry; -1 means unlimited.
    pub max_graph_expansions: i32,
    /// Turn position gaps (removed stop words) into holes instead of ignoring them.
    pub preserve_position_increments: bool,
    /// Directory for build temp files; system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// In-memory budget per sorted run before spilling to disk.
    pub sort_buffer_bytes: usize,
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            exact_first: true,
            preserve_sep: true,
            max_surface_forms_per_analyzed_form: MAX_SURFACE_FORMS_LIMIT,
            max_graph_expansions: -1,
            preserve_position_increments: true,
            temp_dir: None,
            sort_buffer_bytes: 32 * 1024 * 1024,
        }
    }
}

impl SuggesterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_surface_forms_per_analyzed_form == 0
            || self.max_surface_forms_per_analyzed_form > MAX_SURFACE_FORMS_LIMIT
        {
            return Err(SuggestError::InvalidConfig(format!(
                "maxSurfaceFormsPerAnalyzedForm must be in 1..={} (got {})",
                MAX_SURFACE_FORMS_LIMIT, self.max_surface_forms_per_analyzed_form
            )));
        }
        if self.max_graph_expansions == 0 || self.max_graph_expansions < -1 {
            return Err(SuggestError::InvalidConfig(format!(
                "maxGraphExpansions must be -1 (unlimited) or positive (got {})",
                self.max_graph_expansions
            )));
        }
        if self.sort_buffer_bytes < MIN_SORT_BUFFER_BYTES {
            return Err(SuggestError::InvalidConfig(format!(
                "sortBufferBytes must be at least {} (got {})",
                MIN_SORT_BUFFER_BYTES, self.sort_buffer_bytes
            )));
        }
        Ok(())
    }

    /// Graph expansion cap as an optional limit.
    pub fn graph_expansion_limit(&self) -> Option<usize> {
        usize::try_from(self.max_graph_expansions).ok()
    }
}

/// Options that only the fuzzy suggester reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuzzyConfig {
    /// Maximum edits per analyzed path (0..=2).
    pub max_edits: u32,
    /// Count an adjacent swap as one edit (Damerau-Levenshtein).
    pub transpositions: bool,
    /// Leading labels that must match exactly.
    pub non_fuzzy_prefix: usize,
    /// Paths shorter than this are matched exactly.
    pub min_fuzzy_length: usize,
    /// Measure edits in code points rather than bytes.
    pub unicode_aware: bool,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            max_edits: 1,
            transpositions: true,
            non_fuzzy_prefix: 1,
            min_fuzzy_length: 3,
            unicode_aware: false,
        }
    }
}

impl FuzzyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_edits > MAX_SUPPORTED_EDITS {
            return Err(SuggestError::InvalidConfig(format!(
                "maxEdits must be in 0..={} (got {})",
                MAX_SUPPORTED_EDITS, self.max_edits
            )));
        }
        Ok(())
    }
}
