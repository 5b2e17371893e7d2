// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for suggester construction, build, lookup and persistence.
//!
//! The variants follow the lifecycle of a suggester. Configuration problems
//! surface at construction. Unsupported features and malformed input surface
//! per call and never touch an already-built FST. I/O failures during build
//! are fatal to that build. Corrupt persisted data is rejected on load.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SuggestError>;

/// Everything that can go wrong while building or querying a suggester.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// A constructor-level option is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller asked for a feature this suggester does not implement
    /// (contexts, `only_more_popular`).
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A key, entry or argument violates an input contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Persisted data failed validation while loading.
    #[error("corrupt suggester data: {0}")]
    Corrupt(String),

    /// Determinization would exceed the configured state limit.
    #[error("automaton too complex: determinization exceeded {limit} states")]
    TooComplex { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SuggestError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        SuggestError::InvalidInput(message.into())
    }

    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        SuggestError::Corrupt(message.into())
    }

    /// Classify a failed read of persisted data: truncation and malformed
    /// bytes are corruption, anything else is a genuine I/O error.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::InvalidData => {
                SuggestError::Corrupt(err.to_string())
            }
            _ => SuggestError::Io(err),
        }
    }
}
