// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! What goes in and what comes out.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Entry**: `0 ≤ weight ≤ i32::MAX`. The FST stores `i32::MAX - weight`
//!   as a cost; anything outside that range has no cost.
//! - **Entry**: `contexts.is_none()`. Context filtering is not supported and
//!   build rejects entries that carry contexts.
//! - **Entry**: payloads are all-or-nothing. The first entry decides whether
//!   this build stores payloads; every other entry must agree.
//! - **Entry**: `surface` is UTF-8 text, since analyzers take `&str`.
//!   Arbitrary bytes belong in `payload`. The surface may not contain
//!   0x1E or 0x1F, which mark holes and token separators.
//! - **LookupResult**: results of one lookup come out in non-increasing
//!   weight, apart from an exact match promoted to the front.

use serde::{Deserialize, Serialize};

/// One suggestion to index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Text shown to the user; also what gets analyzed.
    pub surface: String,
    pub weight: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<Vec<u8>>>,
}

impl Entry {
    pub fn new(surface: impl Into<String>, weight: i64) -> Self {
        Self {
            surface: surface.into(),
            weight,
            payload: None,
            contexts: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_contexts<I, C>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        self.contexts = Some(contexts.into_iter().map(Into::into).collect());
        self
    }
}

/// One ranked suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// The surface form.
    pub key: String,
    pub weight: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,
}

impl LookupResult {
    pub fn new(key: impl Into<String>, weight: i64) -> Self {
        Self {
            key: key.into(),
            weight,
            payload: None,
        }
    }
}
