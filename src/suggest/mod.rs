// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The analyzing suggester.
//!
//! # Build
//!
//! ```text
//! Entry ──▶ index analyzer ──▶ token automaton ──▶ replace_sep ──▶ (utf8)
//!       ──▶ finite strings (analyzed paths) ──▶ one BuildRecord per path
//!       ──▶ external sort ──▶ dedup per analyzed form ──▶ weighted FST
//! ```
//!
//! # Lookup
//!
//! ```text
//! key ──▶ query analyzer ──▶ token automaton ──▶ replace_sep ──▶ determinize
//!     ──▶ intersect with FST (frontier)
//!     ──▶ [exact first]  completions ending right after the frontier
//!     ──▶ [general]      top-N from the (possibly fuzzy) frontier
//! ```
//!
//! # Invariants
//!
//! - A failed `build` or `load` leaves the previous state untouched.
//! - Results never repeat a surface form.
//! - Apart from a promoted exact match, results come out heaviest first.
//!
//! A built suggester is immutable, so `lookup` takes `&self` and concurrent
//! lookups need no locking.

mod strategy;

pub use strategy::*;

use std::collections::HashSet;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::analysis::Analyzer;
use crate::automaton::{
    determinize_scaled, finite_strings, is_finite, replace_sep, Automaton, HOLE_LABEL, SEP_LABEL,
};
use crate::binary::{read_varint, write_varint};
use crate::build::{
    assemble_fst, decode_output_bytes, decode_weight, encode_weight, BuildRecord, ExternalSorter,
    END_BYTE, MAX_ANALYZED_LEN, MAX_SURFACE_LEN,
};
use crate::config::{FuzzyConfig, SuggesterConfig};
use crate::error::{Result, SuggestError};
use crate::fst::{Fst, FstBuilder, Output};
use crate::search::{intersect_prefix_paths, TopNSearcher};
use crate::types::{Entry, LookupResult};

/// Everything a build (or load) produces.
#[derive(Debug, Clone)]
struct Built {
    fst: Fst,
    has_payloads: bool,
    /// Most analyzed paths any single entry produced.
    max_analyzed_paths: usize,
}

/// Suggests completions for partially typed text.
///
/// The index analyzer runs once per entry at build time, the query analyzer
/// once per lookup. Matching is exact on analyzed forms, or typo tolerant
/// when constructed with [`AnalyzingSuggester::fuzzy`].
#[derive(Debug, Clone)]
pub struct AnalyzingSuggester {
    index_analyzer: Arc<dyn Analyzer>,
    query_analyzer: Arc<dyn Analyzer>,
    config: SuggesterConfig,
    strategy: MatchStrategy,
    count: u64,
    built: Option<Built>,
}

impl AnalyzingSuggester {
    /// An exact suggester.
    pub fn new(
        index_analyzer: Arc<dyn Analyzer>,
        query_analyzer: Arc<dyn Analyzer>,
        config: SuggesterConfig,
    ) -> Result<Self> {
        Self::with_strategy(index_analyzer, query_analyzer, config, MatchStrategy::Exact)
    }

    /// A typo-tolerant suggester.
    pub fn fuzzy(
        index_analyzer: Arc<dyn Analyzer>,
        query_analyzer: Arc<dyn Analyzer>,
        config: SuggesterConfig,
        fuzzy: FuzzyConfig,
    ) -> Result<Self> {
        fuzzy.validate()?;
        Self::with_strategy(
            index_analyzer,
            query_analyzer,
            config,
            MatchStrategy::Fuzzy(fuzzy),
        )
    }

    pub fn with_strategy(
        index_analyzer: Arc<dyn Analyzer>,
        query_analyzer: Arc<dyn Analyzer>,
        config: SuggesterConfig,
        strategy: MatchStrategy,
    ) -> Result<Self> {
        config.validate()?;
        if let MatchStrategy::Fuzzy(fuzzy) = &strategy {
            fuzzy.validate()?;
        }
        Ok(Self {
            index_analyzer,
            query_analyzer,
            config,
            strategy,
            count: 0,
            built: None,
        })
    }

    pub fn config(&self) -> &SuggesterConfig {
        &self.config
    }

    pub fn strategy(&self) -> &MatchStrategy {
        &self.strategy
    }

    /// Entries accepted by the last successful build (or load).
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the stored outputs carry payloads.
    pub fn has_payloads(&self) -> bool {
        self.built.as_ref().is_some_and(|b| b.has_payloads)
    }

    /// Most analyzed paths any single entry produced.
    pub fn max_analyzed_paths(&self) -> usize {
        self.built.as_ref().map_or(0, |b| b.max_analyzed_paths)
    }

    /// The built FST, if any.
    pub fn fst(&self) -> Option<&Fst> {
        self.built.as_ref().map(|b| &b.fst)
    }

    /// Heap bytes held by the FST.
    pub fn ram_bytes_used(&self) -> usize {
        self.fst().map_or(0, Fst::ram_bytes_used)
    }

    /// Replace the suggester's contents with `entries`.
    ///
    /// Every entry is validated before it is sorted; the first bad entry
    /// fails the whole build and the previous contents stay live.
    pub fn build<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        let started = Instant::now();
        let ts2a = self
            .strategy
            .token_stream_to_automaton(self.config.preserve_position_increments);
        let limit = self.config.graph_expansion_limit();

        let mut sorter: Option<ExternalSorter> = None;
        let mut has_payloads: Option<bool> = None;
        let mut count = 0u64;
        let mut max_analyzed_paths = 0usize;
        let mut record = Vec::new();

        for entry in entries {
            if entry.contexts.is_some() {
                return Err(SuggestError::Unsupported("contexts"));
            }
            if !(0..=i64::from(i32::MAX)).contains(&entry.weight) {
                return Err(SuggestError::invalid_input(format!(
                    "weight {} of {:?} is outside 0..={}",
                    entry.weight,
                    entry.surface,
                    i32::MAX
                )));
            }
            let payloads = *has_payloads.get_or_insert(entry.payload.is_some());
            if payloads != entry.payload.is_some() {
                return Err(SuggestError::invalid_input(
                    "either all entries carry a payload or none do",
                ));
            }
            let surface = entry.surface.as_bytes();
            if surface.len() > MAX_SURFACE_LEN {
                return Err(SuggestError::invalid_input(format!(
                    "surface form is {} bytes, limit is {}",
                    surface.len(),
                    MAX_SURFACE_LEN
                )));
            }
            // 0x1F doubles as the payload separator in stored outputs.
            if surface.iter().copied().any(is_reserved) {
                return Err(SuggestError::invalid_input(format!(
                    "surface form {:?} contains reserved byte 0x1E or 0x1F",
                    entry.surface
                )));
            }

            let stream = self.index_analyzer.analyze(&entry.surface);
            if stream
                .tokens
                .iter()
                .any(|token| token.term.iter().copied().any(is_reserved))
            {
                return Err(SuggestError::invalid_input(format!(
                    "analysis of {:?} produced a term with reserved byte 0x1E or 0x1F",
                    entry.surface
                )));
            }
            let automaton = replace_sep(&ts2a.to_automaton(&stream), self.config.preserve_sep);
            let automaton = self.strategy.convert_automaton(automaton)?;
            let paths = analyzed_paths(&automaton, limit, &entry.surface)?;
            max_analyzed_paths = max_analyzed_paths.max(paths.len());

            let sorter = sorter.get_or_insert_with(|| {
                ExternalSorter::new(
                    self.config.sort_buffer_bytes,
                    self.config.temp_dir.as_deref(),
                    payloads,
                )
            });
            let cost = encode_weight(entry.weight);
            for analyzed in &paths {
                record.clear();
                BuildRecord {
                    analyzed,
                    cost,
                    surface,
                    payload: entry.payload.as_deref(),
                }
                .encode(&mut record);
                sorter.push(record.clone())?;
            }
            count += 1;
        }

        let has_payloads = has_payloads.unwrap_or(false);
        let (fst, spilled_runs) = match sorter {
            Some(sorter) => {
                let spilled_runs = sorter.spilled_runs();
                let fst = assemble_fst(
                    sorter.finish()?,
                    has_payloads,
                    self.config.max_surface_forms_per_analyzed_form,
                )?;
                (fst, spilled_runs)
            }
            None => (FstBuilder::new().finish(), 0),
        };

        info!(
            entries = count,
            keys = fst.len(),
            nodes = fst.num_nodes(),
            max_analyzed_paths,
            spilled_runs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built suggester"
        );

        self.count = count;
        self.built = Some(Built {
            fst,
            has_payloads,
            max_analyzed_paths,
        });
        Ok(())
    }

    /// Top `num` completions for `key`.
    pub fn lookup(&self, key: &str, num: usize) -> Result<Vec<LookupResult>> {
        self.lookup_with(key, None, false, num)
    }

    /// Lookup with the full argument list. Contexts and `only_more_popular`
    /// are part of the interface but rejected.
    pub fn lookup_with(
        &self,
        key: &str,
        contexts: Option<&[Vec<u8>]>,
        only_more_popular: bool,
        num: usize,
    ) -> Result<Vec<LookupResult>> {
        if contexts.is_some() {
            return Err(SuggestError::Unsupported("contexts"));
        }
        if only_more_popular {
            return Err(SuggestError::Unsupported("onlyMorePopular"));
        }
        if num == 0 {
            return Err(SuggestError::invalid_input("num must be at least 1"));
        }
        if key.bytes().any(is_reserved) {
            return Err(SuggestError::invalid_input(
                "lookup key contains reserved character 0x1E or 0x1F",
            ));
        }
        let Some(built) = &self.built else {
            return Ok(Vec::new());
        };
        let fst = &built.fst;

        let lookup_automaton = self.lookup_automaton(key)?;
        let exact_automaton = self.strategy.convert_automaton(lookup_automaton.clone())?;
        let prefix_paths = intersect_prefix_paths(&exact_automaton, fst);
        trace!(key, paths = prefix_paths.len(), "exact frontier");

        let max_surface_forms = self.config.max_surface_forms_per_analyzed_form as usize;
        let mut results = Vec::with_capacity(num);
        let mut exact_surface: Option<Vec<u8>> = None;

        if self.config.exact_first {
            let ends: Vec<_> = prefix_paths
                .iter()
                .filter_map(|path| fst.find_arc(path.node, END_BYTE).map(|arc| (path, arc)))
                .collect();
            let top_n = ends.len() * max_surface_forms;
            if top_n > 0 {
                let mut searcher = TopNSearcher::new(fst, top_n, top_n, |_: &[u8], _: &Output| true);
                for (path, arc) in ends {
                    let mut input = path.input.clone();
                    input.push(END_BYTE);
                    searcher.add_start_path(arc.target, path.output.append(arc.output), input);
                }
                for completion in searcher.search().results {
                    let (surface, _) =
                        decode_output_bytes(&completion.output.bytes, built.has_payloads);
                    if surface == key.as_bytes() {
                        exact_surface = Some(surface.to_vec());
                        results.push(to_result(&completion.output, built.has_payloads));
                        break;
                    }
                }
            }
            if results.len() == num {
                return Ok(results);
            }
        }

        let prefix_paths = self
            .strategy
            .full_prefix_paths(prefix_paths, &lookup_automaton, fst)?;
        trace!(key, paths = prefix_paths.len(), "full frontier");

        let mut seen: HashSet<Vec<u8>> = HashSet::new();
        let has_payloads = built.has_payloads;
        let accept = |_: &[u8], output: &Output| {
            let (surface, _) = decode_output_bytes(&output.bytes, has_payloads);
            // Skips only the surface the exact pass returned, not every exact match.
            if exact_surface.as_deref() == Some(surface) {
                return false;
            }
            seen.insert(surface.to_vec())
        };
        let max_queue_depth = num.saturating_mul(built.max_analyzed_paths.max(1));
        let mut searcher = TopNSearcher::new(fst, num - results.len(), max_queue_depth, accept);
        for path in prefix_paths {
            searcher.add_start_path(path.node, path.output, path.input);
        }
        let top = searcher.search();
        if !top.is_complete {
            debug!(
                key,
                max_queue_depth, "queue overflowed, results may be incomplete"
            );
        }
        results.extend(
            top.results
                .iter()
                .map(|r| to_result(&r.output, built.has_payloads)),
        );
        Ok(results)
    }

    fn lookup_automaton(&self, key: &str) -> Result<Automaton> {
        let stream = self.query_analyzer.analyze(key);
        let automaton = self
            .strategy
            .token_stream_to_automaton(self.config.preserve_position_increments)
            .to_automaton(&stream);
        let automaton = replace_sep(&automaton, self.config.preserve_sep);
        determinize_scaled(automaton)
    }

    /// Persist the suggester. Returns `false` (after writing only the entry
    /// count) when nothing has been built yet.
    ///
    /// ```text
    /// varint   entry count
    /// FST      see fst::codec
    /// varint   max analyzed paths per entry
    /// u8       has payloads (0 or 1)
    /// ```
    pub fn store<W: Write>(&self, w: &mut W) -> Result<bool> {
        write_varint(w, self.count)?;
        let Some(built) = &self.built else {
            return Ok(false);
        };
        let fst_bytes = built.fst.write_to(w)?;
        write_varint(w, built.max_analyzed_paths as u64)?;
        w.write_all(&[u8::from(built.has_payloads)])?;
        debug!(entries = self.count, fst_bytes, "stored suggester");
        Ok(true)
    }

    /// Replace the suggester's contents with data written by [`store`](Self::store).
    pub fn load<R: Read>(&mut self, r: &mut R) -> Result<()> {
        let count = read_varint(r).map_err(SuggestError::from_read)?;
        let fst = Fst::read_from(r)?;
        let max_analyzed_paths = read_varint(r).map_err(SuggestError::from_read)?;
        let max_analyzed_paths = usize::try_from(max_analyzed_paths).map_err(|_| {
            SuggestError::corrupt(format!("max analyzed paths {} too large", max_analyzed_paths))
        })?;
        let mut flag = [0u8; 1];
        r.read_exact(&mut flag).map_err(SuggestError::from_read)?;
        let has_payloads = match flag[0] {
            0 => false,
            1 => true,
            other => {
                return Err(SuggestError::corrupt(format!(
                    "payload flag must be 0 or 1 (got {})",
                    other
                )))
            }
        };

        debug!(
            entries = count,
            keys = fst.len(),
            has_payloads,
            "loaded suggester"
        );
        self.count = count;
        self.built = Some(Built {
            fst,
            has_payloads,
            max_analyzed_paths,
        });
        Ok(())
    }
}

/// Byte strings accepted by one entry's analyzed automaton.
fn analyzed_paths(a: &Automaton, limit: Option<usize>, surface: &str) -> Result<Vec<Vec<u8>>> {
    if !is_finite(a) {
        return Err(SuggestError::invalid_input(format!(
            "analysis of {:?} produced a cyclic token graph",
            surface
        )));
    }
    let expanded = finite_strings(a, limit);
    if expanded.truncated {
        warn!(
            surface,
            limit = limit.unwrap_or(usize::MAX),
            "analyzed paths truncated at maxGraphExpansions"
        );
    }

    expanded
        .strings
        .into_iter()
        .map(|labels| {
            if labels.len() > MAX_ANALYZED_LEN {
                return Err(SuggestError::invalid_input(format!(
                    "analyzed form of {:?} is {} bytes, limit is {}",
                    surface,
                    labels.len(),
                    MAX_ANALYZED_LEN
                )));
            }
            labels
                .into_iter()
                .map(|label| match u8::try_from(label) {
                    Ok(byte) if byte != END_BYTE => Ok(byte),
                    _ => Err(SuggestError::invalid_input(format!(
                        "analyzed form of {:?} contains label {:#x}",
                        surface, label
                    ))),
                })
                .collect()
        })
        .collect()
}

/// Separator and hole markers share label values with these bytes.
fn is_reserved(byte: u8) -> bool {
    u32::from(byte) == SEP_LABEL || u32::from(byte) == HOLE_LABEL
}

fn to_result(output: &Output, has_payloads: bool) -> LookupResult {
    let (surface, payload) = decode_output_bytes(&output.bytes, has_payloads);
    LookupResult {
        key: String::from_utf8_lossy(surface).into_owned(),
        weight: decode_weight(output.cost),
        payload: payload.map(<[u8]>::to_vec),
    }
}
