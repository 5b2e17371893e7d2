// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! External sort for build records.
//!
//! Records accumulate in memory until the buffer passes its byte budget.
//! The buffer is then sorted and spilled to an anonymous temp file as one
//! run. `finish()` merges all runs with a k-way heap merge; if nothing was
//! ever spilled it just sorts in memory.
//!
//! Temp files come from `tempfile::tempfile_in`, which unlinks them as soon
//! as they are created. They disappear when dropped, whether the build
//! finishes, fails, or panics halfway through a merge.
//!
//! With the `parallel` feature each run is sorted with rayon. The order is
//! identical either way: records that compare equal are byte-identical.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;

use super::compare_records;

/// Sorts encoded build records, spilling to disk past a memory budget.
#[derive(Debug)]
pub struct ExternalSorter {
    buffer: Vec<Vec<u8>>,
    buffer_bytes: usize,
    limit: usize,
    runs: Vec<File>,
    temp_dir: PathBuf,
    has_payloads: bool,
    total: u64,
}

impl ExternalSorter {
    pub fn new(limit: usize, temp_dir: Option<&Path>, has_payloads: bool) -> Self {
        Self {
            buffer: Vec::new(),
            buffer_bytes: 0,
            limit,
            runs: Vec::new(),
            temp_dir: temp_dir.map_or_else(std::env::temp_dir, Path::to_path_buf),
            has_payloads,
            total: 0,
        }
    }

    /// Records pushed so far.
    pub fn len(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Runs spilled to disk so far.
    pub fn spilled_runs(&self) -> usize {
        self.runs.len()
    }

    pub fn push(&mut self, record: Vec<u8>) -> Result<()> {
        // Vec header plus contents
        self.buffer_bytes += record.len() + std::mem::size_of::<Vec<u8>>();
        self.buffer.push(record);
        self.total += 1;
        if self.buffer_bytes >= self.limit {
            self.spill()?;
        }
        Ok(())
    }

    fn sort_buffer(&mut self) {
        let has_payloads = self.has_payloads;
        #[cfg(feature = "parallel")]
        self.buffer
            .par_sort_unstable_by(|a, b| compare_records(a, b, has_payloads));
        #[cfg(not(feature = "parallel"))]
        self.buffer
            .sort_unstable_by(|a, b| compare_records(a, b, has_payloads));
    }

    fn spill(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.sort_buffer();

        let file = tempfile::tempfile_in(&self.temp_dir)?;
        let mut writer = BufWriter::new(file);
        for record in self.buffer.drain(..) {
            writer.write_all(&(record.len() as u32).to_le_bytes())?;
            writer.write_all(&record)?;
        }
        let mut file = writer.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(0))?;

        debug!(
            run = self.runs.len(),
            bytes = self.buffer_bytes,
            "spilled sorted run"
        );
        self.buffer_bytes = 0;
        self.runs.push(file);
        Ok(())
    }

    /// Sorted view of everything pushed.
    pub fn finish(mut self) -> Result<SortedRecords> {
        if self.runs.is_empty() {
            self.sort_buffer();
            return Ok(SortedRecords::Memory(self.buffer.into_iter()));
        }
        self.spill()?;

        let mut merger = RunMerger {
            readers: self.runs.into_iter().map(BufReader::new).collect(),
            heap: BinaryHeap::new(),
            has_payloads: self.has_payloads,
        };
        for run in 0..merger.readers.len() {
            merger.refill(run)?;
        }
        Ok(SortedRecords::Merge(merger))
    }
}

/// Records in sorted order, from memory or merged from disk.
#[derive(Debug)]
pub enum SortedRecords {
    Memory(std::vec::IntoIter<Vec<u8>>),
    Merge(RunMerger),
}

impl Iterator for SortedRecords {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SortedRecords::Memory(records) => records.next().map(Ok),
            SortedRecords::Merge(merger) => merger.next_record().transpose(),
        }
    }
}

#[derive(Debug)]
struct HeapEntry {
    record: Vec<u8>,
    run: usize,
    has_payloads: bool,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_records(&self.record, &other.record, self.has_payloads)
            .then(self.run.cmp(&other.run))
    }
}

/// K-way merge over sorted runs.
#[derive(Debug)]
pub struct RunMerger {
    readers: Vec<BufReader<File>>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    has_payloads: bool,
}

impl RunMerger {
    fn refill(&mut self, run: usize) -> Result<()> {
        if let Some(record) = read_record(&mut self.readers[run])? {
            self.heap.push(Reverse(HeapEntry {
                record,
                run,
                has_payloads: self.has_payloads,
            }));
        }
        Ok(())
    }

    fn next_record(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(Reverse(entry)) = self.heap.pop() else {
            return Ok(None);
        };
        self.refill(entry.run)?;
        Ok(Some(entry.record))
    }
}

fn read_record<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len = [0u8; 4];
    match reader.read_exact(&mut len) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }
    let mut record = vec![0u8; u32::from_le_bytes(len) as usize];
    reader.read_exact(&mut record)?;
    Ok(Some(record))
}
