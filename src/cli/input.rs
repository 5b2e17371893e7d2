// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Entry file parsing.
//!
//! JSON lines look like `{"text": "New York", "weight": 100}` with an
//! optional string `payload`. TSV lines are `text<TAB>weight` with an
//! optional third payload column. Blank lines are skipped in both; any other
//! malformed line fails with its line number.

use std::io::BufRead;

use serde::Deserialize;

use wfst_suggest::{Entry, Result, SuggestError};

use super::InputFormat;

#[derive(Deserialize)]
struct JsonEntry {
    text: String,
    weight: i64,
    #[serde(default)]
    payload: Option<String>,
}

impl From<JsonEntry> for Entry {
    fn from(json: JsonEntry) -> Self {
        let entry = Entry::new(json.text, json.weight);
        match json.payload {
            Some(payload) => entry.with_payload(payload.into_bytes()),
            None => entry,
        }
    }
}

pub fn read_entries<R: BufRead>(reader: R, format: InputFormat) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let entry = match format {
            InputFormat::Jsonl => serde_json::from_str::<JsonEntry>(&line)
                .map(Entry::from)
                .map_err(|e| SuggestError::InvalidInput(format!("line {}: {}", line_no, e)))?,
            InputFormat::Tsv => parse_tsv(&line, line_no)?,
        };
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_tsv(line: &str, line_no: usize) -> Result<Entry> {
    let mut columns = line.splitn(3, '\t');
    let text = columns.next().unwrap_or_default();
    let weight = columns
        .next()
        .ok_or_else(|| SuggestError::InvalidInput(format!("line {}: missing weight column", line_no)))?;
    let weight: i64 = weight.trim().parse().map_err(|_| {
        SuggestError::InvalidInput(format!("line {}: weight {:?} is not an integer", line_no, weight))
    })?;
    let entry = Entry::new(text, weight);
    Ok(match columns.next() {
        Some(payload) => entry.with_payload(payload.as_bytes()),
        None => entry,
    })
}
