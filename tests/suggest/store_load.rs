//! Persisting a built suggester and reading it back.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};

use wfst_suggest::binary::encode_varint;
use wfst_suggest::{FstBuilder, Output, SuggestError, SuggesterConfig};

use crate::common::*;

fn stored_cities() -> Vec<u8> {
    let suggester = built(exact(standard(), SuggesterConfig::default()), cities());
    let mut bytes = Vec::new();
    assert!(suggester.store(&mut bytes).unwrap());
    bytes
}

#[test]
fn round_trip_through_a_file() {
    let suggester = built(exact(standard(), SuggesterConfig::default()), cities());
    let mut file = tempfile::tempfile().unwrap();
    {
        let mut writer = BufWriter::new(&mut file);
        assert!(suggester.store(&mut writer).unwrap());
        writer.flush().unwrap();
    }
    file.seek(SeekFrom::Start(0)).unwrap();

    let mut loaded = exact(standard(), SuggesterConfig::default());
    loaded.load(&mut BufReader::new(file)).unwrap();

    assert_eq!(loaded.count(), suggester.count());
    assert_eq!(loaded.max_analyzed_paths(), suggester.max_analyzed_paths());
    for key in ["n", "new", "new y", "newark", "b", "x"] {
        assert_eq!(
            loaded.lookup(key, 10).unwrap(),
            suggester.lookup(key, 10).unwrap(),
            "key {:?}",
            key
        );
    }
}

#[test]
fn named_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cities.wfst");
    let suggester = built(exact(keyword(), SuggesterConfig::default()), cities());
    suggester.store(&mut File::create(&path).unwrap()).unwrap();

    let mut loaded = exact(keyword(), SuggesterConfig::default());
    loaded.load(&mut File::open(&path).unwrap()).unwrap();
    assert_eq!(lookup_keys(&loaded, "new york", 2), vec!["new york", "new york city"]);
}

#[test]
fn unbuilt_suggester_stores_only_a_count() {
    let suggester = exact(keyword(), SuggesterConfig::default());
    let mut bytes = Vec::new();
    assert!(!suggester.store(&mut bytes).unwrap());
    assert_eq!(bytes, vec![0]);
}

#[test]
fn empty_build_round_trips() {
    let suggester = built(exact(keyword(), SuggesterConfig::default()), Vec::new());
    let mut bytes = Vec::new();
    assert!(suggester.store(&mut bytes).unwrap());

    let mut loaded = exact(keyword(), SuggesterConfig::default());
    loaded.load(&mut bytes.as_slice()).unwrap();
    assert_eq!(loaded.count(), 0);
    assert!(loaded.lookup("a", 5).unwrap().is_empty());
}

#[test]
fn truncated_data_is_corrupt() {
    let bytes = stored_cities();
    for cut in [1, bytes.len() / 2, bytes.len() - 1] {
        let mut loaded = exact(standard(), SuggesterConfig::default());
        let err = loaded.load(&mut &bytes[..cut]).unwrap_err();
        assert!(matches!(err, SuggestError::Corrupt(_)), "cut at {}: {}", cut, err);
    }
}

#[test]
fn flipped_body_byte_fails_the_checksum() {
    let mut bytes = stored_cities();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0xFF;
    let mut loaded = exact(standard(), SuggesterConfig::default());
    assert!(matches!(
        loaded.load(&mut bytes.as_slice()),
        Err(SuggestError::Corrupt(_))
    ));
}

#[test]
fn failed_load_keeps_previous_contents() {
    let mut suggester = built(exact(keyword(), no_exact_first()), cities());
    let before = suggester.lookup("n", 10).unwrap();
    let garbage = b"\x06not a suggester at all".to_vec();
    assert!(suggester.load(&mut garbage.as_slice()).is_err());
    assert_eq!(suggester.lookup("n", 10).unwrap(), before);
    assert_eq!(suggester.count(), 6);
}

#[test]
fn loading_replaces_built_contents() {
    let bytes = stored_cities();
    let mut suggester = built(
        exact(standard(), SuggesterConfig::default()),
        vec![wfst_suggest::Entry::new("oslo", 1)],
    );
    suggester.load(&mut bytes.as_slice()).unwrap();
    assert!(suggester.lookup("oslo", 5).unwrap().is_empty());
    assert_eq!(suggester.count(), 6);
}

fn envelope(fst: &wfst_suggest::Fst) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode_varint(1, &mut bytes);
    fst.write_to(&mut bytes).unwrap();
    encode_varint(1, &mut bytes);
    bytes.push(0);
    bytes
}

#[test]
fn out_of_range_cost_is_corrupt() {
    let mut builder = FstBuilder::new();
    builder
        .insert(b"ab\0\0", Output::new(1 << 63, &b"ab"[..]))
        .unwrap();
    let bytes = envelope(&builder.finish());

    let mut suggester = built(exact(keyword(), no_exact_first()), cities());
    let err = suggester.load(&mut bytes.as_slice()).unwrap_err();
    assert!(matches!(err, SuggestError::Corrupt(_)), "{}", err);
    assert_eq!(suggester.count(), 6);
}

#[test]
fn hand_written_store_loads() {
    let mut builder = FstBuilder::new();
    builder
        .insert(b"ab\0\0", Output::new(i64::from(i32::MAX - 9) as u64, &b"ab"[..]))
        .unwrap();
    let bytes = envelope(&builder.finish());

    let mut suggester = exact(keyword(), no_exact_first());
    suggester.load(&mut bytes.as_slice()).unwrap();
    let results = suggester.lookup("a", 1).unwrap();
    assert_eq!(keys(&results), ["ab"]);
    assert_eq!(weights(&results), [9]);
}
