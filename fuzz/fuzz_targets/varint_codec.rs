// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the varint (LEB128) codec used by the FST body and the
//! suggester envelope.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wfst_suggest::binary::{decode_varint, encode_varint, read_varint};

fuzz_target!(|data: &[u8]| {
    let sliced = decode_varint(data);
    let streamed = read_varint(&mut &data[..]);

    // Both readers agree on what the prefix encodes.
    match (&sliced, &streamed) {
        (Ok((a, _)), Ok(b)) => assert_eq!(a, b, "slice and stream decoders disagree"),
        (Err(_), Err(_)) => {}
        _ => panic!("slice and stream decoders disagree on validity"),
    }

    if let Ok((value, consumed)) = sliced {
        assert!(consumed <= 10, "varint consumed {} bytes", consumed);
        assert!(consumed <= data.len());

        let mut reencoded = Vec::new();
        encode_varint(value, &mut reencoded);
        let (redecoded, reconsumed) =
            decode_varint(&reencoded).expect("re-encoded varint must decode");
        assert_eq!(value, redecoded);
        assert_eq!(reconsumed, reencoded.len());
    }
});
