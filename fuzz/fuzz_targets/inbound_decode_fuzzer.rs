//! Fuzz target for the inbound wire codec
//!
//! # Invariants
//!
//! - `decode_inbound` NEVER panics on arbitrary bytes
//! - Anything that decodes re-encodes to an equivalent event

#![no_main]

use libfuzzer_sys::fuzz_target;

use chatbox_proto::{Inbound, decode_inbound};

fuzz_target!(|data: &[u8]| {
    let Ok(event) = decode_inbound(data) else {
        return;
    };

    // Decoded events must survive a JSON round trip unchanged.
    let bytes = serde_json::to_vec(&event).expect("re-encode decoded event");
    let again: Inbound = serde_json::from_slice(&bytes).expect("decode own encoding");
    assert_eq!(event, again);
});
