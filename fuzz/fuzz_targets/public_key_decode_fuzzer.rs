//! Fuzz target for public key decoding
//!
//! # Invariants
//!
//! - Decoding never panics
//! - Only 32- and 33-byte inputs decode
//! - A decoded key re-serializes to the typed form of the same point

#![no_main]

use libfuzzer_sys::fuzz_target;
use trellis_crypto::{curve::DJB_TYPE, PublicKey};

fuzz_target!(|data: &[u8]| {
    let Ok(key) = PublicKey::deserialize(data) else {
        return;
    };

    assert!(data.len() == 32 || data.len() == 33, "unexpected length decoded");

    let serialized = key.serialize();
    assert_eq!(serialized[0], DJB_TYPE);
    assert_eq!(&serialized[1..], &data[data.len() - 32..]);
    assert_eq!(PublicKey::deserialize(&serialized).ok(), Some(key));
});
