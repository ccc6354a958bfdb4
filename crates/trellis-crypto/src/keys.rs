//! Root and chain keys of the Double Ratchet key hierarchy
//!
//! # Security Properties
//!
//! - Forward Secrecy: [`RootKey::create_chain`] consumes the old root key,
//!   and key bytes are zeroized on drop
//! - Domain Separation: the initial derivation and chain creation use
//!   distinct HKDF labels

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{
    curve::{KEY_LENGTH, KeyPair, PublicKey},
    error::CryptoError,
    kdf::{WHISPER_RATCHET_INFO, WHISPER_TEXT_INFO, derive_secrets},
};

type HmacSha256 = Hmac<Sha256>;

/// Length of the root || chain output of one derivation
pub const DERIVED_SECRETS_LENGTH: usize = 2 * KEY_LENGTH;

/// HMAC input for deriving the next chain key
const CHAIN_KEY_SEED: &[u8] = &[0x02];

/// Secret seed for the Diffie-Hellman half of the ratchet.
pub struct RootKey {
    key: [u8; KEY_LENGTH],
}

impl RootKey {
    /// Wrap 32 bytes of root key material.
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Raw key bytes.
    pub fn key(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Perform one Diffie-Hellman ratchet step.
    ///
    /// Agrees `our_ratchet_key` with `their_ratchet_key`, then runs HKDF with
    /// this root key as salt. The output splits into the next root key and a
    /// fresh chain key at index 0. `self` is consumed so the old root key
    /// cannot be used twice.
    pub fn create_chain(
        self,
        their_ratchet_key: &PublicKey,
        our_ratchet_key: &KeyPair,
    ) -> Result<(Self, ChainKey), CryptoError> {
        let shared_secret = our_ratchet_key.calculate_agreement(their_ratchet_key)?;

        let derived = derive_secrets(
            shared_secret.as_slice(),
            Some(self.key.as_slice()),
            WHISPER_RATCHET_INFO,
            DERIVED_SECRETS_LENGTH,
        )?;

        Ok(split_derived(&derived))
    }
}

impl Drop for RootKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootKey([REDACTED])")
    }
}

/// Head of a symmetric ratchet chain.
pub struct ChainKey {
    key: [u8; KEY_LENGTH],
    index: u32,
}

impl ChainKey {
    /// Wrap 32 bytes of chain key material at `index`.
    pub fn new(key: [u8; KEY_LENGTH], index: u32) -> Self {
        Self { key, index }
    }

    /// Raw key bytes.
    pub fn key(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Position in the chain. Starts at 0.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Derive the chain key one step further along the chain.
    pub fn next_chain_key(&self) -> Result<Self, CryptoError> {
        if self.index == u32::MAX {
            return Err(CryptoError::ChainIndexOverflow { current: self.index });
        }

        let Ok(mut mac) = HmacSha256::new_from_slice(&self.key) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        mac.update(CHAIN_KEY_SEED);
        let result = mac.finalize().into_bytes();

        let mut next = Self::new([0u8; KEY_LENGTH], self.index + 1);
        next.key.copy_from_slice(&result);
        Ok(next)
    }
}

impl Drop for ChainKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainKey").field("index", &self.index).finish_non_exhaustive()
    }
}

/// Root and chain key produced directly from an X3DH secret.
#[derive(Debug)]
pub struct DerivedKeys {
    /// First 32 bytes of the derivation
    pub root_key: RootKey,
    /// Last 32 bytes of the derivation, at chain index 0
    pub chain_key: ChainKey,
}

impl DerivedKeys {
    /// Run the initial derivation over a concatenated agreement secret.
    ///
    /// No salt, label `"WhisperText"`, 64 bytes of output.
    pub fn from_secret_input(secret_input: &[u8]) -> Result<Self, CryptoError> {
        let derived =
            derive_secrets(secret_input, None, WHISPER_TEXT_INFO, DERIVED_SECRETS_LENGTH)?;

        let (root_key, chain_key) = split_derived(&derived);
        Ok(Self { root_key, chain_key })
    }
}

// Derived bytes go straight into the zeroize-on-drop key types.
fn split_derived(derived: &[u8]) -> (RootKey, ChainKey) {
    let mut root_key = RootKey::new([0u8; KEY_LENGTH]);
    let mut chain_key = ChainKey::new([0u8; KEY_LENGTH], 0);
    root_key.key.copy_from_slice(&derived[..KEY_LENGTH]);
    chain_key.key.copy_from_slice(&derived[KEY_LENGTH..DERIVED_SECRETS_LENGTH]);
    (root_key, chain_key)
}
