//! Error types for Trellis cryptographic primitives

use thiserror::Error;

/// Errors from curve, KDF and chain-key operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Serialized key material has the wrong length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Serialized public key carries an unknown type prefix
    #[error("bad key type: {0:#04x}")]
    BadKeyType(u8),

    /// Public half of a key pair does not belong to the private half
    #[error("public key does not match private key")]
    MismatchedKeyPair,

    /// Diffie-Hellman produced the all-zero secret (low-order peer point)
    #[error("non-contributory key agreement")]
    NonContributory,

    /// HKDF cannot produce the requested number of bytes
    #[error("invalid KDF output length: {requested} (max {max})")]
    InvalidOutputLength {
        /// Requested output length
        requested: usize,
        /// Largest length HKDF-SHA256 can produce
        max: usize,
    },

    /// Chain key index would overflow
    #[error("chain key index overflow at {current}")]
    ChainIndexOverflow {
        /// Index of the chain key that could not advance
        current: u32,
    },
}

impl CryptoError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Decoding errors come from caller-supplied bytes and can be fixed by
    /// supplying correct material. Everything raised while a primitive is
    /// running is fatal.
    pub fn is_fatal(&self) -> bool {
        match self {
            // Caller supplied malformed key material
            Self::InvalidKeyLength { .. } => false,
            Self::BadKeyType(_) => false,
            Self::MismatchedKeyPair => false,

            // Primitive faults
            Self::NonContributory => true,
            Self::InvalidOutputLength { .. } => true,
            Self::ChainIndexOverflow { .. } => true,
        }
    }
}
