//! Trellis Cryptographic Primitives
//!
//! Building blocks for bootstrapping a Double Ratchet session: Curve25519
//! key pairs and agreement, HKDF-SHA256 derivation, and the root/chain keys
//! those derivations produce. Pure functions with deterministic outputs.
//! Callers supply randomness for key generation.
//!
//! # Key Hierarchy
//!
//! ```text
//! 0xFF * 32 || DH1 || DH2 || DH3 [|| DH4]
//!        │
//!        ▼ HKDF("WhisperText", 64)
//! RootKey || ChainKey[0]
//!        │
//!        ▼ RootKey::create_chain(DH(ratchet keys)), HKDF("WhisperRatchet", 64)
//! RootKey' || ChainKey'[0]
//! ```
//!
//! # Security
//!
//! - Root and chain keys are zeroized on drop and never printed by `Debug`
//! - Agreements against low-order points are rejected
//! - Creating a chain consumes the root key it was derived from

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod curve;
pub mod error;
pub mod kdf;
pub mod keys;

pub use curve::{KEY_LENGTH, KeyPair, PrivateKey, PublicKey};
pub use error::CryptoError;
pub use kdf::derive_secrets;
pub use keys::{ChainKey, DerivedKeys, RootKey};
