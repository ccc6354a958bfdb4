//! Curve25519 keys and Diffie-Hellman agreement
//!
//! Public keys order by their raw 32-byte encoding read as an unsigned
//! big-endian integer. Session bootstrap relies on that order to pick the
//! initiating party without a round trip.

use std::fmt;

use x25519_dalek::StaticSecret;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;

/// Length of a raw Curve25519 key (public point or private scalar)
pub const KEY_LENGTH: usize = 32;

/// Type prefix of a serialized Curve25519 public key
pub const DJB_TYPE: u8 = 0x05;

/// Length of a serialized public key including its type prefix
pub const SERIALIZED_PUBLIC_KEY_LENGTH: usize = KEY_LENGTH + 1;

/// A Curve25519 public key.
///
/// `Ord` compares the raw encoding byte by byte, which is the same as
/// comparing the points as unsigned big-endian integers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; KEY_LENGTH]);

impl PublicKey {
    /// Wrap a raw 32-byte point.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw 32-byte point.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Serialize as `DJB_TYPE || point`.
    pub fn serialize(&self) -> [u8; SERIALIZED_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; SERIALIZED_PUBLIC_KEY_LENGTH];
        out[0] = DJB_TYPE;
        out[1..].copy_from_slice(&self.0);
        out
    }

    /// Parse a public key from its typed 33-byte form or its raw 32-byte
    /// form.
    ///
    /// # Errors
    ///
    /// - `BadKeyType`: 33 bytes whose first byte is not [`DJB_TYPE`]
    /// - `InvalidKeyLength`: any other length
    pub fn deserialize(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw = match bytes.len() {
            SERIALIZED_PUBLIC_KEY_LENGTH => {
                if bytes[0] != DJB_TYPE {
                    return Err(CryptoError::BadKeyType(bytes[0]));
                }
                &bytes[1..]
            },
            KEY_LENGTH => bytes,
            actual => {
                return Err(CryptoError::InvalidKeyLength {
                    expected: SERIALIZED_PUBLIC_KEY_LENGTH,
                    actual,
                });
            },
        };

        let mut point = [0u8; KEY_LENGTH];
        point.copy_from_slice(raw);
        Ok(Self(point))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

/// A Curve25519 private scalar. Zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey(StaticSecret);

impl PrivateKey {
    /// Wrap raw scalar bytes. Clamping happens inside the agreement.
    ///
    /// The by-value copy of `bytes` is zeroized once the secret owns it.
    pub fn from_bytes(mut bytes: [u8; KEY_LENGTH]) -> Self {
        let secret = StaticSecret::from(bytes);
        bytes.zeroize();
        Self(secret)
    }

    /// Public point for this scalar.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(x25519_dalek::PublicKey::from(&self.0).to_bytes())
    }

    /// Compute the X25519 shared secret with `their_key`.
    ///
    /// # Errors
    ///
    /// - `NonContributory`: `their_key` is a low-order point and the shared
    ///   secret carries no contribution from our scalar
    pub fn calculate_agreement(
        &self,
        their_key: &PublicKey,
    ) -> Result<Zeroizing<[u8; KEY_LENGTH]>, CryptoError> {
        let shared = self.0.diffie_hellman(&x25519_dalek::PublicKey::from(their_key.0));
        if !shared.was_contributory() {
            return Err(CryptoError::NonContributory);
        }

        Ok(Zeroizing::new(shared.to_bytes()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A Curve25519 key pair.
#[derive(Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl KeyPair {
    /// Build a key pair from raw scalar bytes, deriving the public point.
    pub fn from_private_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self::from_private_key(PrivateKey::from_bytes(bytes))
    }

    /// Build a key pair from stored halves.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` / `BadKeyType`: `public_key` fails to parse
    /// - `MismatchedKeyPair`: `public_key` is not the point for `private_key`
    pub fn from_bytes(
        private_key: [u8; KEY_LENGTH],
        public_key: &[u8],
    ) -> Result<Self, CryptoError> {
        let claimed = PublicKey::deserialize(public_key)?;
        let pair = Self::from_private_bytes(private_key);
        if pair.public_key != claimed {
            return Err(CryptoError::MismatchedKeyPair);
        }
        Ok(pair)
    }

    fn from_private_key(private_key: PrivateKey) -> Self {
        Self { public_key: private_key.public_key(), private_key }
    }

    /// Public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Private half.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Agreement between our private key and `their_key`.
    pub fn calculate_agreement(
        &self,
        their_key: &PublicKey,
    ) -> Result<Zeroizing<[u8; KEY_LENGTH]>, CryptoError> {
        self.private_key.calculate_agreement(their_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key)
            .finish()
    }
}
