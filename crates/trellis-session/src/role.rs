//! Deterministic role resolution between the two parties of a handshake.
//!
//! Both parties run the same comparison on the same two base keys, so they
//! agree on which of them initiates without exchanging a message.

use std::fmt;

use trellis_crypto::PublicKey;

/// Part a party plays in session bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Performs the extra ratchet step and registers a receiving chain
    Initiator,
    /// Sends on the derived chain key directly
    Responder,
}

impl Role {
    /// Role the other party plays.
    pub fn peer(self) -> Self {
        match self {
            Self::Initiator => Self::Responder,
            Self::Responder => Self::Initiator,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiator => f.write_str("initiator"),
            Self::Responder => f.write_str("responder"),
        }
    }
}

/// Decide our role from the two base keys.
///
/// The party whose base key sorts lower initiates. Callers reject equal
/// keys before resolving; on equal input this returns `Responder`.
pub fn resolve_role(our_base_key: &PublicKey, their_base_key: &PublicKey) -> Role {
    if our_base_key < their_base_key { Role::Initiator } else { Role::Responder }
}
