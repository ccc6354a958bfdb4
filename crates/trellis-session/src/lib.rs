//! Trellis Session Bootstrap
//!
//! Derives the initial root and chain keys of a Double Ratchet session from
//! an X3DH-style agreement. Two parties holding identity, base, signed and
//! optional one-time key material each run their half of the handshake
//! locally and arrive at the same secrets without another round trip.
//!
//! # Flow
//!
//! ```text
//! SymmetricParameters
//!        │
//!        ▼ resolve_role(our base, their base)
//! InitiatorParameters ─────────────── ResponderParameters
//!        │                                   │
//!        ▼ DH cascade + HKDF                 ▼ DH cascade + HKDF
//! (RootKey, ChainKey)  ═══ identical ═══  (RootKey, ChainKey)
//!        │                                   │
//!        ▼ RootKey::create_chain             │
//! PendingSession                       PendingSession
//!        │                                   │
//!        ▼ SessionState::commit              ▼ SessionState::commit
//! ```
//!
//! # Guarantees
//!
//! - Initialization is all-or-nothing: any error leaves the session as it
//!   was
//! - Degenerate parameters are rejected before any Diffie-Hellman
//! - Primitive failures surface as [`FatalFault`] and are never retried
//! - Intermediate secrets live in zeroizing buffers and are dropped before
//!   returning

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod params;
pub mod ratchet;
pub mod role;
pub mod state;

pub use env::{Environment, SystemEnv};
pub use error::{FatalFault, SessionError};
pub use params::{InitiatorParameters, ResponderParameters, RoleParameters, SymmetricParameters};
pub use ratchet::{
    CURRENT_VERSION, DISCONTINUITY_BYTES, derive_initiator_keys, derive_responder_keys,
    initialize_initiator_session, initialize_responder_session, initialize_session,
};
pub use role::{Role, resolve_role};
pub use state::{MAX_RECEIVER_CHAINS, PendingSession, SenderChain, SessionState};
