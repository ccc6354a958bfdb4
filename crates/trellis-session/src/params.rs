//! Key material each role needs to bootstrap a session.
//!
//! Bundles are plain structs with named fields, built in one step and
//! consumed by a single initialization. `validate()` runs before any
//! Diffie-Hellman and rejects material that would make the handshake
//! degenerate.

use trellis_crypto::{KeyPair, PublicKey};

use crate::{
    error::SessionError,
    role::{Role, resolve_role},
};

/// Key material for the initiating party.
#[derive(Debug, Clone)]
pub struct InitiatorParameters {
    /// Our long-term identity key pair
    pub our_identity_key_pair: KeyPair,
    /// Our ephemeral base key pair
    pub our_base_key_pair: KeyPair,
    /// Peer's long-term identity key
    pub their_identity_key: PublicKey,
    /// Peer's signed prekey
    pub their_signed_pre_key: PublicKey,
    /// Peer's first ratchet key
    pub their_ratchet_key: PublicKey,
    /// Peer's one-time prekey, when the bundle carried one
    pub their_one_time_pre_key: Option<PublicKey>,
}

impl InitiatorParameters {
    /// Reject degenerate key material.
    pub fn validate(&self) -> Result<(), SessionError> {
        let invalid = |reason| SessionError::InvalidParameters { role: Role::Initiator, reason };

        if self.our_base_key_pair.public_key() == self.our_identity_key_pair.public_key() {
            return Err(invalid("base key reuses identity key"));
        }
        if self.their_one_time_pre_key == Some(self.their_signed_pre_key) {
            return Err(invalid("one-time prekey duplicates signed prekey"));
        }
        if self.their_signed_pre_key == *self.our_base_key_pair.public_key() {
            return Err(invalid("peer signed prekey reflects our base key"));
        }
        Ok(())
    }
}

/// Key material for the responding party.
#[derive(Debug, Clone)]
pub struct ResponderParameters {
    /// Our long-term identity key pair
    pub our_identity_key_pair: KeyPair,
    /// Our signed prekey pair
    pub our_signed_pre_key_pair: KeyPair,
    /// Our one-time prekey pair, when the peer used one
    pub our_one_time_pre_key_pair: Option<KeyPair>,
    /// Our first ratchet key pair. In the prekey flow this is the signed
    /// prekey pair.
    pub our_ratchet_key_pair: KeyPair,
    /// Peer's long-term identity key
    pub their_identity_key: PublicKey,
    /// Peer's ephemeral base key
    pub their_base_key: PublicKey,
}

impl ResponderParameters {
    /// Reject degenerate key material.
    pub fn validate(&self) -> Result<(), SessionError> {
        let invalid = |reason| SessionError::InvalidParameters { role: Role::Responder, reason };
        let signed_pre_key = self.our_signed_pre_key_pair.public_key();

        if signed_pre_key == self.our_identity_key_pair.public_key() {
            return Err(invalid("signed prekey reuses identity key"));
        }
        if let Some(one_time) = &self.our_one_time_pre_key_pair
            && one_time.public_key() == signed_pre_key
        {
            return Err(invalid("one-time prekey duplicates signed prekey"));
        }
        if self.their_base_key == *signed_pre_key {
            return Err(invalid("peer base key reflects our signed prekey"));
        }
        Ok(())
    }
}

/// Key material for a party that does not yet know its role.
///
/// Both parties exchange base, ratchet and identity keys, then each runs
/// [`into_role`](Self::into_role) to project this superset onto the role
/// the base keys assign it. A missing signed prekey is played by the base
/// key, so one key can fill two semantic roles across the two cascades.
#[derive(Debug, Clone)]
pub struct SymmetricParameters {
    /// Our ephemeral base key pair
    pub our_base_key_pair: KeyPair,
    /// Our long-term identity key pair
    pub our_identity_key_pair: KeyPair,
    /// Our first ratchet key pair (used when we respond)
    pub our_ratchet_key_pair: KeyPair,
    /// Our signed prekey pair; defaults to the base key pair
    pub our_signed_pre_key_pair: Option<KeyPair>,
    /// Our one-time prekey pair (used when we respond)
    pub our_one_time_pre_key_pair: Option<KeyPair>,
    /// Peer's long-term identity key
    pub their_identity_key: PublicKey,
    /// Peer's ephemeral base key
    pub their_base_key: PublicKey,
    /// Peer's first ratchet key (used when we initiate)
    pub their_ratchet_key: PublicKey,
    /// Peer's signed prekey; defaults to their base key
    pub their_signed_pre_key: Option<PublicKey>,
    /// Peer's one-time prekey (used when we initiate)
    pub their_one_time_pre_key: Option<PublicKey>,
}

/// Symmetric parameters projected onto a resolved role.
#[derive(Debug, Clone)]
pub enum RoleParameters {
    /// We initiate
    Initiator(InitiatorParameters),
    /// We respond
    Responder(ResponderParameters),
}

impl RoleParameters {
    /// Role these parameters were projected onto.
    pub fn role(&self) -> Role {
        match self {
            Self::Initiator(_) => Role::Initiator,
            Self::Responder(_) => Role::Responder,
        }
    }
}

impl SymmetricParameters {
    /// Resolve our role from the base keys and project onto it.
    ///
    /// # Errors
    ///
    /// - `AmbiguousRole`: both base keys are identical
    /// - `InvalidParameters`: the projected bundle fails validation
    pub fn into_role(self) -> Result<RoleParameters, SessionError> {
        let our_base_key = *self.our_base_key_pair.public_key();
        if our_base_key == self.their_base_key {
            return Err(SessionError::AmbiguousRole);
        }

        let projected = match resolve_role(&our_base_key, &self.their_base_key) {
            Role::Initiator => RoleParameters::Initiator(InitiatorParameters {
                our_identity_key_pair: self.our_identity_key_pair,
                our_base_key_pair: self.our_base_key_pair,
                their_identity_key: self.their_identity_key,
                their_signed_pre_key: self.their_signed_pre_key.unwrap_or(self.their_base_key),
                their_ratchet_key: self.their_ratchet_key,
                their_one_time_pre_key: self.their_one_time_pre_key,
            }),
            Role::Responder => RoleParameters::Responder(ResponderParameters {
                our_identity_key_pair: self.our_identity_key_pair,
                our_signed_pre_key_pair: self
                    .our_signed_pre_key_pair
                    .unwrap_or(self.our_base_key_pair),
                our_one_time_pre_key_pair: self.our_one_time_pre_key_pair,
                our_ratchet_key_pair: self.our_ratchet_key_pair,
                their_identity_key: self.their_identity_key,
                their_base_key: self.their_base_key,
            }),
        };

        match &projected {
            RoleParameters::Initiator(params) => params.validate()?,
            RoleParameters::Responder(params) => params.validate()?,
        }
        Ok(projected)
    }
}
