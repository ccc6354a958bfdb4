//! Session bootstrap: the X3DH agreement that seeds a Double Ratchet.
//!
//! Both parties concatenate the same Diffie-Hellman outputs, computed from
//! opposite sides, behind a block of discontinuity bytes:
//!
//! ```text
//!            initiator                      responder
//! DH1   identity  x signed prekey    signed prekey x identity
//! DH2   base      x identity         identity      x base
//! DH3   base      x signed prekey    signed prekey x base
//! DH4   base      x one-time prekey  one-time      x base     (optional)
//! ```
//!
//! HKDF over `0xFF * 32 || DH1 || DH2 || DH3 [|| DH4]` yields a root key and
//! chain key that are identical on both sides. The initiator already holds
//! the responder's first ratchet key, so it ratchets once more before
//! sending. The two parties therefore never share a ratchet position.
//!
//! Initialization stages every write in a [`PendingSession`] and commits it
//! only after all derivations succeed. On error the session is untouched.

use tracing::{debug, warn};
use trellis_crypto::{CryptoError, DerivedKeys, KEY_LENGTH, KeyPair, PublicKey};
use zeroize::Zeroizing;

use crate::{
    env::Environment,
    error::SessionError,
    params::{InitiatorParameters, ResponderParameters, RoleParameters, SymmetricParameters},
    role::Role,
    state::{PendingSession, SessionState},
};

/// Protocol version written into new sessions
pub const CURRENT_VERSION: u32 = 3;

/// Domain-separation prefix of the agreement secret
pub const DISCONTINUITY_BYTES: [u8; KEY_LENGTH] = [0xFF; KEY_LENGTH];

/// Discontinuity bytes plus at most four agreements
const MAX_SECRET_INPUT_LENGTH: usize = 5 * KEY_LENGTH;

/// Run the initiator's agreement cascade and derive the shared keys.
///
/// This is the output both parties agree on, before the initiator's extra
/// ratchet step.
pub fn derive_initiator_keys(params: &InitiatorParameters) -> Result<DerivedKeys, SessionError> {
    params.validate()?;
    initiator_cascade(params)
}

/// Run the responder's agreement cascade and derive the shared keys.
pub fn derive_responder_keys(params: &ResponderParameters) -> Result<DerivedKeys, SessionError> {
    params.validate()?;
    responder_cascade(params)
}

/// Initialize `state` as the initiating party.
///
/// Generates a fresh sending ratchet key from `env`, registers the derived
/// chain key as the receiving chain for the peer's ratchet key, and sends on
/// the chain produced by one extra ratchet step. Parameters are validated
/// before `env` is asked for randomness.
pub fn initialize_initiator_session<E: Environment>(
    state: &mut SessionState,
    params: &InitiatorParameters,
    env: &E,
) -> Result<(), SessionError> {
    params
        .validate()
        .inspect_err(|e| warn!(role = %Role::Initiator, error = %e, "session init failed"))?;

    initialize_validated_initiator(state, params, env)
}

/// Initialize `state` as the responding party.
///
/// Sends on the derived chain key directly with no extra ratchet step.
pub fn initialize_responder_session(
    state: &mut SessionState,
    params: &ResponderParameters,
) -> Result<(), SessionError> {
    params
        .validate()
        .inspect_err(|e| warn!(role = %Role::Responder, error = %e, "session init failed"))?;

    initialize_validated_responder(state, params)
}

/// Resolve our role from the base keys and initialize `state` for it.
///
/// Returns the role this party plays.
pub fn initialize_session<E: Environment>(
    state: &mut SessionState,
    params: SymmetricParameters,
    env: &E,
) -> Result<Role, SessionError> {
    // into_role validates the projected bundle
    let params = params
        .into_role()
        .inspect_err(|e| warn!(error = %e, "rejected session parameters"))?;

    let role = params.role();
    debug!(%role, "resolved session role");

    match params {
        RoleParameters::Initiator(params) => initialize_validated_initiator(state, &params, env)?,
        RoleParameters::Responder(params) => initialize_validated_responder(state, &params)?,
    }

    Ok(role)
}

fn initialize_validated_initiator<E: Environment>(
    state: &mut SessionState,
    params: &InitiatorParameters,
    env: &E,
) -> Result<(), SessionError> {
    let sending_ratchet_key = env.generate_key_pair();

    let pending = initiator_session(params, sending_ratchet_key)
        .inspect_err(|e| warn!(role = %Role::Initiator, error = %e, "session init failed"))?;

    commit(state, pending, Role::Initiator, params.their_one_time_pre_key.is_some())
}

fn initialize_validated_responder(
    state: &mut SessionState,
    params: &ResponderParameters,
) -> Result<(), SessionError> {
    let pending = responder_session(params)
        .inspect_err(|e| warn!(role = %Role::Responder, error = %e, "session init failed"))?;

    commit(state, pending, Role::Responder, params.our_one_time_pre_key_pair.is_some())
}

fn initiator_cascade(params: &InitiatorParameters) -> Result<DerivedKeys, SessionError> {
    let our_base_key = &params.our_base_key_pair;
    let mut secret_input = new_secret_input();

    append_agreement(
        &mut secret_input,
        &params.our_identity_key_pair,
        &params.their_signed_pre_key,
    )?;
    append_agreement(&mut secret_input, our_base_key, &params.their_identity_key)?;
    append_agreement(&mut secret_input, our_base_key, &params.their_signed_pre_key)?;
    if let Some(their_one_time_pre_key) = &params.their_one_time_pre_key {
        append_agreement(&mut secret_input, our_base_key, their_one_time_pre_key)?;
    }

    Ok(DerivedKeys::from_secret_input(&secret_input)?)
}

fn responder_cascade(params: &ResponderParameters) -> Result<DerivedKeys, SessionError> {
    let our_signed_pre_key = &params.our_signed_pre_key_pair;
    let mut secret_input = new_secret_input();

    append_agreement(&mut secret_input, our_signed_pre_key, &params.their_identity_key)?;
    append_agreement(&mut secret_input, &params.our_identity_key_pair, &params.their_base_key)?;
    append_agreement(&mut secret_input, our_signed_pre_key, &params.their_base_key)?;
    if let Some(our_one_time_pre_key) = &params.our_one_time_pre_key_pair {
        append_agreement(&mut secret_input, our_one_time_pre_key, &params.their_base_key)?;
    }

    Ok(DerivedKeys::from_secret_input(&secret_input)?)
}

fn initiator_session(
    params: &InitiatorParameters,
    sending_ratchet_key: KeyPair,
) -> Result<PendingSession, SessionError> {
    let DerivedKeys { root_key, chain_key } = initiator_cascade(params)?;

    let (sending_root_key, sending_chain_key) =
        root_key.create_chain(&params.their_ratchet_key, &sending_ratchet_key)?;

    let mut pending = PendingSession::new();
    pending
        .set_protocol_version(CURRENT_VERSION)
        .set_remote_identity(params.their_identity_key)
        .set_local_identity(*params.our_identity_key_pair.public_key())
        .add_receiving_chain(params.their_ratchet_key, chain_key)
        .set_sending_chain(sending_ratchet_key, sending_chain_key)
        .set_root_key(sending_root_key);
    Ok(pending)
}

fn responder_session(params: &ResponderParameters) -> Result<PendingSession, SessionError> {
    let DerivedKeys { root_key, chain_key } = responder_cascade(params)?;

    let mut pending = PendingSession::new();
    pending
        .set_protocol_version(CURRENT_VERSION)
        .set_remote_identity(params.their_identity_key)
        .set_local_identity(*params.our_identity_key_pair.public_key())
        .set_sending_chain(params.our_ratchet_key_pair.clone(), chain_key)
        .set_root_key(root_key);
    Ok(pending)
}

fn commit(
    state: &mut SessionState,
    pending: PendingSession,
    role: Role,
    one_time_pre_key: bool,
) -> Result<(), SessionError> {
    state.commit(pending)?;

    debug!(
        %role,
        version = state.session_version(),
        one_time_pre_key,
        receiver_chains = state.receiver_chain_count(),
        "session initialized"
    );
    Ok(())
}

// Capacity covers the largest input so the buffer never reallocates and
// leaves an unzeroized copy behind.
fn new_secret_input() -> Zeroizing<Vec<u8>> {
    let mut secret_input = Zeroizing::new(Vec::with_capacity(MAX_SECRET_INPUT_LENGTH));
    secret_input.extend_from_slice(&DISCONTINUITY_BYTES);
    secret_input
}

fn append_agreement(
    secret_input: &mut Vec<u8>,
    ours: &KeyPair,
    theirs: &PublicKey,
) -> Result<(), CryptoError> {
    let agreement = ours.calculate_agreement(theirs)?;
    secret_input.extend_from_slice(agreement.as_slice());
    Ok(())
}
