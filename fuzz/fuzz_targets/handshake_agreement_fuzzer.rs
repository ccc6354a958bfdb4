//! Fuzz target for X3DH session bootstrap
//!
//! Runs both halves of the handshake over arbitrary key material.
//!
//! # Strategy
//!
//! - Arbitrary private scalars for every key pair (including degenerate ones)
//! - Arbitrary raw peer points (including low-order points)
//! - With and without a one-time prekey
//!
//! # Invariants
//!
//! - Initialization never panics
//! - Failed initialization leaves the session untouched
//! - Successful reciprocal initialization derives matching chains
//! - The initiator's root key is the responder's root key ratcheted once

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trellis_crypto::{KeyPair, PublicKey, RootKey};
use trellis_session::{
    env::test_utils::MockEnv, initialize_initiator_session, initialize_responder_session,
    InitiatorParameters, ResponderParameters, SessionState,
};

#[derive(Debug, Clone, Arbitrary)]
struct HandshakeScenario {
    alice_identity: [u8; 32],
    alice_base: [u8; 32],
    bob_identity: [u8; 32],
    bob_signed_pre_key: [u8; 32],
    bob_one_time_pre_key: Option<[u8; 32]>,
    /// Seed for the initiator's sending ratchet key
    ratchet_seed: u64,
    /// Replace Bob's identity key as Alice sees it with a raw point
    forged_identity: Option<[u8; 32]>,
}

fuzz_target!(|scenario: HandshakeScenario| {
    let alice_identity = KeyPair::from_private_bytes(scenario.alice_identity);
    let alice_base = KeyPair::from_private_bytes(scenario.alice_base);
    let bob_identity = KeyPair::from_private_bytes(scenario.bob_identity);
    let bob_signed_pre_key = KeyPair::from_private_bytes(scenario.bob_signed_pre_key);
    let bob_one_time_pre_key = scenario.bob_one_time_pre_key.map(KeyPair::from_private_bytes);

    let their_identity_key = scenario
        .forged_identity
        .map_or(*bob_identity.public_key(), PublicKey::from_bytes);

    let alice_params = InitiatorParameters {
        our_identity_key_pair: alice_identity.clone(),
        our_base_key_pair: alice_base.clone(),
        their_identity_key,
        their_signed_pre_key: *bob_signed_pre_key.public_key(),
        their_ratchet_key: *bob_signed_pre_key.public_key(),
        their_one_time_pre_key: bob_one_time_pre_key.as_ref().map(|pair| *pair.public_key()),
    };
    let bob_params = ResponderParameters {
        our_identity_key_pair: bob_identity.clone(),
        our_signed_pre_key_pair: bob_signed_pre_key.clone(),
        our_one_time_pre_key_pair: bob_one_time_pre_key,
        our_ratchet_key_pair: bob_signed_pre_key,
        their_identity_key: *alice_identity.public_key(),
        their_base_key: *alice_base.public_key(),
    };

    let env = MockEnv::seeded(scenario.ratchet_seed);
    let mut alice = SessionState::new();
    let mut bob = SessionState::new();

    // INVARIANT 1: Initialization never panics
    let alice_result = initialize_initiator_session(&mut alice, &alice_params, &env);
    let bob_result = initialize_responder_session(&mut bob, &bob_params);

    // INVARIANT 2: Failure leaves the session untouched
    if alice_result.is_err() {
        assert!(!alice.is_initialized(), "failed init must not write state");
    }
    if bob_result.is_err() {
        assert!(!bob.is_initialized(), "failed init must not write state");
    }

    if alice_result.is_err() || bob_result.is_err() || scenario.forged_identity.is_some() {
        return;
    }

    // INVARIANT 3: Responder sends on the initiator's receiving chain
    let (Some(bob_sender), Some(alice_sender)) = (bob.sender_chain(), alice.sender_chain()) else {
        panic!("initialized sessions must have sending chains");
    };
    let alice_receiver = alice
        .receiver_chain_key(bob_sender.ratchet_key_pair().public_key())
        .expect("initiator must register the responder's ratchet key");
    assert_eq!(alice_receiver.key(), bob_sender.chain_key().key(), "chains must match");

    // INVARIANT 4: Initiator is exactly one ratchet step ahead
    let (Some(alice_root), Some(bob_root)) = (alice.root_key(), bob.root_key()) else {
        panic!("initialized sessions must have root keys");
    };
    if let Ok((caught_up, _)) = RootKey::new(*bob_root.key())
        .create_chain(alice_sender.ratchet_key_pair().public_key(), bob_sender.ratchet_key_pair())
    {
        assert_eq!(caught_up.key(), alice_root.key(), "responder must catch up in one step");
    }
});
