//! Fixed-vector handshake scenario.
//!
//! Five deterministic key pairs plus a fixed sending ratchet key. Expected
//! values were computed with an independent X25519 / HKDF-SHA256
//! implementation.

#![allow(clippy::unwrap_used)]

use trellis_crypto::{KeyPair, PublicKey};
use trellis_session::{
    InitiatorParameters, ResponderParameters, Role, SessionState, SymmetricParameters,
    env::test_utils::MockEnv, initialize_initiator_session, initialize_responder_session,
    initialize_session, resolve_role,
};

const ALICE_IDENTITY: u8 = 0x11;
const ALICE_BASE: u8 = 0x22;
const BOB_IDENTITY: u8 = 0x33;
const BOB_SIGNED_PRE_KEY: u8 = 0x44;
const BOB_ONE_TIME_PRE_KEY: u8 = 0x55;
const ALICE_SENDING_RATCHET: u8 = 0x66;

fn pair(byte: u8) -> KeyPair {
    KeyPair::from_private_bytes([byte; 32])
}

fn public(byte: u8) -> PublicKey {
    *pair(byte).public_key()
}

fn hex_key(bytes: &[u8; 32]) -> String {
    hex::encode(bytes)
}

fn alice_params(one_time: bool) -> InitiatorParameters {
    InitiatorParameters {
        our_identity_key_pair: pair(ALICE_IDENTITY),
        our_base_key_pair: pair(ALICE_BASE),
        their_identity_key: public(BOB_IDENTITY),
        their_signed_pre_key: public(BOB_SIGNED_PRE_KEY),
        their_ratchet_key: public(BOB_SIGNED_PRE_KEY),
        their_one_time_pre_key: one_time.then(|| public(BOB_ONE_TIME_PRE_KEY)),
    }
}

fn bob_params(one_time: bool) -> ResponderParameters {
    ResponderParameters {
        our_identity_key_pair: pair(BOB_IDENTITY),
        our_signed_pre_key_pair: pair(BOB_SIGNED_PRE_KEY),
        our_one_time_pre_key_pair: one_time.then(|| pair(BOB_ONE_TIME_PRE_KEY)),
        our_ratchet_key_pair: pair(BOB_SIGNED_PRE_KEY),
        their_identity_key: public(ALICE_IDENTITY),
        their_base_key: public(ALICE_BASE),
    }
}

struct Expected {
    derived_root: &'static str,
    derived_chain: &'static str,
    alice_root: &'static str,
    alice_sending_chain: &'static str,
}

const WITH_ONE_TIME: Expected = Expected {
    derived_root: "c0688cd89849deb793a513585c76c4a8db9e3b5f3052bd9b693f563fd457fbf5",
    derived_chain: "30a2c2233752170f88a99c8a4916ffa29a878b03cf3d59c6137fc3ac651a9973",
    alice_root: "a10f8a562daa9fba22e03b115eb5270d19521d81c3e480a048fcb4ddcf590ddf",
    alice_sending_chain: "79ee758217a6958096a9ed7ed80eb6e4dbd27ffa61eb223526516cd4cd8c52ce",
};

const WITHOUT_ONE_TIME: Expected = Expected {
    derived_root: "8bc7bfcf7c654ec2530fd29fde6b7fde98c46044bca682be6796a2ad20bc852f",
    derived_chain: "457a3f61d3330e279c839682da3386ca23f8396d9b1d3c4558fa7be6f0fb22f7",
    alice_root: "9e909e49392b2fef552af8705f9a3e0b6c33553d5344096233229e48f97b1b65",
    alice_sending_chain: "1866be27e6ab1642c006df962ade1bbbdb3cdf2fb827462fc166a30358df1a17",
};

fn assert_sessions(alice: &SessionState, bob: &SessionState, expected: &Expected) {
    // Responder holds the derived keys directly
    assert_eq!(hex_key(bob.root_key().unwrap().key()), expected.derived_root);
    let bob_sender = bob.sender_chain().unwrap();
    assert_eq!(hex_key(bob_sender.chain_key().key()), expected.derived_chain);
    assert_eq!(bob_sender.ratchet_key_pair().public_key(), &public(BOB_SIGNED_PRE_KEY));

    // Initiator receives on the derived chain under Bob's ratchet key
    let alice_receiver = alice.receiver_chain_key(&public(BOB_SIGNED_PRE_KEY)).unwrap();
    assert_eq!(hex_key(alice_receiver.key()), expected.derived_chain);
    assert_eq!(alice_receiver.index(), 0);

    // ...and sends one ratchet step ahead
    assert_eq!(hex_key(alice.root_key().unwrap().key()), expected.alice_root);
    let alice_sender = alice.sender_chain().unwrap();
    assert_eq!(hex_key(alice_sender.chain_key().key()), expected.alice_sending_chain);
    assert_eq!(alice_sender.ratchet_key_pair().public_key(), &public(ALICE_SENDING_RATCHET));

    assert_eq!(alice.local_identity_key(), bob.remote_identity_key());
    assert_eq!(alice.remote_identity_key(), bob.local_identity_key());
    assert_eq!(alice.session_version(), 3);
    assert_eq!(bob.session_version(), 3);
}

#[test]
fn prekey_handshake_with_one_time_pre_key() {
    let env = MockEnv::fixed(ALICE_SENDING_RATCHET);
    let mut alice = SessionState::new();
    let mut bob = SessionState::new();

    initialize_initiator_session(&mut alice, &alice_params(true), &env).unwrap();
    initialize_responder_session(&mut bob, &bob_params(true)).unwrap();

    assert_sessions(&alice, &bob, &WITH_ONE_TIME);
}

#[test]
fn prekey_handshake_without_one_time_pre_key() {
    let env = MockEnv::fixed(ALICE_SENDING_RATCHET);
    let mut alice = SessionState::new();
    let mut bob = SessionState::new();

    initialize_initiator_session(&mut alice, &alice_params(false), &env).unwrap();
    initialize_responder_session(&mut bob, &bob_params(false)).unwrap();

    assert_sessions(&alice, &bob, &WITHOUT_ONE_TIME);
}

#[test]
fn symmetric_handshake_matches_prekey_vector() {
    // Bob's base key doubles as his signed prekey and first ratchet key
    let alice_params = SymmetricParameters {
        our_base_key_pair: pair(ALICE_BASE),
        our_identity_key_pair: pair(ALICE_IDENTITY),
        our_ratchet_key_pair: pair(0x77),
        our_signed_pre_key_pair: None,
        our_one_time_pre_key_pair: None,
        their_identity_key: public(BOB_IDENTITY),
        their_base_key: public(BOB_SIGNED_PRE_KEY),
        their_ratchet_key: public(BOB_SIGNED_PRE_KEY),
        their_signed_pre_key: None,
        their_one_time_pre_key: None,
    };
    let bob_params = SymmetricParameters {
        our_base_key_pair: pair(BOB_SIGNED_PRE_KEY),
        our_identity_key_pair: pair(BOB_IDENTITY),
        our_ratchet_key_pair: pair(BOB_SIGNED_PRE_KEY),
        our_signed_pre_key_pair: None,
        our_one_time_pre_key_pair: None,
        their_identity_key: public(ALICE_IDENTITY),
        their_base_key: public(ALICE_BASE),
        their_ratchet_key: public(0x77),
        their_signed_pre_key: None,
        their_one_time_pre_key: None,
    };

    assert_eq!(resolve_role(&public(ALICE_BASE), &public(BOB_SIGNED_PRE_KEY)), Role::Initiator);

    let env = MockEnv::fixed(ALICE_SENDING_RATCHET);
    let mut alice = SessionState::new();
    let mut bob = SessionState::new();

    assert_eq!(initialize_session(&mut alice, alice_params, &env).unwrap(), Role::Initiator);
    assert_eq!(initialize_session(&mut bob, bob_params, &env).unwrap(), Role::Responder);

    assert_sessions(&alice, &bob, &WITHOUT_ONE_TIME);
}
