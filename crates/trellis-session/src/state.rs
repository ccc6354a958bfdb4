//! Session state populated by initialization.
//!
//! Writes are staged in a [`PendingSession`] and applied by
//! [`SessionState::commit`] in one step. A commit either replaces the whole
//! session or leaves it untouched.

use std::collections::VecDeque;

use trellis_crypto::{ChainKey, KeyPair, PublicKey, RootKey};

use crate::error::SessionError;

/// Receiving chains kept per session. The oldest is evicted first.
pub const MAX_RECEIVER_CHAINS: usize = 5;

/// Our current sending chain.
#[derive(Debug)]
pub struct SenderChain {
    ratchet_key_pair: KeyPair,
    chain_key: ChainKey,
}

impl SenderChain {
    /// Ratchet key pair advertised to the peer.
    pub fn ratchet_key_pair(&self) -> &KeyPair {
        &self.ratchet_key_pair
    }

    /// Head of the sending chain.
    pub fn chain_key(&self) -> &ChainKey {
        &self.chain_key
    }
}

#[derive(Debug)]
struct ReceiverChain {
    ratchet_key: PublicKey,
    chain_key: ChainKey,
}

/// Double Ratchet session state.
#[derive(Debug, Default)]
pub struct SessionState {
    session_version: u32,
    local_identity_key: Option<PublicKey>,
    remote_identity_key: Option<PublicKey>,
    root_key: Option<RootKey>,
    sender_chain: Option<SenderChain>,
    receiver_chains: VecDeque<ReceiverChain>,
}

impl SessionState {
    /// Empty, uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Protocol version, 0 until initialized.
    pub fn session_version(&self) -> u32 {
        self.session_version
    }

    /// Our identity key.
    pub fn local_identity_key(&self) -> Option<&PublicKey> {
        self.local_identity_key.as_ref()
    }

    /// Peer's identity key.
    pub fn remote_identity_key(&self) -> Option<&PublicKey> {
        self.remote_identity_key.as_ref()
    }

    /// Current root key.
    pub fn root_key(&self) -> Option<&RootKey> {
        self.root_key.as_ref()
    }

    /// Current sending chain.
    pub fn sender_chain(&self) -> Option<&SenderChain> {
        self.sender_chain.as_ref()
    }

    /// Chain key registered for the peer's `ratchet_key`.
    pub fn receiver_chain_key(&self, ratchet_key: &PublicKey) -> Option<&ChainKey> {
        self.receiver_chains
            .iter()
            .find(|chain| chain.ratchet_key == *ratchet_key)
            .map(|chain| &chain.chain_key)
    }

    /// Number of receiving chains held.
    pub fn receiver_chain_count(&self) -> usize {
        self.receiver_chains.len()
    }

    /// True once a commit has populated the session.
    pub fn is_initialized(&self) -> bool {
        self.root_key.is_some() && self.sender_chain.is_some()
    }

    /// Apply every staged write, replacing the current contents.
    ///
    /// # Errors
    ///
    /// - `IncompleteSession`: a required write is missing. Nothing is
    ///   applied.
    pub fn commit(&mut self, pending: PendingSession) -> Result<(), SessionError> {
        let PendingSession {
            session_version,
            local_identity_key,
            remote_identity_key,
            root_key,
            sender_chain,
            receiver_chains,
        } = pending;

        let missing = |missing| SessionError::IncompleteSession { missing };
        let session_version = session_version.ok_or_else(|| missing("protocol version"))?;
        let local_identity_key = local_identity_key.ok_or_else(|| missing("local identity"))?;
        let remote_identity_key = remote_identity_key.ok_or_else(|| missing("remote identity"))?;
        let root_key = root_key.ok_or_else(|| missing("root key"))?;
        let sender_chain = sender_chain.ok_or_else(|| missing("sending chain"))?;

        let mut committed = Self {
            session_version,
            local_identity_key: Some(local_identity_key),
            remote_identity_key: Some(remote_identity_key),
            root_key: Some(root_key),
            sender_chain: Some(sender_chain),
            receiver_chains: VecDeque::with_capacity(MAX_RECEIVER_CHAINS),
        };
        for chain in receiver_chains {
            committed.add_receiver_chain(chain);
        }

        *self = committed;
        Ok(())
    }

    fn add_receiver_chain(&mut self, chain: ReceiverChain) {
        self.receiver_chains.retain(|existing| existing.ratchet_key != chain.ratchet_key);
        self.receiver_chains.push_back(chain);

        while self.receiver_chains.len() > MAX_RECEIVER_CHAINS {
            self.receiver_chains.pop_front();
        }
    }
}

/// Writes staged for a single [`SessionState::commit`].
#[derive(Debug, Default)]
pub struct PendingSession {
    session_version: Option<u32>,
    local_identity_key: Option<PublicKey>,
    remote_identity_key: Option<PublicKey>,
    root_key: Option<RootKey>,
    sender_chain: Option<SenderChain>,
    receiver_chains: Vec<ReceiverChain>,
}

impl PendingSession {
    /// Empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the protocol version.
    pub fn set_protocol_version(&mut self, version: u32) -> &mut Self {
        self.session_version = Some(version);
        self
    }

    /// Stage our identity key.
    pub fn set_local_identity(&mut self, identity_key: PublicKey) -> &mut Self {
        self.local_identity_key = Some(identity_key);
        self
    }

    /// Stage the peer's identity key.
    pub fn set_remote_identity(&mut self, identity_key: PublicKey) -> &mut Self {
        self.remote_identity_key = Some(identity_key);
        self
    }

    /// Stage the root key.
    pub fn set_root_key(&mut self, root_key: RootKey) -> &mut Self {
        self.root_key = Some(root_key);
        self
    }

    /// Stage the sending chain.
    pub fn set_sending_chain(
        &mut self,
        ratchet_key_pair: KeyPair,
        chain_key: ChainKey,
    ) -> &mut Self {
        self.sender_chain = Some(SenderChain { ratchet_key_pair, chain_key });
        self
    }

    /// Stage a receiving chain for the peer's `ratchet_key`.
    pub fn add_receiving_chain(
        &mut self,
        ratchet_key: PublicKey,
        chain_key: ChainKey,
    ) -> &mut Self {
        self.receiver_chains.push(ReceiverChain { ratchet_key, chain_key });
        self
    }
}
