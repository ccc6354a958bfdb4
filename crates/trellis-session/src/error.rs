//! Error types for session bootstrap.

use thiserror::Error;
use trellis_crypto::CryptoError;

use crate::role::Role;

/// A curve or KDF primitive failed while deriving session secrets.
///
/// The primitives are pure, so a failure means an invariant was violated
/// (e.g. a low-order peer point). Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("primitive fault: {source}")]
pub struct FatalFault {
    source: CryptoError,
}

impl FatalFault {
    /// Underlying primitive error.
    pub fn cause(&self) -> &CryptoError {
        &self.source
    }
}

impl From<CryptoError> for FatalFault {
    fn from(source: CryptoError) -> Self {
        Self { source }
    }
}

/// Errors from session initialization.
///
/// Every variant is returned before the session state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Key material handed in for a role is unusable
    #[error("invalid {role} parameters: {reason}")]
    InvalidParameters {
        /// Role the parameters were built for
        role: Role,
        /// What is wrong with them
        reason: &'static str,
    },

    /// Both parties presented the same base key, so no initiator exists
    #[error("ambiguous role: our base key equals their base key")]
    AmbiguousRole,

    /// A session transaction was committed without a required write
    #[error("incomplete session: missing {missing}")]
    IncompleteSession {
        /// Name of the missing field
        missing: &'static str,
    },

    /// A primitive failed
    #[error(transparent)]
    Fatal(#[from] FatalFault),
}

impl SessionError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Configuration errors can be fixed by the caller supplying different
    /// key material. Primitive faults cannot.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Fatal(_) => true,

            Self::InvalidParameters { .. } => false,
            Self::AmbiguousRole => false,
            Self::IncompleteSession { .. } => false,
        }
    }
}

impl From<CryptoError> for SessionError {
    fn from(err: CryptoError) -> Self {
        Self::Fatal(FatalFault::from(err))
    }
}
