//! Error types for the provider boundary.

use thiserror::Error;

/// How the network classified a rejected transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionKind {
    /// The signing access key's allowance cannot cover the transaction.
    /// The only kind the dispatch engine recovers from.
    NotEnoughAllowance,

    /// The transaction's nonce was not strictly greater than the access
    /// key's recorded nonce.
    InvalidNonce,

    /// The referenced block is no longer recent enough.
    Expired,

    /// Any other network-side rejection, verbatim.
    Other(String),
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionKind::NotEnoughAllowance => write!(f, "NotEnoughAllowance"),
            RejectionKind::InvalidNonce => write!(f, "InvalidNonce"),
            RejectionKind::Expired => write!(f, "Expired"),
            RejectionKind::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Errors that can occur at the provider boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The queried account does not exist on this network.
    #[error("account does not exist: {0}")]
    UnknownAccount(String),

    /// The network rejected a submitted transaction.
    #[error("transaction rejected: {0}")]
    Rejected(RejectionKind),

    /// Transport-level failure (connection, serialization, etc).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Whether this error is the recoverable allowance-exhaustion rejection.
    pub fn is_allowance_exhausted(&self) -> bool {
        matches!(self, ProviderError::Rejected(RejectionKind::NotEnoughAllowance))
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
