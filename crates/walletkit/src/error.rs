//! Error types for the WalletKit API.

use thiserror::Error;

use walletkit_core::CoreError;
use walletkit_keystore::KeyStoreError;
use walletkit_provider::ProviderError;

use crate::host::HostError;

/// Errors surfaced by wallet operations.
///
/// Only the allowance-exhaustion rejection is ever caught internally (it
/// triggers the retry-without-local-key path); every other failure
/// propagates to the caller unmodified.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Key selection found nothing usable for this receiver.
    #[error("cannot find matching key for transaction sent to {receiver_id}")]
    NoUsableKey { receiver_id: String },

    /// The broker redirect was invoked but control never left the process
    /// within the configured guard. Indicates a host/environment problem,
    /// not a user-facing condition.
    #[error("failed to redirect to sign transaction")]
    BrokerHandoffIncomplete,

    /// The operation requires an authenticated session.
    #[error("wallet is not signed in")]
    NotSignedIn,

    /// The contract has no method registered under this name.
    #[error("unknown contract method: {0}")]
    UnknownMethod(String),

    /// Promotion was requested for a public key with no pending slot.
    #[error("no pending key stored for public key {0}")]
    PendingKeyNotFound(String),

    /// The persisted session entry could not be interpreted.
    #[error("invalid persisted session: {0}")]
    InvalidSession(String),

    /// Key store I/O failure, propagated unchanged.
    #[error(transparent)]
    Storage(#[from] KeyStoreError),

    /// Network provider failure, propagated unchanged.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Host storage/navigation failure.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Core primitive failure (key or envelope encoding).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A wallet or callback URL could not be constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;
