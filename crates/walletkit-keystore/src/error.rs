//! Error types for the keystore module.

use thiserror::Error;

use walletkit_core::CoreError;

/// Errors that can occur during keystore operations.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// I/O error from a persistent backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored data that cannot be interpreted as a credential.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Key material error from the core primitives.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for keystore operations.
pub type Result<T> = std::result::Result<T, KeyStoreError>;
