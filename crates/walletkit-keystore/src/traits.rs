//! KeyStore trait: the abstract interface for keypair persistence.
//!
//! This trait allows the wallet to be storage-agnostic. Implementations
//! include the filesystem credential store and an in-memory store for
//! tests and ephemeral hosts.

use async_trait::async_trait;
use walletkit_core::KeyPair;

use crate::error::Result;

/// The KeyStore trait: async interface for keypair persistence under
/// `(network_id, account_id)`.
///
/// All methods are async to support backends that suspend on I/O.
///
/// # Design Notes
///
/// - **Absence is not an error**: `get_key` returns `Ok(None)` for a key
///   that was never stored.
/// - **Idempotent writes**: `set_key` upserts; `remove_key` on an absent
///   entry succeeds.
/// - **Ownership**: the store exclusively owns persisted key material.
///   Callers get clones and must not cache them beyond a single operation.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Store a keypair for the given network and account. Upserts.
    async fn set_key(&self, network_id: &str, account_id: &str, keypair: &KeyPair) -> Result<()>;

    /// Get the keypair for the given network and account, if any.
    async fn get_key(&self, network_id: &str, account_id: &str) -> Result<Option<KeyPair>>;

    /// Remove the keypair for the given network and account. No-op if absent.
    async fn remove_key(&self, network_id: &str, account_id: &str) -> Result<()>;

    /// Remove all stored keypairs.
    async fn clear(&self) -> Result<()>;

    /// List networks with at least one stored account.
    async fn get_networks(&self) -> Result<Vec<String>>;

    /// List accounts stored under a network.
    async fn get_accounts(&self, network_id: &str) -> Result<Vec<String>>;
}
