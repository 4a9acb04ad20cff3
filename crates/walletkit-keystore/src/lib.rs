//! # WalletKit KeyStore
//!
//! Key storage abstraction for WalletKit. Provides a trait-based interface
//! for keypair persistence under `(network, account)` with in-memory,
//! filesystem, and merged implementations.
//!
//! ## Overview
//!
//! The store module abstracts key persistence behind the [`KeyStore`]
//! trait, allowing the wallet to be storage-agnostic. Applications embed
//! whichever backend suits the host: [`InMemoryKeyStore`] for tests and
//! ephemeral processes, [`FileSystemKeyStore`] for credential files on
//! disk, and [`MergeKeyStore`] to layer several stores behind one handle.
//!
//! ## Key Types
//!
//! - [`KeyStore`] - The async trait for all storage operations
//! - [`InMemoryKeyStore`] - In-memory storage
//! - [`FileSystemKeyStore`] - Unencrypted credential files under a base dir
//! - [`MergeKeyStore`] - Ordered composition with a single write target
//!
//! ## Design Notes
//!
//! - **Absence is not an error**: `get_key` returns `Ok(None)` for a
//!   missing key; callers treat that as "no local key".
//! - **Idempotent writes**: `set_key` upserts, `remove_key` is a no-op on
//!   absent entries.
//! - **Failures propagate**: store-level I/O errors abort the operation;
//!   nothing is suppressed.

pub mod error;
pub mod fs;
pub mod memory;
pub mod merge;
pub mod traits;

pub use error::{KeyStoreError, Result};
pub use fs::FileSystemKeyStore;
pub use memory::InMemoryKeyStore;
pub use merge::MergeKeyStore;
pub use traits::KeyStore;
