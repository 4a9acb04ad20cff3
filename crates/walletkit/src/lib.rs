//! # WalletKit
//!
//! The unified API for acting on behalf of a blockchain account: stored
//! key material, access-key authorization, signed transaction dispatch,
//! and a redirect-and-resume handoff to an external wallet broker when no
//! locally usable key exists.
//!
//! ## Overview
//!
//! - **Key stores**: layered persistence for keypairs under
//!   `(network, account)`
//! - **Permission evaluation**: does a stored access key cover a proposed
//!   action set against a receiver
//! - **Dispatch**: local sign-and-submit with a defined fallback to the
//!   wallet broker via full navigation
//! - **Resume**: reconciling broker-returned identity and keys back into
//!   the key store after the redirect round trip
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use walletkit::{MemoryHost, WalletConfig, WalletConnection};
//! use walletkit::keystore::InMemoryKeyStore;
//! use walletkit::provider::MemoryProvider;
//!
//! async fn example() {
//!     let config = WalletConfig::new(
//!         "testnet",
//!         "https://wallet.example.org",
//!         "my-app",
//!     );
//!     let wallet = Arc::new(WalletConnection::new(
//!         config,
//!         Arc::new(InMemoryKeyStore::new()),
//!         Arc::new(MemoryProvider::new()),
//!         Arc::new(MemoryHost::new("https://app.example.org/")),
//!     ).unwrap());
//!
//!     if !wallet.is_signed_in() {
//!         // wallet.request_sign_in(..).await would navigate to the broker
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `walletkit::core` - Primitives (KeyPair, AccessKey, Transaction, etc.)
//! - `walletkit::keystore` - Key storage backends
//! - `walletkit::access` - Permission evaluation
//! - `walletkit::provider` - The consumed network interface

pub mod account;
pub mod config;
pub mod contract;
pub mod error;
pub mod host;
pub mod session;
pub mod wallet;

// Re-export component crates
pub use walletkit_access as access;
pub use walletkit_core as core;
pub use walletkit_keystore as keystore;
pub use walletkit_provider as provider;

// Re-export main types for convenience
pub use account::{SignOptions, WalletAccount};
pub use config::WalletConfig;
pub use contract::{CallOptions, CallResult, Contract, MethodKind};
pub use error::{Result, WalletError};
pub use host::{DetachedHost, HostEnvironment, HostError, MemoryHost};
pub use session::AuthSession;
pub use wallet::{SignInRequest, WalletConnection};

// Re-export commonly used core types
pub use walletkit_core::{
    AccessKey, AccessKeyPermission, AccessKeyView, Action, BlockHash, KeyPair, PublicKey,
    SignedTransaction, Transaction,
};
