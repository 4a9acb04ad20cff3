//! # WalletKit Core
//!
//! Pure primitives for WalletKit: key pairs, access keys, actions, and
//! transaction envelopes.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`KeyPair`] - Ed25519 signing key material
//! - [`PublicKey`] - 32-byte public key with a stable string encoding
//! - [`AccessKey`] - A network-registered credential scoping what a public
//!   key may authorize for an account
//! - [`Action`] - One step of a transaction (function call, transfer)
//! - [`Transaction`] - The unsigned envelope handed to a signer
//!
//! ## Wire Encoding
//!
//! Transactions are encoded as deterministic CBOR. The base64 form of those
//! bytes is what travels in wallet-broker redirect URLs.

pub mod access_key;
pub mod action;
pub mod crypto;
pub mod error;
pub mod transaction;

pub use access_key::{AccessKey, AccessKeyPermission, AccessKeyView, FunctionCallPermission};
pub use action::Action;
pub use crypto::{KeyPair, PublicKey, Signature};
pub use error::CoreError;
pub use transaction::{BlockHash, SignedTransaction, Transaction};
