//! # WalletKit Testkit
//!
//! Testing utilities for WalletKit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a fully wired wallet (in-memory key store, scriptable
//!   provider, recorded-navigation host) for scenario tests
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use walletkit_testkit::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! fixture.register_account("alice.test");
//! let key = fixture.seed_local_full_access_key("alice.test").await;
//! fixture.complete_sign_in("alice.test", None, &[key.public_key()]).await;
//! assert!(fixture.wallet.is_signed_in());
//! # }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;
