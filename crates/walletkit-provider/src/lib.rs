//! # WalletKit Provider
//!
//! The network boundary consumed by the wallet: account queries, access-key
//! listings, recent-block references, and transaction submission.
//!
//! WalletKit never implements the transport itself. Applications hand the
//! wallet any [`Provider`] implementation (typically an RPC client); tests
//! use the scriptable [`MemoryProvider`].
//!
//! The one rejection the wallet pattern-matches is
//! [`RejectionKind::NotEnoughAllowance`]; everything else propagates to the
//! caller unmodified.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{ProviderError, RejectionKind, Result};
pub use memory::MemoryProvider;
pub use traits::{AccountView, ExecutionOutcome, Provider};
