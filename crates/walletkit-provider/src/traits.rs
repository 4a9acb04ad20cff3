//! Provider trait: the abstract network interface consumed by the wallet.
//!
//! Implementations may use JSON-RPC, gRPC, or any other transport. The
//! wallet issues one outstanding request at a time per operation and leaves
//! timeouts to the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use walletkit_core::{AccessKeyView, BlockHash, SignedTransaction};

use crate::error::Result;

/// Minimal view of an on-chain account, used for existence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    /// Account balance.
    pub amount: u128,
    /// Bytes of on-chain storage the account occupies.
    pub storage_usage: u64,
}

/// Outcome of a successfully executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Network-assigned transaction hash.
    pub transaction_hash: String,
    /// Gas burned executing the transaction.
    pub gas_burnt: u64,
    /// Return value of the final action, if any.
    pub return_value: Option<Vec<u8>>,
}

/// The network provider: request/response only, no state.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fetch basic account state. Errors with `UnknownAccount` if the
    /// account does not exist; sign-in uses this as its existence check.
    async fn view_account(&self, account_id: &str) -> Result<AccountView>;

    /// List all access keys registered for an account, in network order.
    async fn get_access_keys(&self, account_id: &str) -> Result<Vec<AccessKeyView>>;

    /// A reference to a recent block, for bounding transaction replay.
    async fn recent_block_hash(&self) -> Result<BlockHash>;

    /// Submit a signed transaction and wait for its outcome.
    async fn send_transaction(&self, transaction: &SignedTransaction)
        -> Result<ExecutionOutcome>;

    /// Execute a read-only contract method against the latest state.
    async fn call_view_function(
        &self,
        contract_id: &str,
        method_name: &str,
        args: &[u8],
    ) -> Result<Vec<u8>>;
}
