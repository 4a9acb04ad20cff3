//! A scriptable in-memory provider for testing.
//!
//! Simulates just enough network behavior for wallet tests: registered
//! accounts, per-account access-key listings, a programmable block hash,
//! forced submit rejections, and a log of everything submitted.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use walletkit_core::{AccessKey, AccessKeyView, BlockHash, PublicKey, SignedTransaction};

use crate::error::{ProviderError, RejectionKind, Result};
use crate::traits::{AccountView, ExecutionOutcome, Provider};

/// In-memory provider implementation.
///
/// All state is behind one mutex; tests mutate it through the `register_*`
/// and `fail_next_*` methods and inspect it through `submitted`.
pub struct MemoryProvider {
    inner: Mutex<MemoryProviderInner>,
}

struct MemoryProviderInner {
    accounts: HashMap<String, AccountView>,
    access_keys: HashMap<String, Vec<AccessKeyView>>,
    block_hash: BlockHash,
    forced_rejections: VecDeque<RejectionKind>,
    submitted: Vec<SignedTransaction>,
    view_results: HashMap<(String, String), Vec<u8>>,
    view_calls: Vec<(String, String, Vec<u8>)>,
    next_tx_index: u64,
}

impl MemoryProvider {
    /// Create an empty provider with an all-zero block hash.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryProviderInner {
                accounts: HashMap::new(),
                access_keys: HashMap::new(),
                block_hash: BlockHash::from_bytes([0u8; 32]),
                forced_rejections: VecDeque::new(),
                submitted: Vec::new(),
                view_results: HashMap::new(),
                view_calls: Vec::new(),
                next_tx_index: 0,
            }),
        }
    }

    /// Register an account so `view_account` succeeds for it.
    pub fn register_account(&self, account_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.accounts.insert(
            account_id.to_string(),
            AccountView {
                amount: 1_000_000,
                storage_usage: 100,
            },
        );
    }

    /// Register an access key in the account's network-ordered listing.
    pub fn register_access_key(
        &self,
        account_id: &str,
        public_key: PublicKey,
        access_key: AccessKey,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .access_keys
            .entry(account_id.to_string())
            .or_default()
            .push(AccessKeyView {
                public_key,
                access_key,
            });
    }

    /// Set the hash returned by `recent_block_hash`.
    pub fn set_block_hash(&self, block_hash: BlockHash) {
        self.inner.lock().unwrap().block_hash = block_hash;
    }

    /// Make the next `send_transaction` fail with the given rejection.
    pub fn fail_next_submit(&self, kind: RejectionKind) {
        self.inner.lock().unwrap().forced_rejections.push_back(kind);
    }

    /// Set the return value of a view-function call.
    pub fn set_view_result(&self, contract_id: &str, method_name: &str, result: Vec<u8>) {
        self.inner.lock().unwrap().view_results.insert(
            (contract_id.to_string(), method_name.to_string()),
            result,
        );
    }

    /// Every transaction successfully submitted so far.
    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.inner.lock().unwrap().submitted.clone()
    }

    /// Every view-function call made so far, as `(contract, method, args)`.
    pub fn view_calls(&self) -> Vec<(String, String, Vec<u8>)> {
        self.inner.lock().unwrap().view_calls.clone()
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn view_account(&self, account_id: &str) -> Result<AccountView> {
        let inner = self.inner.lock().unwrap();
        inner
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownAccount(account_id.to_string()))
    }

    async fn get_access_keys(&self, account_id: &str) -> Result<Vec<AccessKeyView>> {
        let inner = self.inner.lock().unwrap();
        if !inner.accounts.contains_key(account_id) {
            return Err(ProviderError::UnknownAccount(account_id.to_string()));
        }
        Ok(inner.access_keys.get(account_id).cloned().unwrap_or_default())
    }

    async fn recent_block_hash(&self) -> Result<BlockHash> {
        Ok(self.inner.lock().unwrap().block_hash)
    }

    async fn send_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<ExecutionOutcome> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(kind) = inner.forced_rejections.pop_front() {
            return Err(ProviderError::Rejected(kind));
        }
        inner.submitted.push(transaction.clone());
        inner.next_tx_index += 1;
        debug!(
            signer_id = %transaction.transaction.signer_id,
            nonce = transaction.transaction.nonce,
            "accepted transaction"
        );
        Ok(ExecutionOutcome {
            transaction_hash: format!("tx-{}", inner.next_tx_index),
            gas_burnt: 1_000_000,
            return_value: None,
        })
    }

    async fn call_view_function(
        &self,
        contract_id: &str,
        method_name: &str,
        args: &[u8],
    ) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.accounts.contains_key(contract_id) {
            return Err(ProviderError::UnknownAccount(contract_id.to_string()));
        }
        inner.view_calls.push((
            contract_id.to_string(),
            method_name.to_string(),
            args.to_vec(),
        ));
        Ok(inner
            .view_results
            .get(&(contract_id.to_string(), method_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
