//! Contract bindings: an explicit method table over a deployed contract.
//!
//! Each registered method carries a kind. View methods route to the
//! provider's read-only call; change methods go through the account's full
//! dispatch path as a single function-call action.

use std::collections::HashMap;

use walletkit_core::Action;
use walletkit_provider::ExecutionOutcome;

use crate::account::WalletAccount;
use crate::error::{Result, WalletError};

/// Default gas attached to change-method calls.
pub const DEFAULT_FUNCTION_CALL_GAS: u64 = 30_000_000_000_000;

/// Whether a contract method reads or mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Read-only; executed against the latest state without a transaction.
    View,
    /// Mutating; dispatched as a signed transaction.
    Change,
}

/// Options for a single contract call.
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Gas for change methods.
    pub gas: u64,
    /// Deposit attached to change methods. Non-zero deposits rule out
    /// function-call-scoped keys.
    pub deposit: u128,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            gas: DEFAULT_FUNCTION_CALL_GAS,
            deposit: 0,
        }
    }
}

/// Result of a contract call, shaped by the method's kind.
#[derive(Debug, Clone)]
pub enum CallResult {
    /// Raw return bytes of a view method.
    View(Vec<u8>),
    /// Execution outcome of a dispatched change method.
    Change(ExecutionOutcome),
}

/// A contract handle with an explicit view/change method table.
pub struct Contract {
    account: WalletAccount,
    contract_id: String,
    methods: HashMap<String, MethodKind>,
}

impl Contract {
    /// Build a handle over the contract at `contract_id`.
    ///
    /// A method registered as both view and change resolves to change;
    /// mutating through the dispatch path is the safe interpretation.
    pub fn new(
        account: WalletAccount,
        contract_id: impl Into<String>,
        view_methods: &[&str],
        change_methods: &[&str],
    ) -> Self {
        let mut methods = HashMap::new();
        for name in view_methods {
            methods.insert((*name).to_string(), MethodKind::View);
        }
        for name in change_methods {
            methods.insert((*name).to_string(), MethodKind::Change);
        }
        Self {
            account,
            contract_id: contract_id.into(),
            methods,
        }
    }

    /// The contract account id.
    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// The kind a method resolves to, if registered.
    pub fn method_kind(&self, method_name: &str) -> Option<MethodKind> {
        self.methods.get(method_name).copied()
    }

    /// Invoke a registered method.
    pub async fn call(
        &self,
        method_name: &str,
        args: Vec<u8>,
        options: CallOptions,
    ) -> Result<CallResult> {
        match self.method_kind(method_name) {
            Some(MethodKind::View) => {
                let bytes = self
                    .account
                    .wallet()
                    .provider()
                    .call_view_function(&self.contract_id, method_name, &args)
                    .await?;
                Ok(CallResult::View(bytes))
            }
            Some(MethodKind::Change) => {
                let outcome = self
                    .account
                    .sign_and_send_transaction(
                        &self.contract_id,
                        vec![Action::function_call(
                            method_name,
                            args,
                            options.gas,
                            options.deposit,
                        )],
                    )
                    .await?;
                Ok(CallResult::Change(outcome))
            }
            None => Err(WalletError::UnknownMethod(method_name.to_string())),
        }
    }
}
