//! Transaction actions.
//!
//! An action is one step of a transaction. The permission evaluator only
//! cares about the distinction between function calls and everything else,
//! so the set here is deliberately small.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One step of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Call a method on a contract account.
    FunctionCall {
        /// The contract method to invoke.
        method_name: String,
        /// Serialized call arguments, opaque to this SDK.
        args: Bytes,
        /// Gas attached to the call.
        gas: u64,
        /// Deposit attached to the call. Function-call access keys only
        /// authorize zero-deposit calls.
        deposit: u128,
    },

    /// Transfer a deposit to the receiver.
    Transfer {
        /// Amount to transfer.
        deposit: u128,
    },
}

impl Action {
    /// Construct a function-call action.
    pub fn function_call(
        method_name: impl Into<String>,
        args: impl Into<Bytes>,
        gas: u64,
        deposit: u128,
    ) -> Self {
        Self::FunctionCall {
            method_name: method_name.into(),
            args: args.into(),
            gas,
            deposit,
        }
    }

    /// Construct a transfer action.
    pub fn transfer(deposit: u128) -> Self {
        Self::Transfer { deposit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_call_constructor() {
        let action = Action::function_call("vote", vec![1, 2, 3], 30_000_000_000_000, 0);
        match action {
            Action::FunctionCall {
                method_name,
                args,
                gas,
                deposit,
            } => {
                assert_eq!(method_name, "vote");
                assert_eq!(args.as_ref(), &[1, 2, 3]);
                assert_eq!(gas, 30_000_000_000_000);
                assert_eq!(deposit, 0);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_action_roundtrip() {
        let actions = vec![
            Action::function_call("vote", b"{}".to_vec(), 1, 0),
            Action::transfer(250),
        ];
        let json = serde_json::to_string(&actions).unwrap();
        let back: Vec<Action> = serde_json::from_str(&json).unwrap();
        assert_eq!(actions, back);
    }
}
