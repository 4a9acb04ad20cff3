//! Access keys: network-registered credentials scoping what a public key
//! may authorize for an account.
//!
//! The permission model has two shapes. `FullAccess` authorizes anything.
//! `FunctionCall` authorizes only single zero-deposit function calls against
//! one receiver, optionally restricted to a method list, with a remaining
//! spend allowance that the network (not this SDK) decrements.

use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;

/// An access key as reported by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    /// Strictly increasing per-key counter; a new transaction must use
    /// `nonce + 1`.
    pub nonce: u64,

    /// What this key is allowed to authorize.
    pub permission: AccessKeyPermission,
}

impl AccessKey {
    /// An access key that authorizes any action set.
    pub fn full_access() -> Self {
        Self {
            nonce: 0,
            permission: AccessKeyPermission::FullAccess,
        }
    }

    /// An access key scoped to function calls against one receiver.
    ///
    /// An empty `method_names` list means any method.
    pub fn function_call(
        receiver_id: impl Into<String>,
        method_names: Vec<String>,
        allowance: Option<u128>,
    ) -> Self {
        Self {
            nonce: 0,
            permission: AccessKeyPermission::FunctionCall(FunctionCallPermission {
                receiver_id: receiver_id.into(),
                method_names,
                allowance,
            }),
        }
    }

    /// Set the reported nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }
}

/// Permission scope of an access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKeyPermission {
    /// Unconditionally authorizes any action set.
    FullAccess,

    /// Authorizes only scoped function calls.
    FunctionCall(FunctionCallPermission),
}

/// The scope carried by a function-call access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallPermission {
    /// The only account this key may call.
    pub receiver_id: String,

    /// Allowed method names; empty means any method.
    pub method_names: Vec<String>,

    /// Remaining spend budget, decremented by the network. `None` means
    /// unlimited. Exhaustion is the one rejection the dispatch engine
    /// specifically recognizes.
    pub allowance: Option<u128>,
}

impl FunctionCallPermission {
    /// Check whether this scope admits a call to the given method.
    pub fn allows_method(&self, method_name: &str) -> bool {
        self.method_names.is_empty() || self.method_names.iter().any(|m| m == method_name)
    }
}

/// One entry of the provider's access-key listing for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyView {
    /// The public key the access key is registered under.
    pub public_key: PublicKey,

    /// The key's nonce and permission.
    pub access_key: AccessKey,
}
