//! Proptest generators for property-based testing.

use proptest::prelude::*;

use walletkit_core::{
    AccessKey, AccessKeyPermission, Action, FunctionCallPermission, KeyPair, PublicKey,
    Transaction,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = KeyPair> {
    any::<[u8; 32]>().prop_map(|seed| KeyPair::from_seed(&seed))
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate an account id.
pub fn account_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{2,12}\\.test".prop_map(String::from)
}

/// Generate a contract method name.
pub fn method_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{2,20}".prop_map(String::from)
}

/// Generate a list of method names of specified max length.
pub fn method_names(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(method_name(), 0..=max_len)
}

/// Generate argument bytes of specified max length.
pub fn args(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a function-call action, optionally with an attached deposit.
pub fn function_call_action() -> impl Strategy<Value = Action> {
    (method_name(), args(64), 1u64..=300_000_000_000_000u64, 0u128..=2u128)
        .prop_map(|(method, args, gas, deposit)| {
            Action::function_call(method, args, gas, deposit)
        })
}

/// Generate a transfer action.
pub fn transfer_action() -> impl Strategy<Value = Action> {
    (1u128..=1_000_000u128).prop_map(Action::transfer)
}

/// Generate any action.
pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![function_call_action(), transfer_action()]
}

/// Generate a batch of actions of specified max length.
pub fn actions(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(action(), 1..=max_len)
}

/// Generate an access-key permission.
pub fn permission() -> impl Strategy<Value = AccessKeyPermission> {
    prop_oneof![
        Just(AccessKeyPermission::FullAccess),
        (account_id(), method_names(4), prop::option::of(1u128..=10u128.pow(24)))
            .prop_map(|(receiver_id, method_names, allowance)| {
                AccessKeyPermission::FunctionCall(FunctionCallPermission {
                    receiver_id,
                    method_names,
                    allowance,
                })
            }),
    ]
}

/// Generate an access key.
pub fn access_key() -> impl Strategy<Value = AccessKey> {
    (0u64..=1000u64, permission()).prop_map(|(nonce, permission)| AccessKey {
        nonce,
        permission,
    })
}

/// Generate an unsigned transaction.
pub fn transaction() -> impl Strategy<Value = Transaction> {
    (
        account_id(),
        public_key(),
        account_id(),
        1u64..=1000u64,
        actions(3),
        any::<[u8; 32]>(),
    )
        .prop_map(|(signer_id, public_key, receiver_id, nonce, actions, hash)| {
            Transaction::new(
                signer_id,
                public_key,
                receiver_id,
                nonce,
                actions,
                walletkit_core::BlockHash::from_bytes(hash),
            )
        })
}
