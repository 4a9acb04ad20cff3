//! # WalletKit Access
//!
//! Pure decision logic for access-key authorization: given a candidate
//! key's permission scope, a target receiver, and a proposed action list,
//! decide whether the key may sign.
//!
//! The match itself never touches the network. Fetching the candidate keys
//! and picking among them is the dispatch layer's job; this crate only
//! answers "does this one key cover this one transaction".
//!
//! ## Rules
//!
//! - `FullAccess` covers everything.
//! - A function-call key scoped to the signer itself with the multisig
//!   confirmation method is accepted regardless of receiver and actions,
//!   so multisig-controlled accounts can always attempt the call and let
//!   the network enforce the real policy.
//! - Otherwise a function-call key covers exactly one zero-deposit
//!   function-call action against its scoped receiver, with the method
//!   either unrestricted (empty list) or an exact member of the list.
//! - Everything else is rejected, including multi-action lists whose every
//!   action would individually match.

use walletkit_core::{AccessKey, AccessKeyPermission, Action};

/// Method name marking an access key as belonging to a multisig wallet
/// contract deployed on the signer's own account.
pub const MULTISIG_CONFIRM_METHOD: &str = "add_request_and_confirm";

/// Decide whether `access_key` authorizes `actions` against `receiver_id`
/// when signing on behalf of `signer_id`.
pub fn access_key_matches_transaction(
    access_key: &AccessKey,
    signer_id: &str,
    receiver_id: &str,
    actions: &[Action],
) -> bool {
    let permission = match &access_key.permission {
        AccessKeyPermission::FullAccess => return true,
        AccessKeyPermission::FunctionCall(permission) => permission,
    };

    // Multisig carve-out: a key scoped to the signer's own account with the
    // confirmation method is used through a multisig contract; the network
    // enforces the real policy.
    if permission.receiver_id == signer_id
        && permission
            .method_names
            .iter()
            .any(|m| m == MULTISIG_CONFIRM_METHOD)
    {
        return true;
    }

    if permission.receiver_id != receiver_id {
        return false;
    }

    // Scoped keys authorize exactly one action, never a batch.
    let [action] = actions else {
        return false;
    };

    match action {
        Action::FunctionCall {
            method_name,
            deposit,
            ..
        } => *deposit == 0 && permission.allows_method(method_name),
        _ => false,
    }
}
