//! The persisted authentication session.
//!
//! One namespaced entry in host storage holds the authenticated account id
//! and the full set of public keys the broker considers valid for it. It
//! is empty until a redirect round trip completes, cleared on sign-out,
//! and must survive a full process restart because the redirect is a real
//! navigation.

use serde::{Deserialize, Serialize};

use walletkit_core::PublicKey;

/// Suffix of the host-storage key holding the session.
pub const AUTH_DATA_KEY_SUFFIX: &str = "_wallet_auth_key";

/// Prefix of the synthetic identity a locally generated key is stored
/// under until the broker confirms it is bound to a real account.
pub const PENDING_KEY_PREFIX: &str = "pending_key";

/// The authenticated identity and its broker-known keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The signed-in account, if any.
    pub account_id: Option<String>,

    /// All public keys the broker considers valid for the account.
    #[serde(default)]
    pub all_keys: Vec<PublicKey>,
}

impl AuthSession {
    /// Whether this session carries an authenticated identity.
    pub fn is_signed_in(&self) -> bool {
        self.account_id.is_some()
    }
}

/// Storage key for the session entry under an application prefix.
pub fn auth_data_key(app_key_prefix: &str) -> String {
    format!("{app_key_prefix}{AUTH_DATA_KEY_SUFFIX}")
}

/// Synthetic keystore identity for a not-yet-confirmed key.
pub fn pending_key_id(public_key: &PublicKey) -> String {
    format!("{PENDING_KEY_PREFIX}{public_key}")
}
