//! Test fixtures and helpers.
//!
//! Common setup code for wallet scenario tests: a wired
//! [`WalletConnection`] over an in-memory key store, a scriptable
//! provider, and a host that records navigations instead of performing
//! them.

use std::sync::Arc;
use std::time::Duration;

use url::Url;
use walletkit::{MemoryHost, WalletAccount, WalletConfig, WalletConnection};
use walletkit_core::{AccessKey, KeyPair, PublicKey};
use walletkit_keystore::{InMemoryKeyStore, KeyStore};
use walletkit_provider::MemoryProvider;

/// URL the fixture's application "runs" at.
pub const APP_URL: &str = "https://app.example.org/";

/// Base URL of the fixture's wallet broker.
pub const WALLET_URL: &str = "https://wallet.example.org";

/// Network id used throughout the fixture.
pub const NETWORK_ID: &str = "testnet";

/// A wired wallet with all collaborators exposed for scripting.
pub struct TestFixture {
    pub key_store: Arc<InMemoryKeyStore>,
    pub provider: Arc<MemoryProvider>,
    pub host: Arc<MemoryHost>,
    pub wallet: Arc<WalletConnection>,
}

impl TestFixture {
    /// Create a fixture with a short redirect guard so handoff-path tests
    /// finish quickly.
    pub fn new() -> Self {
        let key_store = Arc::new(InMemoryKeyStore::new());
        let provider = Arc::new(MemoryProvider::new());
        let host = Arc::new(MemoryHost::new(APP_URL));
        let config = WalletConfig::new(NETWORK_ID, WALLET_URL, "test-app")
            .with_redirect_guard(Duration::from_millis(25));
        let wallet = Arc::new(
            WalletConnection::new(
                config,
                key_store.clone(),
                provider.clone(),
                host.clone(),
            )
            .expect("fixture wallet construction"),
        );
        Self {
            key_store,
            provider,
            host,
            wallet,
        }
    }

    /// Register an account with the provider.
    pub fn register_account(&self, account_id: &str) {
        self.provider.register_account(account_id);
    }

    /// Register an access key in the account's provider listing.
    pub fn grant_access_key(
        &self,
        account_id: &str,
        public_key: PublicKey,
        access_key: AccessKey,
    ) {
        self.provider
            .register_access_key(account_id, public_key, access_key);
    }

    /// Generate a keypair, store it locally, and register it with the
    /// provider as a full-access key. Returns the keypair.
    pub async fn seed_local_full_access_key(&self, account_id: &str) -> KeyPair {
        let keypair = KeyPair::generate();
        self.key_store
            .set_key(NETWORK_ID, account_id, &keypair)
            .await
            .expect("in-memory set_key");
        self.grant_access_key(account_id, keypair.public_key(), AccessKey::full_access());
        keypair
    }

    /// Generate a keypair, store it locally, and register it with the
    /// provider as a function-call key. Returns the keypair.
    pub async fn seed_local_function_call_key(
        &self,
        account_id: &str,
        receiver_id: &str,
        method_names: Vec<String>,
        allowance: Option<u128>,
    ) -> KeyPair {
        let keypair = KeyPair::generate();
        self.key_store
            .set_key(NETWORK_ID, account_id, &keypair)
            .await
            .expect("in-memory set_key");
        self.grant_access_key(
            account_id,
            keypair.public_key(),
            AccessKey::function_call(receiver_id, method_names, allowance),
        );
        keypair
    }

    /// Simulate the broker landing back on the application with resumption
    /// parameters, then run the resume protocol.
    pub async fn complete_sign_in(
        &self,
        account_id: &str,
        public_key: Option<&PublicKey>,
        all_keys: &[PublicKey],
    ) -> bool {
        let joined = all_keys
            .iter()
            .map(PublicKey::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut params: Vec<(&str, String)> = vec![
            ("account_id", account_id.to_string()),
            ("all_keys", joined),
        ];
        if let Some(pk) = public_key {
            params.push(("public_key", pk.to_string()));
        }
        let callback = Url::parse_with_params(APP_URL, &params).expect("callback URL");
        self.host.set_current_url(callback.as_str());
        self.wallet
            .complete_sign_in()
            .await
            .expect("complete_sign_in")
    }

    /// The connected account handle, after a completed sign-in.
    pub fn account(&self) -> WalletAccount {
        self.wallet.account().expect("signed-in fixture account")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
