//! Wallet connection: sign-in/out lifecycle and the broker redirect
//! protocol.
//!
//! The broker is an external signing agent reached via full navigation.
//! Outbound, the wallet builds a URL carrying the request; inbound (after
//! the round trip), [`WalletConnection::complete_sign_in`] reconciles the
//! returned identity and keys into the session and key store, promoting
//! the pending key to its permanent slot.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};
use url::Url;

use walletkit_core::{KeyPair, PublicKey, Transaction};
use walletkit_keystore::KeyStore;
use walletkit_provider::Provider;

use crate::account::WalletAccount;
use crate::config::WalletConfig;
use crate::error::{Result, WalletError};
use crate::host::HostEnvironment;
use crate::session::{auth_data_key, pending_key_id, AuthSession};

const LOGIN_URL_SUFFIX: &str = "/login/";
const SIGN_URL_SUFFIX: &str = "/sign";

/// Resumption parameters the broker appends to the callback URL. Stripped
/// after processing so a reload cannot replay them.
const RESUMPTION_PARAMS: [&str; 5] = [
    "public_key",
    "all_keys",
    "account_id",
    "meta",
    "transactionHashes",
];

/// Parameters of a sign-in request.
#[derive(Debug, Clone, Default)]
pub struct SignInRequest {
    /// Contract the application wants a scoped key for. With no contract
    /// id, sign-in only establishes identity and adds no key.
    pub contract_id: Option<String>,

    /// Method names to scope the requested key to; empty means any.
    pub method_names: Vec<String>,

    /// Where the broker should land on success. Defaults to the current
    /// URL.
    pub success_url: Option<Url>,

    /// Where the broker should land on failure. Defaults to the current
    /// URL.
    pub failure_url: Option<Url>,
}

/// A connection to the external wallet broker for one application.
///
/// Holds the persisted [`AuthSession`] and the key store; hands out
/// [`WalletAccount`] handles for transaction dispatch.
pub struct WalletConnection {
    config: WalletConfig,
    key_store: Arc<dyn KeyStore>,
    provider: Arc<dyn Provider>,
    host: Arc<dyn HostEnvironment>,
    auth_data_key: String,
    session: Mutex<AuthSession>,
}

impl WalletConnection {
    /// Create a connection, loading any session persisted under the
    /// configured application prefix.
    pub fn new(
        config: WalletConfig,
        key_store: Arc<dyn KeyStore>,
        provider: Arc<dyn Provider>,
        host: Arc<dyn HostEnvironment>,
    ) -> Result<Self> {
        let auth_data_key = auth_data_key(&config.app_key_prefix);
        let session = match host.get_item(&auth_data_key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| WalletError::InvalidSession(e.to_string()))?,
            None => AuthSession::default(),
        };
        Ok(Self {
            config,
            key_store,
            provider,
            host,
            auth_data_key,
            session: Mutex::new(session),
        })
    }

    /// Whether this connection is authorized with the broker.
    pub fn is_signed_in(&self) -> bool {
        self.session.lock().unwrap().is_signed_in()
    }

    /// The authorized account id, if signed in.
    pub fn account_id(&self) -> Option<String> {
        self.session.lock().unwrap().account_id.clone()
    }

    /// The set of public keys the broker considers valid for the account.
    pub fn session_keys(&self) -> Vec<PublicKey> {
        self.session.lock().unwrap().all_keys.clone()
    }

    /// The network this connection operates on.
    pub fn network_id(&self) -> &str {
        &self.config.network_id
    }

    pub(crate) fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub(crate) fn key_store(&self) -> &Arc<dyn KeyStore> {
        &self.key_store
    }

    pub(crate) fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// The connected account for transaction dispatch.
    ///
    /// Fails with [`WalletError::NotSignedIn`] before a completed sign-in.
    pub fn account(self: &Arc<Self>) -> Result<WalletAccount> {
        let account_id = self.account_id().ok_or(WalletError::NotSignedIn)?;
        Ok(WalletAccount::new(Arc::clone(self), account_id))
    }

    /// Redirect to the broker's authentication page.
    ///
    /// With a contract id, the target account's existence is verified
    /// first (a failing account aborts before any key is generated or any
    /// navigation happens), a fresh keypair is generated and stored under
    /// its pending identity, and the key plus scope ride along on the URL.
    pub async fn request_sign_in(&self, request: SignInRequest) -> Result<()> {
        let current_url = self.host.current_url()?;
        let mut login_url = self.broker_url(LOGIN_URL_SUFFIX)?;

        {
            let mut params = login_url.query_pairs_mut();
            params.append_pair(
                "success_url",
                request
                    .success_url
                    .as_ref()
                    .unwrap_or(&current_url)
                    .as_str(),
            );
            params.append_pair(
                "failure_url",
                request
                    .failure_url
                    .as_ref()
                    .unwrap_or(&current_url)
                    .as_str(),
            );
        }

        if let Some(contract_id) = &request.contract_id {
            // Errors if the contract account does not exist; nothing has
            // been stored or navigated yet.
            self.provider.view_account(contract_id).await?;

            let access_key = KeyPair::generate();
            let public_key = access_key.public_key();
            login_url
                .query_pairs_mut()
                .append_pair("contract_id", contract_id)
                .append_pair("public_key", &public_key.to_string());
            self.key_store
                .set_key(
                    &self.config.network_id,
                    &pending_key_id(&public_key),
                    &access_key,
                )
                .await?;
            debug!(%public_key, %contract_id, "stored pending access key");
        }

        for method_name in &request.method_names {
            login_url
                .query_pairs_mut()
                .append_pair("methodNames", method_name);
        }

        info!(url = %login_url, "redirecting to wallet broker for sign-in");
        self.host.navigate(&login_url)?;
        Ok(())
    }

    /// Redirect to the broker to sign a batch of prepared transactions.
    pub fn request_sign_transactions(
        &self,
        transactions: &[Transaction],
        meta: Option<&str>,
        callback_url: Option<&Url>,
    ) -> Result<()> {
        let current_url = self.host.current_url()?;
        let mut sign_url = self.broker_url(SIGN_URL_SUFFIX)?;

        let encoded = transactions
            .iter()
            .map(Transaction::to_base64)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .join(",");

        {
            let mut params = sign_url.query_pairs_mut();
            params.append_pair("transactions", &encoded);
            params.append_pair(
                "callbackUrl",
                callback_url.unwrap_or(&current_url).as_str(),
            );
            if let Some(meta) = meta {
                params.append_pair("meta", meta);
            }
        }

        info!(
            count = transactions.len(),
            url = %sign_url,
            "redirecting to wallet broker for signing"
        );
        self.host.navigate(&sign_url)?;
        Ok(())
    }

    /// Complete sign-in after returning from the broker.
    ///
    /// Parses the resumption parameters off the current URL; with an
    /// account id present the session is persisted and, if a public key
    /// also came back, the pending key is promoted to the permanent slot.
    /// The transient parameters are always stripped from the URL so a
    /// reload cannot re-trigger promotion. Returns whether the connection
    /// is signed in afterwards.
    pub async fn complete_sign_in(&self) -> Result<bool> {
        let url = self.host.current_url()?;

        let param = |name: &str| -> Option<String> {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };

        let public_key = param("public_key");
        let all_keys = param("all_keys");
        let account_id = param("account_id");

        if let Some(account_id) = account_id {
            let all_keys = all_keys
                .as_deref()
                .unwrap_or("")
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect::<std::result::Result<Vec<PublicKey>, _>>()?;

            let session = AuthSession {
                account_id: Some(account_id.clone()),
                all_keys,
            };
            let raw = serde_json::to_string(&session)
                .map_err(|e| WalletError::InvalidSession(e.to_string()))?;
            self.host.set_item(&self.auth_data_key, &raw)?;

            if let Some(public_key) = &public_key {
                let public_key: PublicKey = public_key.parse()?;
                self.move_key_from_pending_to_permanent(&account_id, &public_key)
                    .await?;
            }

            info!(%account_id, "sign-in completed");
            *self.session.lock().unwrap() = session;
        }

        self.strip_resumption_params(url)?;
        Ok(self.is_signed_in())
    }

    /// Promote a pending key: copy it to the account's permanent slot,
    /// then delete the pending slot.
    pub async fn move_key_from_pending_to_permanent(
        &self,
        account_id: &str,
        public_key: &PublicKey,
    ) -> Result<()> {
        let network_id = &self.config.network_id;
        let pending_id = pending_key_id(public_key);

        let keypair = self
            .key_store
            .get_key(network_id, &pending_id)
            .await?
            .ok_or_else(|| WalletError::PendingKeyNotFound(public_key.to_string()))?;

        self.key_store
            .set_key(network_id, account_id, &keypair)
            .await?;
        self.key_store.remove_key(network_id, &pending_id).await?;
        info!(%account_id, %public_key, "promoted pending key");
        Ok(())
    }

    /// Sign out: clear the persisted session. Key store entries are left
    /// in place for a future sign-in with the same identity.
    pub fn sign_out(&self) -> Result<()> {
        *self.session.lock().unwrap() = AuthSession::default();
        self.host.remove_item(&self.auth_data_key)?;
        info!("signed out");
        Ok(())
    }

    fn broker_url(&self, suffix: &str) -> Result<Url> {
        let base = self.config.wallet_base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{suffix}"))?)
    }

    fn strip_resumption_params(&self, mut url: Url) -> Result<()> {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !RESUMPTION_PARAMS.contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.set_query(None);
        if !retained.is_empty() {
            url.query_pairs_mut().extend_pairs(retained);
        }
        self.host.replace_url(&url)?;
        Ok(())
    }
}
