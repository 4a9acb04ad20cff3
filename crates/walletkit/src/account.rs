//! The connected account: candidate key selection and transaction
//! dispatch.
//!
//! Dispatch is a small state machine. Try the locally held key first; on
//! the one recoverable rejection (allowance exhausted) rerun selection
//! without the local key; when the only usable key lives with the broker,
//! hand the prepared envelope off via redirect. The redirect never returns
//! within this process, so the tail of that path is a bounded guard rather
//! than a wait for a result.
//!
//! Callers must not interleave concurrent dispatches against the same
//! access key: the nonce is read once from the selected key and used as
//! `nonce + 1` without any locking.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use walletkit_access::access_key_matches_transaction;
use walletkit_core::{AccessKeyView, Action, KeyPair, PublicKey, Transaction};
use walletkit_provider::ExecutionOutcome;

use crate::error::{Result, WalletError};
use crate::wallet::WalletConnection;

/// Broker-related options for a dispatched transaction.
#[derive(Debug, Clone, Default)]
pub struct SignOptions {
    /// Opaque metadata echoed back by the broker on the callback URL.
    pub meta: Option<String>,

    /// Where the broker should return to. Defaults to the current URL.
    pub callback_url: Option<Url>,
}

/// An account whose transactions are authorized through the wallet
/// connection: locally when a stored key covers them, via broker redirect
/// otherwise.
#[derive(Clone)]
pub struct WalletAccount {
    wallet: Arc<WalletConnection>,
    account_id: String,
}

impl WalletAccount {
    pub(crate) fn new(wallet: Arc<WalletConnection>, account_id: String) -> Self {
        Self { wallet, account_id }
    }

    /// The account this handle signs for.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The wallet connection backing this account.
    pub fn wallet(&self) -> &Arc<WalletConnection> {
        &self.wallet
    }

    /// Sign and send a transaction, falling back to the broker redirect
    /// when no locally held key is usable.
    pub async fn sign_and_send_transaction(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
    ) -> Result<ExecutionOutcome> {
        self.sign_and_send_transaction_with(receiver_id, actions, SignOptions::default())
            .await
    }

    /// [`Self::sign_and_send_transaction`] with broker options.
    pub async fn sign_and_send_transaction_with(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
        options: SignOptions,
    ) -> Result<ExecutionOutcome> {
        let network_id = self.wallet.network_id().to_string();
        let local_keypair = self
            .wallet
            .key_store()
            .get_key(&network_id, &self.account_id)
            .await?;
        let local_key = local_keypair.as_ref().map(KeyPair::public_key);

        let mut access_key = self
            .access_key_for_transaction(receiver_id, &actions, local_key)
            .await?
            .ok_or_else(|| WalletError::NoUsableKey {
                receiver_id: receiver_id.to_string(),
            })?;

        if let (Some(keypair), Some(local)) = (&local_keypair, local_key) {
            if access_key.public_key == local {
                match self
                    .submit_with_local_key(keypair, &access_key, receiver_id, &actions)
                    .await
                {
                    Ok(outcome) => return Ok(outcome),
                    Err(WalletError::Provider(e)) if e.is_allowance_exhausted() => {
                        warn!(
                            receiver_id,
                            "local key allowance exhausted, reselecting without it"
                        );
                        // The exhausted key is normally in the session's
                        // key list too; the retry must never pick it again.
                        access_key = self
                            .select_access_key(receiver_id, &actions, None, Some(local))
                            .await?
                            .ok_or_else(|| WalletError::NoUsableKey {
                                receiver_id: receiver_id.to_string(),
                            })?;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        // The selected key is not held locally; prepare the envelope and
        // hand authorization off to the broker.
        let block_hash = self.wallet.provider().recent_block_hash().await?;
        let transaction = Transaction::new(
            self.account_id.clone(),
            access_key.public_key,
            receiver_id,
            access_key.access_key.nonce + 1,
            actions,
            block_hash,
        );
        self.wallet.request_sign_transactions(
            &[transaction],
            options.meta.as_deref(),
            options.callback_url.as_ref(),
        )?;

        // On a real host the navigation above never returns. Reaching the
        // end of this guard means control stayed in-process.
        tokio::time::sleep(self.wallet.config().redirect_guard).await;
        Err(WalletError::BrokerHandoffIncomplete)
    }

    /// Candidate key selection: the local key first, then the broker's
    /// keys in the order the network lists them. First match wins.
    pub async fn access_key_for_transaction(
        &self,
        receiver_id: &str,
        actions: &[Action],
        local_key: Option<PublicKey>,
    ) -> Result<Option<AccessKeyView>> {
        self.select_access_key(receiver_id, actions, local_key, None)
            .await
    }

    /// The selection walk, with an optional hard exclusion used by the
    /// allowance-exhausted retry: an excluded key is skipped even when the
    /// session lists it.
    async fn select_access_key(
        &self,
        receiver_id: &str,
        actions: &[Action],
        local_key: Option<PublicKey>,
        excluded: Option<PublicKey>,
    ) -> Result<Option<AccessKeyView>> {
        let access_keys = self
            .wallet
            .provider()
            .get_access_keys(&self.account_id)
            .await?;

        if let Some(local) = local_key {
            if let Some(view) = access_keys.iter().find(|k| k.public_key == local) {
                if access_key_matches_transaction(
                    &view.access_key,
                    &self.account_id,
                    receiver_id,
                    actions,
                ) {
                    debug!(receiver_id, public_key = %local, "local key selected");
                    return Ok(Some(view.clone()));
                }
            }
        }

        let session_keys = self.wallet.session_keys();
        for view in &access_keys {
            if excluded == Some(view.public_key) {
                continue;
            }
            if session_keys.contains(&view.public_key)
                && access_key_matches_transaction(
                    &view.access_key,
                    &self.account_id,
                    receiver_id,
                    actions,
                )
            {
                debug!(
                    receiver_id,
                    public_key = %view.public_key,
                    "broker-known key selected"
                );
                return Ok(Some(view.clone()));
            }
        }

        Ok(None)
    }

    async fn submit_with_local_key(
        &self,
        keypair: &KeyPair,
        access_key: &AccessKeyView,
        receiver_id: &str,
        actions: &[Action],
    ) -> Result<ExecutionOutcome> {
        let block_hash = self.wallet.provider().recent_block_hash().await?;
        let transaction = Transaction::new(
            self.account_id.clone(),
            access_key.public_key,
            receiver_id,
            access_key.access_key.nonce + 1,
            actions.to_vec(),
            block_hash,
        );
        let signed = transaction.sign(keypair)?;
        let outcome = self.wallet.provider().send_transaction(&signed).await?;
        debug!(
            receiver_id,
            transaction_hash = %outcome.transaction_hash,
            "transaction submitted with local key"
        );
        Ok(outcome)
    }
}
