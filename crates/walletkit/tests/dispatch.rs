//! Transaction dispatch: local signing, the allowance-exhausted retry,
//! and the broker handoff when no locally usable key exists.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use walletkit::keystore::{InMemoryKeyStore, KeyStore};
use walletkit::provider::{MemoryProvider, RejectionKind};
use walletkit::{
    AccessKey, Action, KeyPair, MemoryHost, PublicKey, Transaction, WalletConfig,
    WalletConnection, WalletError,
};

const APP_URL: &str = "https://app.example.org/";

struct Harness {
    key_store: Arc<InMemoryKeyStore>,
    provider: Arc<MemoryProvider>,
    host: Arc<MemoryHost>,
    wallet: Arc<WalletConnection>,
}

fn harness() -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let key_store = Arc::new(InMemoryKeyStore::new());
    let provider = Arc::new(MemoryProvider::new());
    let host = Arc::new(MemoryHost::new(APP_URL));
    let config = WalletConfig::new("testnet", "https://wallet.example.org", "my-app")
        .with_redirect_guard(Duration::from_millis(10));
    let wallet = Arc::new(
        WalletConnection::new(
            config,
            key_store.clone(),
            provider.clone(),
            host.clone(),
        )
        .unwrap(),
    );
    Harness {
        key_store,
        provider,
        host,
        wallet,
    }
}

impl Harness {
    /// Mark the wallet signed in as `account_id` with `all_keys` known to
    /// the broker.
    async fn signed_in(&self, account_id: &str, all_keys: &[PublicKey]) {
        let joined = all_keys
            .iter()
            .map(PublicKey::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = Url::parse_with_params(
            APP_URL,
            &[("account_id", account_id), ("all_keys", &joined)],
        )
        .unwrap();
        self.host.set_current_url(url.as_str());
        assert!(self.wallet.complete_sign_in().await.unwrap());
    }

    /// Store a keypair locally and register it with the provider under the
    /// given access key.
    async fn seed_local_key(&self, account_id: &str, access_key: AccessKey) -> KeyPair {
        let keypair = KeyPair::generate();
        self.key_store
            .set_key("testnet", account_id, &keypair)
            .await
            .unwrap();
        self.provider
            .register_access_key(account_id, keypair.public_key(), access_key);
        keypair
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn local_full_access_key_signs_and_submits() {
    let h = harness();
    h.provider.register_account("alice.test");
    let keypair = h
        .seed_local_key("alice.test", AccessKey::full_access().with_nonce(41))
        .await;
    h.signed_in("alice.test", &[keypair.public_key()]).await;

    let account = h.wallet.account().unwrap();
    let outcome = account
        .sign_and_send_transaction("app.test", vec![Action::transfer(100)])
        .await
        .unwrap();
    assert!(!outcome.transaction_hash.is_empty());

    let submitted = h.provider.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0].transaction;
    assert_eq!(tx.signer_id, "alice.test");
    assert_eq!(tx.receiver_id, "app.test");
    assert_eq!(tx.nonce, 42);
    assert_eq!(tx.public_key, keypair.public_key());
    submitted[0].verify().expect("signature must verify");

    // Nothing was handed to the broker.
    assert!(h.host.navigations().is_empty());
}

#[tokio::test]
async fn scoped_local_key_signs_matching_call() {
    let h = harness();
    h.provider.register_account("alice.test");
    let keypair = h
        .seed_local_key(
            "alice.test",
            AccessKey::function_call("app.test", vec!["vote".into()], Some(100)),
        )
        .await;
    h.signed_in("alice.test", &[keypair.public_key()]).await;

    let account = h.wallet.account().unwrap();
    account
        .sign_and_send_transaction(
            "app.test",
            vec![Action::function_call("vote", b"{}".to_vec(), 1_000, 0)],
        )
        .await
        .unwrap();
    assert_eq!(h.provider.submitted().len(), 1);
}

#[tokio::test]
async fn no_matching_key_is_an_error_not_a_redirect() {
    let h = harness();
    h.provider.register_account("alice.test");
    let keypair = h
        .seed_local_key(
            "alice.test",
            AccessKey::function_call("app.test", vec!["vote".into()], None),
        )
        .await;
    h.signed_in("alice.test", &[keypair.public_key()]).await;

    // Wrong receiver for the only key.
    let account = h.wallet.account().unwrap();
    let err = account
        .sign_and_send_transaction(
            "other.test",
            vec![Action::function_call("vote", b"{}".to_vec(), 1_000, 0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::NoUsableKey { .. }));
    assert!(h.host.navigations().is_empty());
    assert!(h.provider.submitted().is_empty());
}

#[tokio::test]
async fn broker_only_key_hands_off_via_redirect() {
    let h = harness();
    h.provider.register_account("alice.test");

    // The broker holds a full-access key; nothing is stored locally.
    let broker_key = KeyPair::from_seed(&[3u8; 32]).public_key();
    h.provider
        .register_access_key("alice.test", broker_key, AccessKey::full_access().with_nonce(7));
    h.signed_in("alice.test", &[broker_key]).await;

    let account = h.wallet.account().unwrap();
    let err = account
        .sign_and_send_transaction("app.test", vec![Action::transfer(5)])
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::BrokerHandoffIncomplete));

    let nav = h.host.last_navigation().expect("a navigation to the broker");
    assert!(nav.as_str().starts_with("https://wallet.example.org/sign"));
    assert_eq!(query_param(&nav, "callbackUrl").as_deref(), Some(APP_URL));

    // The handed-off envelope names the broker's key and its next nonce.
    let encoded = query_param(&nav, "transactions").unwrap();
    let tx = Transaction::from_base64(&encoded).unwrap();
    assert_eq!(tx.signer_id, "alice.test");
    assert_eq!(tx.public_key, broker_key);
    assert_eq!(tx.nonce, 8);
    assert!(h.provider.submitted().is_empty());
}

#[tokio::test]
async fn allowance_exhaustion_retries_with_broker_key() {
    let h = harness();
    h.provider.register_account("alice.test");

    let local = h
        .seed_local_key(
            "alice.test",
            AccessKey::function_call("app.test", vec![], Some(1)),
        )
        .await;
    let broker_key = KeyPair::from_seed(&[6u8; 32]).public_key();
    h.provider
        .register_access_key("alice.test", broker_key, AccessKey::full_access());
    h.signed_in("alice.test", &[local.public_key(), broker_key])
        .await;

    h.provider.fail_next_submit(RejectionKind::NotEnoughAllowance);

    let account = h.wallet.account().unwrap();
    let err = account
        .sign_and_send_transaction(
            "app.test",
            vec![Action::function_call("vote", b"{}".to_vec(), 1_000, 0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::BrokerHandoffIncomplete));

    // Reselection skipped the exhausted local key.
    let encoded = query_param(&h.host.last_navigation().unwrap(), "transactions").unwrap();
    let tx = Transaction::from_base64(&encoded).unwrap();
    assert_eq!(tx.public_key, broker_key);
}

#[tokio::test]
async fn allowance_exhaustion_with_no_fallback_key_errors() {
    let h = harness();
    h.provider.register_account("alice.test");
    let local = h
        .seed_local_key(
            "alice.test",
            AccessKey::function_call("app.test", vec![], Some(1)),
        )
        .await;
    h.signed_in("alice.test", &[local.public_key()]).await;

    h.provider.fail_next_submit(RejectionKind::NotEnoughAllowance);

    let account = h.wallet.account().unwrap();
    let err = account
        .sign_and_send_transaction(
            "app.test",
            vec![Action::function_call("vote", b"{}".to_vec(), 1_000, 0)],
        )
        .await
        .unwrap_err();
    // The exhausted key is the only candidate; reselection without it
    // finds nothing.
    assert!(matches!(err, WalletError::NoUsableKey { .. }));
    assert!(h.host.navigations().is_empty());
}

#[tokio::test]
async fn non_allowance_rejection_propagates() {
    let h = harness();
    h.provider.register_account("alice.test");
    let keypair = h
        .seed_local_key("alice.test", AccessKey::full_access())
        .await;
    h.signed_in("alice.test", &[keypair.public_key()]).await;

    h.provider.fail_next_submit(RejectionKind::InvalidNonce);

    let account = h.wallet.account().unwrap();
    let err = account
        .sign_and_send_transaction("app.test", vec![Action::transfer(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Provider(_)));
    assert!(h.host.navigations().is_empty());
}

#[tokio::test]
async fn selection_prefers_local_key_over_broker_order() {
    let h = harness();
    h.provider.register_account("alice.test");

    // Broker lists a full-access key before the local one.
    let broker_key = KeyPair::from_seed(&[8u8; 32]).public_key();
    h.provider
        .register_access_key("alice.test", broker_key, AccessKey::full_access());
    let local = h
        .seed_local_key("alice.test", AccessKey::full_access())
        .await;
    h.signed_in("alice.test", &[broker_key, local.public_key()])
        .await;

    let account = h.wallet.account().unwrap();
    let selected = account
        .access_key_for_transaction(
            "app.test",
            &[Action::transfer(1)],
            Some(local.public_key()),
        )
        .await
        .unwrap()
        .expect("a candidate");
    assert_eq!(selected.public_key, local.public_key());
}

#[tokio::test]
async fn selection_falls_back_to_network_order_of_session_keys() {
    let h = harness();
    h.provider.register_account("alice.test");

    let first = KeyPair::from_seed(&[10u8; 32]).public_key();
    let second = KeyPair::from_seed(&[11u8; 32]).public_key();
    // Only the second is scoped to the receiver; the first does not match.
    h.provider.register_access_key(
        "alice.test",
        first,
        AccessKey::function_call("other.test", vec![], None),
    );
    h.provider
        .register_access_key("alice.test", second, AccessKey::full_access());
    h.signed_in("alice.test", &[first, second]).await;

    let account = h.wallet.account().unwrap();
    let selected = account
        .access_key_for_transaction("app.test", &[Action::transfer(1)], None)
        .await
        .unwrap()
        .expect("a candidate");
    assert_eq!(selected.public_key, second);
}

#[tokio::test]
async fn broker_known_keys_not_in_session_are_ignored() {
    let h = harness();
    h.provider.register_account("alice.test");

    let stray = KeyPair::from_seed(&[12u8; 32]).public_key();
    h.provider
        .register_access_key("alice.test", stray, AccessKey::full_access());
    // Session knows no keys.
    h.signed_in("alice.test", &[]).await;

    let account = h.wallet.account().unwrap();
    let selected = account
        .access_key_for_transaction("app.test", &[Action::transfer(1)], None)
        .await
        .unwrap();
    assert!(selected.is_none());
}
