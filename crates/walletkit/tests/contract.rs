//! Contract bindings: view/change routing through the method table.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use walletkit::keystore::{InMemoryKeyStore, KeyStore};
use walletkit::provider::MemoryProvider;
use walletkit::{
    AccessKey, Action, CallOptions, CallResult, Contract, KeyPair, MemoryHost, MethodKind,
    WalletConfig, WalletConnection, WalletError,
};

use walletkit::contract::DEFAULT_FUNCTION_CALL_GAS;

const APP_URL: &str = "https://app.example.org/";

async fn connected_wallet() -> (Arc<MemoryProvider>, Arc<WalletConnection>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let key_store = Arc::new(InMemoryKeyStore::new());
    let provider = Arc::new(MemoryProvider::new());
    let host = Arc::new(MemoryHost::new(APP_URL));
    let config = WalletConfig::new("testnet", "https://wallet.example.org", "my-app")
        .with_redirect_guard(Duration::from_millis(10));
    let wallet = Arc::new(
        WalletConnection::new(config, key_store.clone(), provider.clone(), host.clone())
            .unwrap(),
    );

    provider.register_account("alice.test");
    provider.register_account("app.test");
    let keypair = KeyPair::generate();
    key_store
        .set_key("testnet", "alice.test", &keypair)
        .await
        .unwrap();
    provider.register_access_key("alice.test", keypair.public_key(), AccessKey::full_access());

    let url = Url::parse_with_params(
        APP_URL,
        &[
            ("account_id", "alice.test".to_string()),
            ("all_keys", keypair.public_key().to_string()),
        ],
    )
    .unwrap();
    host.set_current_url(url.as_str());
    assert!(wallet.complete_sign_in().await.unwrap());

    (provider, wallet)
}

fn voting_contract(wallet: &Arc<WalletConnection>) -> Contract {
    Contract::new(wallet.account().unwrap(), "app.test", &["tally"], &["vote"])
}

#[tokio::test]
async fn view_method_routes_to_view_call() {
    let (provider, wallet) = connected_wallet().await;
    let contract = voting_contract(&wallet);
    provider.set_view_result("app.test", "tally", b"42".to_vec());

    let result = contract
        .call("tally", b"{}".to_vec(), CallOptions::default())
        .await
        .unwrap();
    match result {
        CallResult::View(bytes) => assert_eq!(bytes, b"42"),
        other => panic!("expected a view result, got {other:?}"),
    }

    // No transaction was dispatched.
    assert!(provider.submitted().is_empty());
    assert_eq!(provider.view_calls().len(), 1);
}

#[tokio::test]
async fn change_method_dispatches_single_function_call() {
    let (provider, wallet) = connected_wallet().await;
    let contract = voting_contract(&wallet);

    let result = contract
        .call("vote", b"{\"id\":1}".to_vec(), CallOptions::default())
        .await
        .unwrap();
    assert!(matches!(result, CallResult::Change(_)));

    let submitted = provider.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0].transaction;
    assert_eq!(tx.receiver_id, "app.test");
    match &tx.actions[..] {
        [Action::FunctionCall {
            method_name,
            gas,
            deposit,
            ..
        }] => {
            assert_eq!(method_name, "vote");
            assert_eq!(*gas, DEFAULT_FUNCTION_CALL_GAS);
            assert_eq!(*deposit, 0);
        }
        other => panic!("expected one function call, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let (_provider, wallet) = connected_wallet().await;
    let contract = voting_contract(&wallet);

    let err = contract
        .call("burn", vec![], CallOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::UnknownMethod(_)));
}

#[tokio::test]
async fn method_registered_as_both_resolves_to_change() {
    let (_provider, wallet) = connected_wallet().await;
    let contract = Contract::new(wallet.account().unwrap(), "app.test", &["vote"], &["vote"]);
    assert_eq!(contract.method_kind("vote"), Some(MethodKind::Change));
}
