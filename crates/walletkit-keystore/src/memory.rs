//! In-memory implementation of the KeyStore trait.
//!
//! Primarily for tests and ephemeral processes. Same semantics as the
//! filesystem store but nothing survives a drop.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use walletkit_core::KeyPair;

use crate::error::Result;
use crate::traits::KeyStore;

/// In-memory keystore.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<(String, String), KeyPair>>,
}

impl InMemoryKeyStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn set_key(&self, network_id: &str, account_id: &str, keypair: &KeyPair) -> Result<()> {
        let mut keys = self.keys.write().unwrap();
        keys.insert(
            (network_id.to_string(), account_id.to_string()),
            keypair.clone(),
        );
        Ok(())
    }

    async fn get_key(&self, network_id: &str, account_id: &str) -> Result<Option<KeyPair>> {
        let keys = self.keys.read().unwrap();
        Ok(keys
            .get(&(network_id.to_string(), account_id.to_string()))
            .cloned())
    }

    async fn remove_key(&self, network_id: &str, account_id: &str) -> Result<()> {
        let mut keys = self.keys.write().unwrap();
        keys.remove(&(network_id.to_string(), account_id.to_string()));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut keys = self.keys.write().unwrap();
        keys.clear();
        Ok(())
    }

    async fn get_networks(&self) -> Result<Vec<String>> {
        let keys = self.keys.read().unwrap();
        let mut networks: Vec<String> = Vec::new();
        for (network, _) in keys.keys() {
            if !networks.contains(network) {
                networks.push(network.clone());
            }
        }
        Ok(networks)
    }

    async fn get_accounts(&self, network_id: &str) -> Result<Vec<String>> {
        let keys = self.keys.read().unwrap();
        Ok(keys
            .keys()
            .filter(|(network, _)| network == network_id)
            .map(|(_, account)| account.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKeyStore::new();
        let keypair = KeyPair::generate();

        store.set_key("testnet", "alice.test", &keypair).await.unwrap();

        let got = store.get_key("testnet", "alice.test").await.unwrap().unwrap();
        assert_eq!(got.public_key(), keypair.public_key());

        store.remove_key("testnet", "alice.test").await.unwrap();
        assert!(store.get_key("testnet", "alice.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_is_none_not_error() {
        let store = InMemoryKeyStore::new();
        assert!(store.get_key("testnet", "nobody.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let store = InMemoryKeyStore::new();
        store.remove_key("testnet", "nobody.test").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_key_is_idempotent_upsert() {
        let store = InMemoryKeyStore::new();
        let first = KeyPair::from_seed(&[1u8; 32]);
        let second = KeyPair::from_seed(&[2u8; 32]);

        store.set_key("testnet", "alice.test", &first).await.unwrap();
        store.set_key("testnet", "alice.test", &second).await.unwrap();

        let got = store.get_key("testnet", "alice.test").await.unwrap().unwrap();
        assert_eq!(got.public_key(), second.public_key());
    }

    #[tokio::test]
    async fn test_enumeration() {
        let store = InMemoryKeyStore::new();
        let keypair = KeyPair::generate();
        store.set_key("testnet", "alice.test", &keypair).await.unwrap();
        store.set_key("testnet", "bob.test", &keypair).await.unwrap();
        store.set_key("mainnet", "alice.main", &keypair).await.unwrap();

        let mut networks = store.get_networks().await.unwrap();
        networks.sort();
        assert_eq!(networks, vec!["mainnet", "testnet"]);

        let mut accounts = store.get_accounts("testnet").await.unwrap();
        accounts.sort();
        assert_eq!(accounts, vec!["alice.test", "bob.test"]);

        store.clear().await.unwrap();
        assert!(store.get_networks().await.unwrap().is_empty());
    }
}
