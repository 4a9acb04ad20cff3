//! Merged view over an ordered list of key stores.
//!
//! Reads fall through the stores in list order and return the first hit.
//! Writes go to exactly one designated store. `clear` is the documented
//! asymmetry: it empties every composed store, not just the write target.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use walletkit_core::KeyPair;

use crate::error::Result;
use crate::traits::KeyStore;

/// Keystore that merges multiple stores into one virtual store.
///
/// Read calls are attempted from the start to the end of the list; write
/// calls target only the store at `write_index`.
pub struct MergeKeyStore {
    stores: Vec<Arc<dyn KeyStore>>,
    write_index: usize,
}

impl MergeKeyStore {
    /// Compose `stores` with the first store as the write target.
    pub fn new(stores: Vec<Arc<dyn KeyStore>>) -> Self {
        Self::with_write_index(stores, 0)
    }

    /// Compose `stores` with an explicit write target.
    ///
    /// # Panics
    ///
    /// Panics if `write_index` is out of bounds; the composition would be
    /// unusable for every write.
    pub fn with_write_index(stores: Vec<Arc<dyn KeyStore>>, write_index: usize) -> Self {
        assert!(
            write_index < stores.len(),
            "write_index {write_index} out of bounds for {} stores",
            stores.len()
        );
        Self {
            stores,
            write_index,
        }
    }

    fn write_store(&self) -> &Arc<dyn KeyStore> {
        &self.stores[self.write_index]
    }
}

#[async_trait]
impl KeyStore for MergeKeyStore {
    async fn set_key(&self, network_id: &str, account_id: &str, keypair: &KeyPair) -> Result<()> {
        self.write_store().set_key(network_id, account_id, keypair).await
    }

    async fn get_key(&self, network_id: &str, account_id: &str) -> Result<Option<KeyPair>> {
        for (index, store) in self.stores.iter().enumerate() {
            if let Some(keypair) = store.get_key(network_id, account_id).await? {
                debug!(network_id, account_id, index, "merge store hit");
                return Ok(Some(keypair));
            }
        }
        Ok(None)
    }

    async fn remove_key(&self, network_id: &str, account_id: &str) -> Result<()> {
        self.write_store().remove_key(network_id, account_id).await
    }

    async fn clear(&self) -> Result<()> {
        // Intentionally total: every composed store is emptied.
        for store in &self.stores {
            store.clear().await?;
        }
        Ok(())
    }

    async fn get_networks(&self) -> Result<Vec<String>> {
        let mut networks: Vec<String> = Vec::new();
        for store in &self.stores {
            for network in store.get_networks().await? {
                if !networks.contains(&network) {
                    networks.push(network);
                }
            }
        }
        Ok(networks)
    }

    async fn get_accounts(&self, network_id: &str) -> Result<Vec<String>> {
        let mut accounts: Vec<String> = Vec::new();
        for store in &self.stores {
            for account in store.get_accounts(network_id).await? {
                if !accounts.contains(&account) {
                    accounts.push(account);
                }
            }
        }
        Ok(accounts)
    }
}
