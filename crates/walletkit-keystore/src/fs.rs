//! Filesystem implementation of the KeyStore trait.
//!
//! Credentials are stored unencrypted, one JSON file per account, at
//! `<key_dir>/<network_id>/<account_id>.json`. The layout is meant to be
//! shared with command-line tooling, so the file is plain text with the
//! string key encodings.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use walletkit_core::KeyPair;

use crate::error::{KeyStoreError, Result};
use crate::traits::KeyStore;

/// The on-disk credential record.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    account_id: String,
    public_key: String,
    secret_key: String,
}

/// Keystore backed by unencrypted JSON credential files.
pub struct FileSystemKeyStore {
    key_dir: PathBuf,
}

impl FileSystemKeyStore {
    /// Create a store rooted at `key_dir`. The directory is created lazily
    /// on the first write.
    pub fn new(key_dir: impl Into<PathBuf>) -> Self {
        Self {
            key_dir: key_dir.into(),
        }
    }

    /// The base directory for credential files.
    pub fn key_dir(&self) -> &Path {
        &self.key_dir
    }

    fn key_file_path(&self, network_id: &str, account_id: &str) -> PathBuf {
        self.key_dir
            .join(network_id)
            .join(format!("{account_id}.json"))
    }
}

#[async_trait]
impl KeyStore for FileSystemKeyStore {
    async fn set_key(&self, network_id: &str, account_id: &str, keypair: &KeyPair) -> Result<()> {
        let network_dir = self.key_dir.join(network_id);
        fs::create_dir_all(&network_dir).await?;

        let record = CredentialFile {
            account_id: account_id.to_string(),
            public_key: keypair.public_key().to_string(),
            secret_key: keypair.to_secret_string(),
        };
        let contents = serde_json::to_vec_pretty(&record)
            .map_err(|e| KeyStoreError::Serialization(e.to_string()))?;

        let path = self.key_file_path(network_id, account_id);
        fs::write(&path, contents).await?;
        debug!(network_id, account_id, path = %path.display(), "stored credential file");
        Ok(())
    }

    async fn get_key(&self, network_id: &str, account_id: &str) -> Result<Option<KeyPair>> {
        let path = self.key_file_path(network_id, account_id);
        let contents = match fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: CredentialFile = serde_json::from_slice(&contents).map_err(|e| {
            KeyStoreError::InvalidData(format!(
                "credential file {} is not valid JSON: {e}",
                path.display()
            ))
        })?;
        let keypair = KeyPair::from_secret_string(&record.secret_key)?;
        Ok(Some(keypair))
    }

    async fn remove_key(&self, network_id: &str, account_id: &str) -> Result<()> {
        let path = self.key_file_path(network_id, account_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        for network_id in self.get_networks().await? {
            for account_id in self.get_accounts(&network_id).await? {
                self.remove_key(&network_id, &account_id).await?;
            }
        }
        Ok(())
    }

    async fn get_networks(&self) -> Result<Vec<String>> {
        let mut networks = Vec::new();
        let mut entries = match fs::read_dir(&self.key_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(networks),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    networks.push(name.to_string());
                }
            }
        }
        Ok(networks)
    }

    async fn get_accounts(&self, network_id: &str) -> Result<Vec<String>> {
        let mut accounts = Vec::new();
        let network_dir = self.key_dir.join(network_id);
        let mut entries = match fs::read_dir(&network_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(accounts),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(account_id) = name.strip_suffix(".json") {
                accounts.push(account_id.to_string());
            }
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_roundtrip_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemKeyStore::new(dir.path());
        let keypair = KeyPair::from_seed(&[11u8; 32]);

        store.set_key("testnet", "alice.test", &keypair).await.unwrap();

        let got = store.get_key("testnet", "alice.test").await.unwrap().unwrap();
        assert_eq!(got.public_key(), keypair.public_key());
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemKeyStore::new(dir.path());
        assert!(store.get_key("testnet", "nobody.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enumeration_from_directory_layout() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemKeyStore::new(dir.path());
        let keypair = KeyPair::generate();

        store.set_key("testnet", "alice.test", &keypair).await.unwrap();
        store.set_key("mainnet", "alice.main", &keypair).await.unwrap();

        let mut networks = store.get_networks().await.unwrap();
        networks.sort();
        assert_eq!(networks, vec!["mainnet", "testnet"]);

        let accounts = store.get_accounts("testnet").await.unwrap();
        assert_eq!(accounts, vec!["alice.test"]);
    }

    #[tokio::test]
    async fn test_corrupt_credential_file_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemKeyStore::new(dir.path());

        let network_dir = dir.path().join("testnet");
        std::fs::create_dir_all(&network_dir).unwrap();
        std::fs::write(network_dir.join("alice.test.json"), b"not json").unwrap();

        let err = store.get_key("testnet", "alice.test").await.unwrap_err();
        assert!(matches!(err, KeyStoreError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_clear_removes_every_credential() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemKeyStore::new(dir.path());
        let keypair = KeyPair::generate();

        store.set_key("testnet", "alice.test", &keypair).await.unwrap();
        store.set_key("mainnet", "bob.main", &keypair).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.get_key("testnet", "alice.test").await.unwrap().is_none());
        assert!(store.get_key("mainnet", "bob.main").await.unwrap().is_none());
    }
}
