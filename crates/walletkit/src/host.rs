//! Host environment capability: session storage plus navigation.
//!
//! The wallet never reaches for ambient global state. Whatever the host
//! offers for "storage that survives a full reload" and "navigate away and
//! come back" is injected at construction behind this trait. A browser
//! embedding backs it with local storage and the location API; tests and
//! headless embedders use [`MemoryHost`]; hosts with neither capability use
//! [`DetachedHost`] and get a wallet that reports signed-out instead of
//! failing at a distance.
//!
//! Storage operations are synchronous: the persisted medium is a small
//! key-value namespace, and sign-out clears it without suspension.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use url::Url;

/// Errors from the host capability.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host does not provide this capability.
    #[error("host capability unavailable: {0}")]
    Unsupported(&'static str),

    /// The capability exists but the operation failed.
    #[error("host error: {0}")]
    Other(String),
}

/// Session storage and navigation, as one injected capability.
pub trait HostEnvironment: Send + Sync {
    /// Read a persisted value.
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError>;

    /// Persist a value. Survives a full process restart on real hosts.
    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError>;

    /// Remove a persisted value. No-op if absent.
    fn remove_item(&self, key: &str) -> Result<(), HostError>;

    /// The URL the host is currently showing.
    fn current_url(&self) -> Result<Url, HostError>;

    /// Navigate away to `url`, transferring control out of this process.
    /// On a real browser host this does not return to the caller's flow.
    fn navigate(&self, url: &Url) -> Result<(), HostError>;

    /// Replace the current URL without navigating (used to strip transient
    /// resumption parameters so a reload cannot replay them).
    fn replace_url(&self, url: &Url) -> Result<(), HostError>;
}

/// In-memory host for tests and embedders that drive redirects themselves.
///
/// Navigations are recorded rather than performed; `current_url` stays at
/// whatever the test last set, mimicking the page the process is "on".
pub struct MemoryHost {
    storage: Mutex<HashMap<String, String>>,
    current_url: Mutex<Url>,
    navigations: Mutex<Vec<Url>>,
}

impl MemoryHost {
    /// Create a host "showing" the given URL.
    ///
    /// # Panics
    ///
    /// Panics if `current_url` is not a valid absolute URL.
    pub fn new(current_url: &str) -> Self {
        Self {
            storage: Mutex::new(HashMap::new()),
            current_url: Mutex::new(Url::parse(current_url).expect("valid URL")),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Point the host at a different URL, as if a redirect landed here.
    pub fn set_current_url(&self, url: &str) {
        *self.current_url.lock().unwrap() = Url::parse(url).expect("valid URL");
    }

    /// All navigations requested so far, oldest first.
    pub fn navigations(&self) -> Vec<Url> {
        self.navigations.lock().unwrap().clone()
    }

    /// The most recent navigation, if any.
    pub fn last_navigation(&self) -> Option<Url> {
        self.navigations.lock().unwrap().last().cloned()
    }
}

impl HostEnvironment for MemoryHost {
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.storage.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.storage
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), HostError> {
        self.storage.lock().unwrap().remove(key);
        Ok(())
    }

    fn current_url(&self) -> Result<Url, HostError> {
        Ok(self.current_url.lock().unwrap().clone())
    }

    fn navigate(&self, url: &Url) -> Result<(), HostError> {
        self.navigations.lock().unwrap().push(url.clone());
        Ok(())
    }

    fn replace_url(&self, url: &Url) -> Result<(), HostError> {
        *self.current_url.lock().unwrap() = url.clone();
        Ok(())
    }
}

/// The typed reduced variant for hosts with no storage or navigation.
///
/// Storage reads report absence, so a wallet constructed over this host
/// simply reports `is_signed_in() == false`; anything that would persist
/// or navigate fails fast with [`HostError::Unsupported`].
pub struct DetachedHost;

impl HostEnvironment for DetachedHost {
    fn get_item(&self, _key: &str) -> Result<Option<String>, HostError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("session storage"))
    }

    fn remove_item(&self, _key: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("session storage"))
    }

    fn current_url(&self) -> Result<Url, HostError> {
        Err(HostError::Unsupported("navigation"))
    }

    fn navigate(&self, _url: &Url) -> Result<(), HostError> {
        Err(HostError::Unsupported("navigation"))
    }

    fn replace_url(&self, _url: &Url) -> Result<(), HostError> {
        Err(HostError::Unsupported("navigation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_host_storage() {
        let host = MemoryHost::new("https://app.example.org/");
        assert!(host.get_item("k").unwrap().is_none());

        host.set_item("k", "v").unwrap();
        assert_eq!(host.get_item("k").unwrap().as_deref(), Some("v"));

        host.remove_item("k").unwrap();
        assert!(host.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_host_records_navigations() {
        let host = MemoryHost::new("https://app.example.org/");
        let target = Url::parse("https://wallet.example.org/login/").unwrap();
        host.navigate(&target).unwrap();

        assert_eq!(host.last_navigation(), Some(target));
        // Navigation does not move the "current page"; the process ends
        // there on a real host.
        assert_eq!(
            host.current_url().unwrap().as_str(),
            "https://app.example.org/"
        );
    }

    #[test]
    fn test_detached_host_reads_absent_writes_fail() {
        let host = DetachedHost;
        assert!(host.get_item("anything").unwrap().is_none());
        assert!(matches!(
            host.set_item("k", "v"),
            Err(HostError::Unsupported(_))
        ));
        assert!(matches!(host.current_url(), Err(HostError::Unsupported(_))));
    }
}
