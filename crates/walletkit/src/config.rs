//! Configuration for the wallet connection.

use std::time::Duration;

/// Configuration for a [`crate::WalletConnection`].
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Network the wallet operates on (e.g. "mainnet", "testnet").
    pub network_id: String,

    /// Base URL of the external wallet broker.
    pub wallet_base_url: String,

    /// Application prefix namespacing the persisted session entry.
    pub app_key_prefix: String,

    /// Guard on the broker handoff: how long to wait after invoking the
    /// redirect before concluding control never left the process.
    pub redirect_guard: Duration,
}

impl WalletConfig {
    /// Create a config with the default one-second redirect guard.
    pub fn new(
        network_id: impl Into<String>,
        wallet_base_url: impl Into<String>,
        app_key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            network_id: network_id.into(),
            wallet_base_url: wallet_base_url.into(),
            app_key_prefix: app_key_prefix.into(),
            redirect_guard: Duration::from_secs(1),
        }
    }

    /// Override the redirect guard.
    pub fn with_redirect_guard(mut self, guard: Duration) -> Self {
        self.redirect_guard = guard;
        self
    }
}
