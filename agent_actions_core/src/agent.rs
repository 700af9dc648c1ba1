use std::sync::Arc;

use crate::config::ActionsConfig;
use crate::network::Network;
use crate::wallet::Wallet;

/// The execution context handed to every action handler.
///
/// One `Agent` is shared by all tools of a toolkit through an `Arc`; handlers
/// only ever see `&Agent`.
#[derive(Debug, Clone)]
pub struct Agent {
    pub wallet: Arc<dyn Wallet>,
    pub network: Network,
    /// Connection pool used by every HTTP collaborator.
    pub http: reqwest::Client,
}

impl Agent {
    pub fn new(wallet: Arc<dyn Wallet>, network: Network) -> Self {
        Self::with_http(wallet, network, reqwest::Client::new())
    }

    /// Use a preconfigured client, e.g. one with timeouts or a proxy.
    pub fn with_http(wallet: Arc<dyn Wallet>, network: Network, http: reqwest::Client) -> Self {
        Self {
            wallet,
            network,
            http,
        }
    }

    pub fn from_config(wallet: Arc<dyn Wallet>, config: &ActionsConfig) -> Self {
        Self::new(wallet, config.network.clone())
    }

    pub fn address(&self) -> String {
        self.wallet.pubkey().to_string()
    }
}
