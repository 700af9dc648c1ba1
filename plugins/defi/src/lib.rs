//! DeFi lookups for the agent toolkit.
//!
//! Includes: token price quotes from a Jupiter-style price API.

use std::sync::Arc;

use agent_actions_core::{Action, ActionProvider, Network, RetryPolicy};

mod feed;
mod price;

pub use feed::{HttpPriceFeed, PriceFeed, PriceQuote};
pub use price::GetTokenPriceAction;

pub const PROVIDER_NAME: &str = "defi";

pub struct DefiProvider {
    actions: Vec<Arc<dyn Action>>,
}

impl DefiProvider {
    /// `retry` governs every call the actions make to `feed`.
    pub fn new(feed: Arc<dyn PriceFeed>, retry: RetryPolicy) -> Self {
        let actions: Vec<Arc<dyn Action>> = vec![Arc::new(GetTokenPriceAction::new(feed, retry))];
        Self { actions }
    }
}

impl ActionProvider for DefiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    /// Price data only exists for mainnet assets.
    fn supports_network(&self, network: &Network) -> bool {
        *network == Network::solana_mainnet()
    }
}
