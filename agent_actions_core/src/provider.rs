use std::sync::Arc;

use crate::actions::Action;
use crate::network::Network;

/// A named, immutable group of related actions.
///
/// Providers are built once at startup. Network filtering is all or nothing:
/// a provider either offers every action on a network or none of them.
pub trait ActionProvider: Send + Sync {
    fn name(&self) -> &str;

    fn actions(&self) -> &[Arc<dyn Action>];

    fn supports_network(&self, _network: &Network) -> bool {
        true
    }

    /// Actions to expose, in declaration order.
    ///
    /// With no network every action is returned.
    fn get_actions(&self, network: Option<&Network>) -> Vec<Arc<dyn Action>> {
        match network {
            Some(network) if !self.supports_network(network) => Vec::new(),
            _ => self.actions().to_vec(),
        }
    }
}

/// A provider assembled from a list of actions at startup.
pub struct StaticProvider {
    name: String,
    actions: Vec<Arc<dyn Action>>,
    network_filter: Option<fn(&Network) -> bool>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, actions: Vec<Arc<dyn Action>>) -> Self {
        Self {
            name: name.into(),
            actions,
            network_filter: None,
        }
    }

    #[must_use]
    pub fn with_network_filter(mut self, filter: fn(&Network) -> bool) -> Self {
        self.network_filter = Some(filter);
        self
    }
}

impl ActionProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn supports_network(&self, network: &Network) -> bool {
        self.network_filter.map_or(true, |filter| filter(network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EchoAction;

    fn solana_only() -> StaticProvider {
        StaticProvider::new(
            "solana_only",
            vec![EchoAction::shared("first"), EchoAction::shared("second")],
        )
        .with_network_filter(Network::is_solana)
    }

    #[test]
    fn unsupported_network_yields_nothing() {
        let provider = solana_only();
        assert!(provider.get_actions(Some(&Network::base_mainnet())).is_empty());
    }

    #[test]
    fn supported_network_yields_everything_in_order() {
        let provider = solana_only();
        let names: Vec<String> = provider
            .get_actions(Some(&Network::solana_devnet()))
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn no_network_means_no_filtering() {
        let provider = solana_only();
        assert_eq!(provider.get_actions(None).len(), 2);
    }

    #[test]
    fn providers_support_every_network_by_default() {
        let provider = StaticProvider::new("open", vec![EchoAction::shared("echo")]);
        assert!(provider.supports_network(&Network::base_mainnet()));
        assert_eq!(provider.get_actions(Some(&Network::base_mainnet())).len(), 1);
    }
}
