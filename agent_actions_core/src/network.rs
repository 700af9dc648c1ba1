use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The chain an agent is operating on.
///
/// Providers use this to decide whether their actions apply at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    /// Chain family, e.g. `solana` or `evm`.
    pub protocol_family: String,
    /// Specific network, e.g. `solana-mainnet`.
    pub network_id: String,
}

pub const SOLANA_FAMILY: &str = "solana";
pub const EVM_FAMILY: &str = "evm";

const KNOWN_NETWORKS: &[(&str, &str)] = &[
    ("solana-mainnet", SOLANA_FAMILY),
    ("solana-devnet", SOLANA_FAMILY),
    ("solana-testnet", SOLANA_FAMILY),
    ("base-mainnet", EVM_FAMILY),
    ("base-sepolia", EVM_FAMILY),
];

impl Network {
    pub fn new(protocol_family: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            protocol_family: protocol_family.into(),
            network_id: network_id.into(),
        }
    }

    pub fn solana_mainnet() -> Self {
        Self::new(SOLANA_FAMILY, "solana-mainnet")
    }

    pub fn solana_devnet() -> Self {
        Self::new(SOLANA_FAMILY, "solana-devnet")
    }

    pub fn solana_testnet() -> Self {
        Self::new(SOLANA_FAMILY, "solana-testnet")
    }

    pub fn base_mainnet() -> Self {
        Self::new(EVM_FAMILY, "base-mainnet")
    }

    pub fn is_solana(&self) -> bool {
        self.protocol_family == SOLANA_FAMILY
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    /// Parses a well-known network id such as `solana-devnet`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KNOWN_NETWORKS
            .iter()
            .find(|(id, _)| *id == s)
            .map(|(id, family)| Self::new(*family, *id))
            .ok_or_else(|| ConfigError::UnknownNetwork(s.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.network_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids() {
        let network: Network = "solana-mainnet".parse().unwrap();
        assert_eq!(network, Network::solana_mainnet());
        assert!(network.is_solana());

        let base: Network = "base-mainnet".parse().unwrap();
        assert_eq!(base.protocol_family, EVM_FAMILY);
        assert!(!base.is_solana());
    }

    #[test]
    fn unknown_id_is_a_config_error() {
        let err = "moonchain".parse::<Network>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownNetwork("moonchain".to_string()));
    }

    #[test]
    fn displays_as_network_id() {
        assert_eq!(Network::solana_devnet().to_string(), "solana-devnet");
        let parsed: Network = Network::base_mainnet().to_string().parse().unwrap();
        assert_eq!(parsed, Network::base_mainnet());
    }
}
