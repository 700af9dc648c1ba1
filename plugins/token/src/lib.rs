// plugins/token/src/lib.rs
use std::sync::Arc;

use agent_actions_core::{Action, ActionProvider, Agent, Network};
use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use solana_sdk::pubkey::Pubkey;

mod actions;

pub use actions::{GetBalanceAction, GetWalletDetailsAction, TransferAction};

pub const PROVIDER_NAME: &str = "token";

/// The chain-side operations the token actions need.
///
/// Implementations own RPC access and signing; amounts are exact decimals in
/// whole-token units.
#[async_trait]
pub trait TokenActions: Send + Sync {
    async fn transfer(
        &self,
        agent: &Agent,
        to: Pubkey,
        amount: BigDecimal,
        mint: Option<Pubkey>,
    ) -> Result<String>;

    async fn get_balance(&self, agent: &Agent, owner: Pubkey, mint: Option<Pubkey>) -> Result<BigDecimal>;
}

/// Wallet and token actions for Solana networks.
pub struct TokenProvider {
    actions: Vec<Arc<dyn Action>>,
}

impl TokenProvider {
    pub fn new(backend: Arc<dyn TokenActions>) -> Self {
        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(GetWalletDetailsAction::new()),
            Arc::new(GetBalanceAction::new(backend.clone())),
            Arc::new(TransferAction::new(backend)),
        ];
        Self { actions }
    }
}

impl ActionProvider for TokenProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn supports_network(&self, network: &Network) -> bool {
        network.is_solana()
    }
}
