use std::str::FromStr;
use std::sync::Arc;

use agent_actions_core::{
    Action, ActionExample, ActionMetadata, Agent, Constraint, FieldContract, FieldKind,
    FieldSpec, ParsedArgs,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;

use crate::TokenActions;

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| anyhow!("invalid {field} address '{value}': {e}"))
}

fn parse_optional_pubkey(field: &str, value: Option<&str>) -> Result<Option<Pubkey>> {
    value.map(|v| parse_pubkey(field, v)).transpose()
}

// =============================================================================
// get_wallet_details - Address and network of the agent's wallet
// =============================================================================

#[derive(Debug)]
pub struct GetWalletDetailsAction {
    meta: ActionMetadata,
}

impl GetWalletDetailsAction {
    pub fn new() -> Self {
        let meta = ActionMetadata::new(
            "get_wallet_details",
            "Get the address of the agent's wallet and the network it is connected to.",
            FieldContract::strict(),
        )
        .with_similes(&["wallet address", "show wallet", "which network"])
        .with_example(ActionExample {
            input: json!({}),
            output: json!({
                "address": "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU",
                "network": "solana-devnet",
                "protocolFamily": "solana",
            })
            .to_string(),
            explanation: "Get the wallet address and network".to_string(),
        });

        Self { meta }
    }
}

impl Default for GetWalletDetailsAction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Action for GetWalletDetailsAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, agent: &Agent, _args: ParsedArgs) -> Result<String> {
        Ok(json!({
            "address": agent.address(),
            "network": agent.network.network_id,
            "protocolFamily": agent.network.protocol_family,
        })
        .to_string())
    }
}

// =============================================================================
// get_balance - SOL or SPL token balance
// =============================================================================

pub struct GetBalanceAction {
    meta: ActionMetadata,
    backend: Arc<dyn TokenActions>,
}

impl GetBalanceAction {
    pub fn new(backend: Arc<dyn TokenActions>) -> Self {
        let contract = FieldContract::strict().field(
            FieldSpec::optional("tokenAddress", FieldKind::String)
                .with_description("Optional SPL token mint address; if omitted, SOL balance is returned"),
        );

        let meta = ActionMetadata::new(
            "get_balance",
            "Get the balance of the agent's wallet. If no tokenAddress is provided, the balance will be in SOL.",
            contract,
        )
        .with_similes(&["check balance", "get wallet balance", "check token balance"])
        .with_example(ActionExample {
            input: json!({}),
            output: json!({"status": "success", "balance": "100", "token": "SOL"}).to_string(),
            explanation: "Get SOL balance of the wallet".to_string(),
        })
        .with_example(ActionExample {
            input: json!({"tokenAddress": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"}),
            output: json!({
                "status": "success",
                "balance": "1000",
                "token": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            })
            .to_string(),
            explanation: "Get USDC token balance".to_string(),
        });

        Self { meta, backend }
    }
}

#[async_trait]
impl Action for GetBalanceAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, agent: &Agent, args: ParsedArgs) -> Result<String> {
        let token_address = args.str("tokenAddress");
        let mint = parse_optional_pubkey("token", token_address)?;

        let balance = self
            .backend
            .get_balance(agent, agent.wallet.pubkey(), mint)
            .await
            .context("failed to fetch balance")?;

        Ok(json!({
            "status": "success",
            "balance": balance.to_string(),
            "token": token_address.unwrap_or("SOL"),
        })
        .to_string())
    }
}

// =============================================================================
// transfer - Send SOL or SPL tokens
// =============================================================================

pub struct TransferAction {
    meta: ActionMetadata,
    backend: Arc<dyn TokenActions>,
}

impl TransferAction {
    pub fn new(backend: Arc<dyn TokenActions>) -> Self {
        let contract = FieldContract::strict()
            .field(
                FieldSpec::required("to", FieldKind::String)
                    .with_description("Destination Solana address")
                    .with_constraint(Constraint::MinLength(32))
                    .with_constraint(Constraint::MaxLength(44)),
            )
            .field(
                FieldSpec::required("amount", FieldKind::Amount)
                    .with_description("Amount of SOL or tokens to transfer, as a decimal string")
                    .with_constraint(Constraint::Positive),
            )
            .field(
                FieldSpec::optional("mint", FieldKind::String)
                    .with_description("SPL token mint address; omit for native SOL"),
            );

        let meta = ActionMetadata::new(
            "transfer",
            "Transfer SOL or SPL tokens from the agent's wallet to another address",
            contract,
        )
        .with_similes(&["send sol", "send tokens", "transfer to another wallet"])
        .with_example(ActionExample {
            input: json!({
                "to": "8x2dR8Mpzuz2YqyZyZjUbYWKSWesBo5jMx2Q9Y86udVk",
                "amount": "0.1",
            }),
            output: json!({"status": "success", "signature": "example_signature"}).to_string(),
            explanation: "Transfer 0.1 SOL to the given address".to_string(),
        });

        Self { meta, backend }
    }
}

#[async_trait]
impl Action for TransferAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, agent: &Agent, args: ParsedArgs) -> Result<String> {
        #[derive(Deserialize)]
        struct Input {
            to: String,
            #[serde(default)]
            mint: Option<String>,
        }

        let parsed: Input = args.parse()?;
        let amount = args
            .amount("amount")
            .ok_or_else(|| anyhow!("amount is missing"))?;
        let to = parse_pubkey("destination", &parsed.to)?;
        let mint = parse_optional_pubkey("mint", parsed.mint.as_deref())?;

        tracing::info!(%to, %amount, mint = ?mint, "submitting transfer");
        let signature = self
            .backend
            .transfer(agent, to, amount.clone(), mint)
            .await
            .context("transfer failed")?;

        Ok(json!({
            "status": "success",
            "signature": signature,
            "amount": args.str("amount"),
            "to": parsed.to,
            "token": parsed.mint.unwrap_or_else(|| "SOL".to_string()),
        })
        .to_string())
    }
}
