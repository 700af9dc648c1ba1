use std::str::FromStr;
use std::sync::{Arc, Mutex};

use agent_actions_core::testing::{test_agent, test_agent_on};
use agent_actions_core::{ActionProvider, Agent, Network, Toolkit};
use agent_actions_token::{TokenActions, TokenProvider};
use anyhow::{bail, Result};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;

const DESTINATION: &str = "8x2dR8Mpzuz2YqyZyZjUbYWKSWesBo5jMx2Q9Y86udVk";
const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

#[derive(Default)]
struct FakeBackend {
    transfers: Mutex<Vec<(Pubkey, BigDecimal, Option<Pubkey>)>>,
    fail_with: Option<&'static str>,
}

#[async_trait]
impl TokenActions for FakeBackend {
    async fn transfer(
        &self,
        _agent: &Agent,
        to: Pubkey,
        amount: BigDecimal,
        mint: Option<Pubkey>,
    ) -> Result<String> {
        if let Some(message) = self.fail_with {
            bail!(message);
        }
        self.transfers.lock().unwrap().push((to, amount, mint));
        Ok("5igKcXq1bD9sKDp".to_string())
    }

    async fn get_balance(&self, _agent: &Agent, _owner: Pubkey, mint: Option<Pubkey>) -> Result<BigDecimal> {
        if let Some(message) = self.fail_with {
            bail!(message);
        }
        Ok(match mint {
            Some(_) => BigDecimal::from_str("1000.000001").unwrap(),
            None => BigDecimal::from_str("12.5").unwrap(),
        })
    }
}

fn toolkit(backend: Arc<FakeBackend>) -> Toolkit {
    let provider: Arc<dyn ActionProvider> = Arc::new(TokenProvider::new(backend));
    Toolkit::from_providers(&[provider], test_agent()).unwrap()
}

fn as_json(output: &str) -> Value {
    serde_json::from_str(output).unwrap()
}

#[test]
fn exposes_actions_in_declared_order() {
    let toolkit = toolkit(Arc::new(FakeBackend::default()));
    assert_eq!(toolkit.names(), vec!["get_wallet_details", "get_balance", "transfer"]);
}

#[test]
fn only_supports_solana_networks() {
    let provider = TokenProvider::new(Arc::new(FakeBackend::default()));
    assert!(provider.supports_network(&Network::solana_mainnet()));
    assert!(!provider.supports_network(&Network::base_mainnet()));

    let provider: Arc<dyn ActionProvider> = Arc::new(provider);
    let toolkit = Toolkit::from_providers(&[provider], test_agent_on(Network::base_mainnet())).unwrap();
    assert!(toolkit.is_empty());
}

#[tokio::test]
async fn wallet_details_report_address_and_network() {
    let toolkit = toolkit(Arc::new(FakeBackend::default()));

    let details = as_json(&toolkit.invoke("get_wallet_details", json!({})).await);

    assert_eq!(details["network"], "solana-devnet");
    assert_eq!(details["protocolFamily"], "solana");
    assert!(Pubkey::from_str(details["address"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn balance_defaults_to_sol() {
    let toolkit = toolkit(Arc::new(FakeBackend::default()));

    let balance = as_json(&toolkit.invoke("get_balance", json!({})).await);
    assert_eq!(balance["token"], "SOL");
    assert_eq!(balance["balance"], "12.5");

    let balance = as_json(&toolkit.invoke("get_balance", json!({"tokenAddress": USDC})).await);
    assert_eq!(balance["token"], USDC);
    assert_eq!(balance["balance"], "1000.000001");
}

#[tokio::test]
async fn transfer_passes_exact_amount_to_backend() {
    let backend = Arc::new(FakeBackend::default());
    let toolkit = toolkit(backend.clone());

    let amount = "123456789.123456789123456789";
    let output = as_json(
        &toolkit
            .invoke("transfer", json!({"to": DESTINATION, "amount": amount, "mint": USDC}))
            .await,
    );

    assert_eq!(output["status"], "success");
    assert_eq!(output["amount"], amount);
    let transfers = backend.transfers.lock().unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].0, Pubkey::from_str(DESTINATION).unwrap());
    assert_eq!(transfers[0].1, BigDecimal::from_str(amount).unwrap());
    assert_eq!(transfers[0].2, Some(Pubkey::from_str(USDC).unwrap()));
}

#[tokio::test]
async fn transfer_rejects_bad_input_before_backend() {
    let backend = Arc::new(FakeBackend::default());
    let toolkit = toolkit(backend.clone());

    let missing = toolkit.invoke("transfer", json!({"amount": "1"})).await;
    assert!(missing.contains("to: missing required field"), "{missing}");

    let float = toolkit.invoke("transfer", json!({"to": DESTINATION, "amount": 0.5})).await;
    assert!(float.contains("floating-point"), "{float}");

    let negative = toolkit.invoke("transfer", json!({"to": DESTINATION, "amount": "-3"})).await;
    assert!(negative.contains("expected a positive value"), "{negative}");

    assert!(backend.transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_address_is_a_handler_error() {
    let toolkit = toolkit(Arc::new(FakeBackend::default()));

    let output = toolkit
        .invoke("transfer", json!({"to": "0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl", "amount": "1"}))
        .await;

    assert!(output.starts_with("Error executing transfer: invalid destination address"), "{output}");
}

#[tokio::test]
async fn backend_failures_are_contained() {
    let backend = Arc::new(FakeBackend {
        fail_with: Some("insufficient funds"),
        ..FakeBackend::default()
    });
    let toolkit = toolkit(backend);

    let output = toolkit.invoke("transfer", json!({"to": DESTINATION, "amount": "1"})).await;

    assert_eq!(output, "Error executing transfer: transfer failed: insufficient funds");
}
