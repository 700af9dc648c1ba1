use std::str::FromStr;

use agent_actions_core::Agent;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde_json::Value;
use url::Url;

pub const DEFAULT_PRICE_API: &str = "https://api.jup.ag/price/v2";

#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub token_id: String,
    pub vs_token: String,
    pub price: BigDecimal,
}

/// Source of token prices. Calls may fail transiently.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn quote(&self, agent: &Agent, token_id: &str, vs_token: &str) -> Result<PriceQuote>;
}

/// Price feed backed by a Jupiter-compatible HTTP API.
///
/// Requests go through the agent's shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpPriceFeed {
    base_url: Url,
}

impl HttpPriceFeed {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn jupiter() -> Result<Self> {
        Ok(Self::new(Url::parse(DEFAULT_PRICE_API)?))
    }

    fn price_url(&self, token_id: &str, vs_token: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("price API base URL cannot have a path"))?
            .pop_if_empty()
            .push("price");
        url.query_pairs_mut()
            .append_pair("ids", token_id)
            .append_pair("vsToken", vs_token);
        Ok(url)
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn quote(&self, agent: &Agent, token_id: &str, vs_token: &str) -> Result<PriceQuote> {
        let url = self.price_url(token_id, vs_token)?;
        tracing::debug!(%url, "requesting price");

        let response = agent
            .http
            .get(url)
            .send()
            .await
            .context("price API request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch price: {}", response.status()));
        }

        let body: Value = response.json().await.context("price API returned invalid JSON")?;
        let price = extract_price(&body, token_id)?;

        Ok(PriceQuote {
            token_id: token_id.to_string(),
            vs_token: vs_token.to_string(),
            price,
        })
    }
}

/// Reads `data.<token_id>.price`, which the API sends as a decimal string.
pub(crate) fn extract_price(body: &Value, token_id: &str) -> Result<BigDecimal> {
    let raw = &body["data"][token_id]["price"];
    let text = match raw {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => return Err(anyhow!("no price available for {token_id}")),
        other => return Err(anyhow!("unexpected price value for {token_id}: {other}")),
    };
    BigDecimal::from_str(&text).map_err(|e| anyhow!("unparseable price '{text}' for {token_id}: {e}"))
}
