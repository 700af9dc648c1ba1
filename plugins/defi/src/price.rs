use std::sync::Arc;

use agent_actions_core::{
    Action, ActionExample, ActionMetadata, Agent, Constraint, FieldContract, FieldKind,
    FieldSpec, ParsedArgs, RetryPolicy,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::feed::PriceFeed;

// =============================================================================
// get_token_price - Quote a token against another
// =============================================================================

pub struct GetTokenPriceAction {
    meta: ActionMetadata,
    feed: Arc<dyn PriceFeed>,
    retry: RetryPolicy,
}

impl GetTokenPriceAction {
    pub fn new(feed: Arc<dyn PriceFeed>, retry: RetryPolicy) -> Self {
        let contract = FieldContract::strip()
            .field(
                FieldSpec::required("tokenId", FieldKind::String)
                    .with_description("Mint address or symbol of the token to price")
                    .with_constraint(Constraint::MinLength(1)),
            )
            .field(
                FieldSpec::optional("vsToken", FieldKind::String)
                    .with_description("Token to quote against")
                    .with_default(json!("USDC")),
            );

        let meta = ActionMetadata::new(
            "get_token_price",
            "Fetch the current price of a token, quoted in USDC unless another token is given",
            contract,
        )
        .with_similes(&["token price", "price check", "how much is"])
        .with_example(ActionExample {
            input: json!({"tokenId": "So11111111111111111111111111111111111111112"}),
            output: json!({
                "status": "success",
                "tokenId": "So11111111111111111111111111111111111111112",
                "vsToken": "USDC",
                "price": "142.37",
            })
            .to_string(),
            explanation: "Fetch the USDC price of SOL".to_string(),
        });

        Self { meta, feed, retry }
    }
}

#[async_trait]
impl Action for GetTokenPriceAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, agent: &Agent, args: ParsedArgs) -> Result<String> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Input {
            token_id: String,
            vs_token: String,
        }

        let parsed: Input = args.parse()?;

        let quote = self
            .retry
            .run(|| self.feed.quote(agent, &parsed.token_id, &parsed.vs_token))
            .await
            .map_err(|e| e.into_anyhow())?;

        Ok(json!({
            "status": "success",
            "tokenId": quote.token_id,
            "vsToken": quote.vs_token,
            "price": quote.price.to_string(),
        })
        .to_string())
    }
}
