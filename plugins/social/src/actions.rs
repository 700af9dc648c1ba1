use std::sync::Arc;

use agent_actions_core::{
    Action, ActionExample, ActionMetadata, Agent, Constraint, FieldContract, FieldKind,
    FieldSpec, ParsedArgs, RetryError, RetryPolicy,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::client::{CastClient, PublishError};

pub const MAX_CAST_LENGTH: usize = 280;

// =============================================================================
// publish_cast - Post to Farcaster
// =============================================================================

pub struct PublishCastAction {
    meta: ActionMetadata,
    client: Arc<dyn CastClient>,
    retry: RetryPolicy,
}

impl PublishCastAction {
    pub fn new(client: Arc<dyn CastClient>, retry: RetryPolicy) -> Self {
        let contract = FieldContract::strict().field(
            FieldSpec::required("castText", FieldKind::String)
                .with_description("Text of the cast")
                .with_constraint(Constraint::MaxLength(MAX_CAST_LENGTH)),
        );

        let meta = ActionMetadata::new(
            "publish_cast",
            "Publish a cast to Farcaster from the agent's account. Casts are limited to 280 characters.",
            contract,
        )
        .with_similes(&["post to farcaster", "send a cast", "publish a post"])
        .with_example(ActionExample {
            input: json!({"castText": "gm"}),
            output: "Cast published successfully (hash 0x71fb)".to_string(),
            explanation: "Publish a short greeting".to_string(),
        });

        Self {
            meta,
            client,
            retry,
        }
    }
}

#[async_trait]
impl Action for PublishCastAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, agent: &Agent, args: ParsedArgs) -> Result<String> {
        let text = args
            .str("castText")
            .ok_or_else(|| anyhow!("castText is missing"))?;

        // a cast the server may already have stored must not be sent again
        let cast = self
            .retry
            .run_if(|| self.client.publish(agent, text), PublishError::is_retryable)
            .await
            .map_err(publish_failure)?;

        tracing::info!(hash = %cast.hash, "cast published");
        Ok(format!("Cast published successfully (hash {})", cast.hash))
    }
}

fn publish_failure(err: RetryError<PublishError>) -> anyhow::Error {
    let attempts = err.attempts();
    anyhow::Error::new(err.into_last_error())
        .context(format!("operation failed after {attempts} attempts"))
}

// =============================================================================
// account_details - Profile of the posting account
// =============================================================================

pub struct AccountDetailsAction {
    meta: ActionMetadata,
    client: Arc<dyn CastClient>,
    retry: RetryPolicy,
}

impl AccountDetailsAction {
    pub fn new(client: Arc<dyn CastClient>, retry: RetryPolicy) -> Self {
        let meta = ActionMetadata::new(
            "account_details",
            "Get the Farcaster profile of the account the agent posts as.",
            FieldContract::strict(),
        )
        .with_similes(&["farcaster profile", "who am i on farcaster"]);

        Self {
            meta,
            client,
            retry,
        }
    }
}

#[async_trait]
impl Action for AccountDetailsAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, agent: &Agent, _args: ParsedArgs) -> Result<String> {
        let account = self
            .retry
            .run(|| self.client.account(agent))
            .await
            .map_err(|e| e.into_anyhow())?;

        Ok(format!("Successfully retrieved Farcaster account details:\n{account}"))
    }
}
