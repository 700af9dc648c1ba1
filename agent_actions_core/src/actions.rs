use async_trait::async_trait;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::Agent;
use crate::schema::FieldContract;
use crate::validate::ParsedArgs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExample {
    pub input: Value,
    pub output: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub name: String,
    pub similes: Vec<String>,
    pub description: String,
    pub examples: Vec<ActionExample>,
    pub contract: FieldContract,
}

impl ActionMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        contract: FieldContract,
    ) -> Self {
        Self {
            name: name.into(),
            similes: Vec::new(),
            description: description.into(),
            examples: Vec::new(),
            contract,
        }
    }

    #[must_use]
    pub fn with_similes(mut self, similes: &[&str]) -> Self {
        self.similes = similes.iter().map(|s| s.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: ActionExample) -> Self {
        self.examples.push(example);
        self
    }
}

/// A named capability: metadata plus a handler.
///
/// `call` only ever receives arguments that already passed the metadata's
/// contract. It may fail freely; the [`Tool`](crate::tool::Tool) wrapping it
/// turns errors into text for the agent.
#[async_trait]
pub trait Action: Send + Sync {
    fn metadata(&self) -> &ActionMetadata;

    async fn call(&self, agent: &Agent, args: ParsedArgs) -> Result<String>;

    fn name(&self) -> &str {
        &self.metadata().name
    }
}
