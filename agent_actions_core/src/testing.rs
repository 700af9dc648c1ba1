//! Small actions and a throwaway agent for exercising the framework.
//!
//! Compiled for this crate's tests and, behind the `testing` feature, for the
//! plugin crates' tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::actions::{Action, ActionMetadata};
use crate::agent::Agent;
use crate::network::Network;
use crate::schema::{FieldContract, FieldKind, FieldSpec};
use crate::validate::ParsedArgs;
use crate::wallet::KeypairWallet;

/// An agent on solana-devnet with a random keypair.
pub fn test_agent() -> Arc<Agent> {
    test_agent_on(Network::solana_devnet())
}

pub fn test_agent_on(network: Network) -> Arc<Agent> {
    Arc::new(Agent::new(Arc::new(KeypairWallet::random()), network))
}

/// Returns its `message` argument.
pub struct EchoAction {
    meta: ActionMetadata,
}

impl EchoAction {
    pub fn new(name: &str) -> Self {
        let contract = FieldContract::strip()
            .field(FieldSpec::required("message", FieldKind::String));
        Self {
            meta: ActionMetadata::new(name, "Echo the message back", contract),
        }
    }

    pub fn shared(name: &str) -> Arc<dyn Action> {
        Arc::new(Self::new(name))
    }
}

#[async_trait]
impl Action for EchoAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, _agent: &Agent, args: ParsedArgs) -> Result<String> {
        Ok(args.str("message").unwrap_or_default().to_string())
    }
}

/// Requires `castText`, returns a fixed reply and counts calls.
pub struct CountingAction {
    meta: ActionMetadata,
    reply: String,
    pub calls: AtomicUsize,
}

impl CountingAction {
    pub fn new(name: &str, reply: &str) -> Self {
        let contract = FieldContract::strict()
            .field(FieldSpec::required("castText", FieldKind::String));
        Self {
            meta: ActionMetadata::new(name, "Counts its invocations", contract),
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Action for CountingAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, _agent: &Agent, _args: ParsedArgs) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Accepts anything and always fails with the configured message.
pub struct FailingAction {
    meta: ActionMetadata,
    message: String,
    context: Option<String>,
}

impl FailingAction {
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            meta: ActionMetadata::new(name, "Always fails", FieldContract::strip()),
            message: message.to_string(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }
}

#[async_trait]
impl Action for FailingAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, _agent: &Agent, _args: ParsedArgs) -> Result<String> {
        let err = anyhow!(self.message.clone());
        Err(match &self.context {
            Some(context) => err.context(context.clone()),
            None => err,
        })
    }
}

/// Panics with `boom`.
pub struct PanickingAction {
    meta: ActionMetadata,
}

impl PanickingAction {
    pub fn new(name: &str) -> Self {
        Self {
            meta: ActionMetadata::new(name, "Panics", FieldContract::strip()),
        }
    }
}

#[async_trait]
impl Action for PanickingAction {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }

    async fn call(&self, _agent: &Agent, _args: ParsedArgs) -> Result<String> {
        panic!("boom")
    }
}
