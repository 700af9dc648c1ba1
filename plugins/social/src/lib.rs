//! Farcaster actions for the agent toolkit.

use std::sync::Arc;

use agent_actions_core::{Action, ActionProvider, RetryPolicy};

mod actions;
mod client;

pub use actions::{AccountDetailsAction, PublishCastAction, MAX_CAST_LENGTH};
pub use client::{
    CastClient, CastCredentials, HttpCastClient, PublishError, PublishedCast, DEFAULT_CAST_API,
};

pub const PROVIDER_NAME: &str = "social";

/// Works on every network; casts do not touch the chain.
pub struct SocialProvider {
    actions: Vec<Arc<dyn Action>>,
}

impl SocialProvider {
    pub fn new(client: Arc<dyn CastClient>, retry: RetryPolicy) -> Self {
        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(PublishCastAction::new(client.clone(), retry)),
            Arc::new(AccountDetailsAction::new(client, retry)),
        ];
        Self { actions }
    }
}

impl ActionProvider for SocialProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }
}
