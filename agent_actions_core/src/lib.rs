pub mod agent;
pub mod wallet;
pub mod network;
pub mod config;
pub mod logging;
pub mod error;
pub mod schema;
pub mod validate;
pub mod actions;
pub mod provider;
pub mod registry;
pub mod retry;
pub mod tool;
pub mod toolkit;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use actions::{Action, ActionExample, ActionMetadata};
pub use agent::Agent;
pub use config::ActionsConfig;
pub use error::{ConfigError, FieldIssue, RegistrationError, RetryError, ValidationError};
pub use network::Network;
pub use provider::{ActionProvider, StaticProvider};
pub use registry::ActionRegistry;
pub use retry::{retry_with_backoff, retry_with_backoff_if, RetryPolicy};
pub use schema::{Constraint, FieldContract, FieldKind, FieldSpec, UnknownFields};
pub use tool::{Tool, ToolDefinition};
pub use toolkit::Toolkit;
pub use validate::{validate, ParsedArgs};
pub use wallet::{KeypairWallet, Wallet};

/// Convenience helper to assemble a toolkit from config and providers.
/// Providers are registered in the order given; startup should abort on error.
pub fn build_toolkit(
    config: &ActionsConfig,
    wallet: std::sync::Arc<dyn Wallet>,
    providers: &[std::sync::Arc<dyn ActionProvider>],
) -> Result<Toolkit, RegistrationError> {
    let agent = std::sync::Arc::new(Agent::from_config(wallet, config));
    Toolkit::from_providers(providers, agent)
}
