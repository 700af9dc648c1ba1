use std::sync::Arc;

use serde_json::Value;

use crate::agent::Agent;
use crate::error::RegistrationError;
use crate::provider::ActionProvider;
use crate::registry::ActionRegistry;
use crate::tool::{Tool, ToolDefinition};

/// Every tool an agent runtime can call, in a stable order.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct Toolkit {
    tools: Vec<Tool>,
}

impl Toolkit {
    pub fn new(registry: &ActionRegistry, agent: Arc<Agent>) -> Self {
        let tools = registry
            .all()
            .into_iter()
            .map(|action| Tool::new(action, agent.clone()))
            .collect();
        Self { tools }
    }

    /// Aggregate `providers` for the agent's network and bind the result.
    pub fn from_providers(
        providers: &[Arc<dyn ActionProvider>],
        agent: Arc<Agent>,
    ) -> Result<Self, RegistrationError> {
        let registry = ActionRegistry::aggregate(providers, Some(&agent.network))?;
        let toolkit = Self::new(&registry, agent);
        tracing::info!(tools = ?toolkit.names(), "toolkit ready");
        Ok(toolkit)
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(Tool::definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name. An unknown name is reported as text too.
    pub async fn invoke(&self, name: &str, raw: Value) -> String {
        match self.tool(name) {
            Some(tool) => tool.invoke(raw).await,
            None => {
                tracing::warn!(action = name, "unknown action requested");
                format!("Unknown action: {name}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use crate::provider::StaticProvider;
    use crate::testing::{test_agent, test_agent_on, EchoAction, FailingAction};
    use serde_json::json;

    fn providers() -> Vec<Arc<dyn ActionProvider>> {
        vec![
            Arc::new(
                StaticProvider::new("wallet", vec![EchoAction::shared("get_balance")])
                    .with_network_filter(Network::is_solana),
            ),
            Arc::new(StaticProvider::new(
                "social",
                vec![
                    EchoAction::shared("publish_cast"),
                    Arc::new(FailingAction::new("account_details", "not signed in")),
                ],
            )),
        ]
    }

    #[test]
    fn tools_follow_registry_order() {
        let toolkit = Toolkit::from_providers(&providers(), test_agent()).unwrap();
        assert_eq!(toolkit.names(), vec!["get_balance", "publish_cast", "account_details"]);
    }

    #[test]
    fn agent_network_filters_providers() {
        let toolkit =
            Toolkit::from_providers(&providers(), test_agent_on(Network::base_mainnet())).unwrap();
        assert_eq!(toolkit.names(), vec!["publish_cast", "account_details"]);
    }

    #[test]
    fn duplicate_providers_fail_startup() {
        let mut doubled = providers();
        doubled.extend(providers());
        assert!(Toolkit::from_providers(&doubled, test_agent()).is_err());
    }

    #[test]
    fn tools_share_one_agent() {
        let agent = test_agent();
        let toolkit = Toolkit::from_providers(&providers(), agent.clone()).unwrap();
        // the toolkit's tools plus our handle
        assert_eq!(Arc::strong_count(&agent), toolkit.len() + 1);
    }

    #[tokio::test]
    async fn invoke_by_name() {
        let toolkit = Toolkit::from_providers(&providers(), test_agent()).unwrap();

        assert_eq!(toolkit.invoke("publish_cast", json!({"message": "gm"})).await, "gm");
        assert_eq!(
            toolkit.invoke("account_details", json!({})).await,
            "Error executing account_details: not signed in"
        );
        assert_eq!(toolkit.invoke("rug_pull", json!({})).await, "Unknown action: rug_pull");
    }

    #[test]
    fn definitions_cover_every_tool() {
        let toolkit = Toolkit::from_providers(&providers(), test_agent()).unwrap();
        let definitions = toolkit.definitions();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0].name, "get_balance");
        assert_eq!(definitions[0].input_schema["type"], "object");
    }
}
