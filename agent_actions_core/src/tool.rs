//! The containment boundary between actions and the agent runtime.
//!
//! [`Tool::invoke`] always produces a `String`. Bad input, handler errors and
//! handler panics all come back as text the agent can read and react to; none
//! of them reach the runtime as an error or unwind.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::Action;
use crate::agent::Agent;
use crate::schema::FieldContract;
use crate::validate::validate;

/// What the runtime hands to an LLM when listing tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// One action bound to the shared agent context.
#[derive(Clone)]
pub struct Tool {
    action: Arc<dyn Action>,
    agent: Arc<Agent>,
}

impl Tool {
    pub fn new(action: Arc<dyn Action>, agent: Arc<Agent>) -> Self {
        Self { action, agent }
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }

    pub fn description(&self) -> &str {
        &self.action.metadata().description
    }

    pub fn contract(&self) -> &FieldContract {
        &self.action.metadata().contract
    }

    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.contract().to_json_schema(),
        }
    }

    /// Validate `raw`, run the handler once, and report the outcome as text.
    pub async fn invoke(&self, raw: Value) -> String {
        let name = self.name();

        let args = match validate(self.contract(), &raw) {
            Ok(args) => args,
            Err(err) => {
                tracing::warn!(action = name, error = %err, "rejected invalid arguments");
                return format!("Invalid arguments for {name}: {err}");
            }
        };

        tracing::debug!(action = name, "invoking action");
        let outcome = AssertUnwindSafe(self.action.call(&self.agent, args))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(output)) => {
                tracing::debug!(action = name, "action completed");
                output
            }
            Ok(Err(err)) => {
                tracing::error!(action = name, error = %format!("{err:#}"), "action failed");
                format!("Error executing {name}: {err:#}")
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(action = name, panic = %message, "action panicked");
                format!("Error executing {name}: handler panicked: {message}")
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_agent, CountingAction, EchoAction, FailingAction, PanickingAction};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn missing_required_field_is_reported_not_raised() {
        let counting = Arc::new(CountingAction::new("publish_cast", "Cast published successfully"));
        let tool = Tool::new(counting.clone(), test_agent());

        let output = tool.invoke(json!({})).await;

        assert!(output.starts_with("Invalid arguments for publish_cast"));
        assert!(output.contains("castText"));
        assert!(output.contains("missing required field"));
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_handler_output_is_returned_verbatim() {
        let counting = Arc::new(CountingAction::new("publish_cast", "Cast published successfully"));
        let tool = Tool::new(counting.clone(), test_agent());

        let output = tool.invoke(json!({"castText": "hi"})).await;

        assert_eq!(output, "Cast published successfully");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_error_becomes_error_string() {
        let tool = Tool::new(
            Arc::new(FailingAction::new("publish_cast", "Failed to publish cast")),
            test_agent(),
        );

        let output = tool.invoke(json!({"castText": "hi"})).await;

        assert!(output.contains("Error executing publish_cast: Failed to publish cast"));
    }

    #[tokio::test]
    async fn error_context_chain_is_kept() {
        let tool = Tool::new(
            Arc::new(FailingAction::new("get_balance", "connection reset").with_context("rpc call failed")),
            test_agent(),
        );

        let output = tool.invoke(json!({"castText": "x"})).await;

        assert_eq!(output, "Error executing get_balance: rpc call failed: connection reset");
    }

    #[tokio::test]
    async fn panics_are_contained() {
        let tool = Tool::new(Arc::new(PanickingAction::new("explode")), test_agent());

        let output = tool.invoke(json!({})).await;

        assert_eq!(output, "Error executing explode: handler panicked: boom");
    }

    #[tokio::test]
    async fn non_object_input_is_reported() {
        let tool = Tool::new(EchoAction::shared("echo"), test_agent());

        let output = tool.invoke(json!("just a string")).await;

        assert!(output.contains("expected object, received string"));
    }

    #[tokio::test]
    async fn echo_sees_parsed_args() {
        let tool = Tool::new(EchoAction::shared("echo"), test_agent());

        let output = tool.invoke(json!({"message": "gm", "ignored": 1})).await;

        assert_eq!(output, "gm");
    }

    #[test]
    fn definition_exposes_contract_as_json_schema() {
        let tool = Tool::new(EchoAction::shared("echo"), test_agent());

        let definition = tool.definition();

        assert_eq!(definition.name, "echo");
        assert_eq!(definition.input_schema["required"], json!(["message"]));
    }
}
