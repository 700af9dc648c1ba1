//! Flattening providers into one ordered, collision-free action list.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::actions::{Action, ActionMetadata};
use crate::error::RegistrationError;
use crate::network::Network;
use crate::provider::ActionProvider;

#[derive(Clone)]
struct Entry {
    provider: String,
    action: Arc<dyn Action>,
}

/// Actions from every provider, keyed by name in registration order.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: IndexMap<String, Entry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate provider actions in provider order.
    ///
    /// Each provider's own order is preserved. A name offered twice is an
    /// error, whether the duplicates come from one provider or two.
    pub fn aggregate(
        providers: &[Arc<dyn ActionProvider>],
        network: Option<&Network>,
    ) -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        for provider in providers {
            let actions = provider.get_actions(network);
            if actions.is_empty() && !provider.actions().is_empty() {
                tracing::info!(
                    provider = provider.name(),
                    network = ?network.map(|n| n.network_id.as_str()),
                    "provider does not support network, skipping"
                );
            }
            for action in actions {
                registry.register(provider.name(), action)?;
            }
        }
        tracing::debug!(actions = registry.len(), "action registry assembled");
        Ok(registry)
    }

    pub fn register(
        &mut self,
        provider: &str,
        action: Arc<dyn Action>,
    ) -> Result<(), RegistrationError> {
        let name = action.name().to_string();
        if name.is_empty() {
            return Err(RegistrationError::EmptyName {
                provider: provider.to_string(),
            });
        }
        if let Err(issue) = action.metadata().contract.check() {
            return Err(RegistrationError::InvalidContract {
                action: name,
                provider: provider.to_string(),
                issue,
            });
        }
        if let Some(existing) = self.actions.get(&name) {
            return Err(RegistrationError::DuplicateAction {
                name,
                first_provider: existing.provider.clone(),
                second_provider: provider.to_string(),
            });
        }
        self.actions.insert(
            name,
            Entry {
                provider: provider.to_string(),
                action,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).map(|entry| entry.action.clone())
    }

    /// Name of the provider that contributed `name`.
    pub fn provider_of(&self, name: &str) -> Option<&str> {
        self.actions.get(name).map(|entry| entry.provider.as_str())
    }

    pub fn all(&self) -> Vec<Arc<dyn Action>> {
        self.actions.values().map(|entry| entry.action.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Return metadata for all registered actions (useful for AI tool schemas).
    pub fn metadata(&self) -> Vec<ActionMetadata> {
        self.actions
            .values()
            .map(|entry| entry.action.metadata().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
