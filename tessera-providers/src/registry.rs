//! Provider adapter registry.

use std::collections::HashMap;
use std::sync::Arc;

use tessera_core::EngineError;

use crate::adapter::{BoxedAdapter, ProviderAdapter, ProviderId};
use crate::anthropic::AnthropicAdapter;
use crate::groq::GroqAdapter;
use crate::openai::OpenAiAdapter;

/// Explicit mapping from provider ids to adapter instances.
///
/// A registry is an ordinary value handed to the engine at construction;
/// there is no global or mutable registry state. Adapters are immutable
/// and shared, so a registry clone is cheap.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderId, BoxedAdapter>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in adapter registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Arc::new(OpenAiAdapter::new()))
            .register(Arc::new(AnthropicAdapter::new()))
            .register(Arc::new(GroqAdapter::new()))
    }

    /// Register an adapter under its own provider id, replacing any
    /// previous registration.
    #[must_use]
    pub fn register(mut self, adapter: BoxedAdapter) -> Self {
        self.adapters.insert(adapter.id(), adapter);
        self
    }

    /// Look up the adapter for a provider.
    pub fn get(&self, id: ProviderId) -> Result<BoxedAdapter, EngineError> {
        self.adapters.get(&id).cloned().ok_or_else(|| {
            EngineError::invalid_request(format!("no adapter registered for provider {}", id))
        })
    }

    /// Whether an adapter is registered for the provider.
    #[must_use]
    pub fn contains(&self, id: ProviderId) -> bool {
        self.adapters.contains_key(&id)
    }

    /// Registered provider ids, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProviderId> {
        self.adapters.keys().copied().collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SchemaCapability;

    #[test]
    fn test_defaults_cover_all_providers() {
        let registry = ProviderRegistry::with_defaults();
        for id in [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Groq] {
            assert!(registry.contains(id));
            assert_eq!(registry.get(id).unwrap().id(), id);
        }
    }

    #[test]
    fn test_capabilities_by_provider() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(
            registry.get(ProviderId::OpenAi).unwrap().capability(),
            SchemaCapability::NativeSchema
        );
        assert_eq!(
            registry.get(ProviderId::Anthropic).unwrap().capability(),
            SchemaCapability::ToolCall
        );
        assert_eq!(
            registry.get(ProviderId::Groq).unwrap().capability(),
            SchemaCapability::PromptCoercion
        );
    }

    #[test]
    fn test_missing_adapter_is_invalid_request() {
        let registry = ProviderRegistry::new();
        let err = registry.get(ProviderId::Groq).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
        assert!(err.to_string().contains("groq"));
    }
}
