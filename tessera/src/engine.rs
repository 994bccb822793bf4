//! The structured output engine.

use std::sync::Arc;

use tessera_core::{EngineError, GenerationParams, ResponseEnvelope};
use tessera_providers::{
    ProviderId, ProviderRegistry, StructuredRequest, StructuredRequestBuilder, Transport,
};
use tessera_schema::{Schema, ValidationOptions};

use crate::extract::OutputExtractor;

/// Provider-agnostic structured output engine.
///
/// Stateless between invocations: every call runs end to end with no
/// shared mutable state, so an engine can be shared across tasks and
/// drive concurrent requests without locking. The only suspension point
/// is the transport round-trip.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tessera::{Engine, ProviderId};
/// use tessera_providers::MockTransport;
/// use tessera_schema::{ObjectSchema, StringSchema};
///
/// # tokio_test::block_on(async {
/// let transport = MockTransport::new().with_json_response(200, &serde_json::json!({
///     "id": "chatcmpl-1",
///     "model": "llama-3.3-70b-versatile",
///     "choices": [{"message": {"content": "{\"weather\": \"75º\"}"}, "finish_reason": "stop"}],
///     "usage": {"prompt_tokens": 9, "completion_tokens": 5},
/// }));
/// let engine = Engine::new(Arc::new(transport));
///
/// let envelope = engine
///     .structured()
///     .schema(ObjectSchema::new("output", "").with_property(
///         StringSchema::new("weather", "The weather forecast"),
///         true,
///     ))
///     .using(ProviderId::Groq, "llama-3.3-70b-versatile")
///     .prompt("What's the weather?")
///     .send()
///     .await
///     .unwrap();
///
/// assert_eq!(envelope.structured.get("weather"), Some(&serde_json::json!("75º")));
/// # });
/// ```
#[derive(Clone)]
pub struct Engine {
    registry: ProviderRegistry,
    transport: Arc<dyn Transport>,
    validation: ValidationOptions,
}

impl Engine {
    /// Create an engine with the default provider registry.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            registry: ProviderRegistry::with_defaults(),
            transport,
            validation: ValidationOptions::default(),
        }
    }

    /// Replace the provider registry.
    #[must_use]
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the validation options.
    #[must_use]
    pub fn with_validation(mut self, options: ValidationOptions) -> Self {
        self.validation = options;
        self
    }

    /// Start a fluent structured call.
    #[must_use]
    pub fn structured(&self) -> StructuredCall<'_> {
        StructuredCall {
            engine: self,
            builder: StructuredRequest::builder(),
        }
    }

    /// Execute a structured output request end to end.
    ///
    /// Encodes the request through the provider's adapter, executes it
    /// on the transport, decodes the reply, validates the candidate
    /// against the schema, and wraps the result in a response envelope.
    /// Each failure kind surfaces as its own [`EngineError`] variant;
    /// nothing is retried here.
    pub async fn request_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<ResponseEnvelope, EngineError> {
        let adapter = self.registry.get(request.provider)?;
        let wire = adapter.encode_request(&request)?;
        tracing::debug!(
            provider = %request.provider,
            model = %request.model,
            endpoint = %wire.endpoint,
            "dispatching structured request"
        );

        let raw = self.transport.execute(&wire).await?;
        let reply = adapter.decode_response(&raw)?;
        tracing::debug!(finish = %reply.finish_reason, "decoded provider reply");

        let extractor = OutputExtractor::with_options(self.validation.clone());
        let structured = extractor.run(&request.schema, &reply).into_result()?;
        Ok(ResponseEnvelope::assemble(reply, structured, &request.model))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

/// Fluent builder for one structured call against an engine.
#[derive(Debug)]
pub struct StructuredCall<'a> {
    engine: &'a Engine,
    builder: StructuredRequestBuilder,
}

impl StructuredCall<'_> {
    /// Set the output schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.builder = self.builder.schema(schema);
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.builder = self.builder.system_prompt(prompt);
        self
    }

    /// Set the user prompt.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.builder = self.builder.prompt(prompt);
        self
    }

    /// Select the provider and model.
    #[must_use]
    pub fn using(mut self, provider: ProviderId, model: impl Into<String>) -> Self {
        self.builder = self.builder.using(provider, model);
        self
    }

    /// Set generation parameters.
    #[must_use]
    pub fn params(mut self, params: GenerationParams) -> Self {
        self.builder = self.builder.params(params);
        self
    }

    /// Build the request and execute it.
    pub async fn send(self) -> Result<ResponseEnvelope, EngineError> {
        let request = self.builder.build()?;
        self.engine.request_structured(request).await
    }
}
