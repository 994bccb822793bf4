//! Structured request assembly.

use tessera_core::{EngineError, GenerationParams};
use tessera_schema::Schema;

use crate::adapter::ProviderId;

/// An immutable, fully-specified structured output request.
///
/// Constructed once per call via [`StructuredRequest::builder`] and
/// never mutated after submission. The builder rejects obviously invalid
/// combinations eagerly, before any network cost is incurred.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// The declared output shape.
    pub schema: Schema,
    /// Optional system prompt.
    pub system_prompt: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Which provider serves the request.
    pub provider: ProviderId,
    /// Model identifier at that provider.
    pub model: String,
    /// Generation parameters.
    pub params: GenerationParams,
}

impl StructuredRequest {
    /// Start building a request.
    #[must_use]
    pub fn builder() -> StructuredRequestBuilder {
        StructuredRequestBuilder::default()
    }
}

/// Builder for [`StructuredRequest`].
///
/// # Example
///
/// ```rust
/// use tessera_providers::{ProviderId, StructuredRequest};
/// use tessera_schema::{ObjectSchema, StringSchema};
///
/// let request = StructuredRequest::builder()
///     .schema(ObjectSchema::new("output", "").with_property(
///         StringSchema::new("weather", "The weather forecast"),
///         true,
///     ))
///     .using(ProviderId::Groq, "llama-3.3-70b-versatile")
///     .prompt("What's the weather in Detroit?")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.model, "llama-3.3-70b-versatile");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructuredRequestBuilder {
    schema: Option<Schema>,
    system_prompt: Option<String>,
    prompt: Option<String>,
    provider: Option<ProviderId>,
    model: Option<String>,
    params: GenerationParams,
}

impl StructuredRequestBuilder {
    /// Set the output schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the user prompt.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Select the provider and model.
    #[must_use]
    pub fn using(mut self, provider: ProviderId, model: impl Into<String>) -> Self {
        self.provider = Some(provider);
        self.model = Some(model.into());
        self
    }

    /// Set generation parameters.
    #[must_use]
    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Assemble the request, rejecting invalid combinations eagerly.
    pub fn build(self) -> Result<StructuredRequest, EngineError> {
        let schema = self
            .schema
            .ok_or_else(|| EngineError::invalid_request("a schema is required"))?;
        let prompt = self.prompt.unwrap_or_default();
        if prompt.trim().is_empty() {
            return Err(EngineError::invalid_request("prompt must not be empty"));
        }
        let provider = self
            .provider
            .ok_or_else(|| EngineError::invalid_request("a provider must be selected"))?;
        let model = self.model.unwrap_or_default();
        if model.trim().is_empty() {
            return Err(EngineError::invalid_request("model id must not be empty"));
        }
        Ok(StructuredRequest {
            schema,
            system_prompt: self.system_prompt,
            prompt,
            provider,
            model,
            params: self.params,
        })
    }
}
