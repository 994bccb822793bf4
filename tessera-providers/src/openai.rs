//! OpenAI adapter.
//!
//! Uses the chat completions API with native structured output: the
//! rendered schema rides in `response_format` as a strict `json_schema`
//! constraint, so the reply content is expected to be the JSON value
//! itself.

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use tessera_core::{EngineError, FinishReason, IntermediateReply, UsageStats};

use crate::adapter::{ProviderAdapter, ProviderId, SchemaCapability};
use crate::request::StructuredRequest;
use crate::wire::{ProviderWireRequest, ProviderWireResponse};

/// Deepest root-to-leaf chain the provider accepts in a strict schema.
const MAX_SCHEMA_DEPTH: usize = 5;

/// Adapter for OpenAI chat completions with native structured output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    /// Default API base URL.
    pub const BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Chat completions endpoint, relative to the base URL.
    pub const ENDPOINT: &'static str = "/chat/completions";

    /// Create a new adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn capability(&self) -> SchemaCapability {
        SchemaCapability::NativeSchema
    }

    fn encode_request(
        &self,
        request: &StructuredRequest,
    ) -> Result<ProviderWireRequest, EngineError> {
        if !request.schema.is_object() {
            return Err(EngineError::unsupported(
                self.id().to_string(),
                "response_format requires an object schema at the root",
            ));
        }
        let depth = request.schema.depth();
        if depth > MAX_SCHEMA_DEPTH {
            return Err(EngineError::unsupported(
                self.id().to_string(),
                format!(
                    "schema nesting depth {} exceeds the provider cap of {}",
                    depth, MAX_SCHEMA_DEPTH
                ),
            ));
        }

        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let mut body = json!({
            "model": request.model,
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.name(),
                    "schema": request.schema.to_json_schema(),
                    "strict": true,
                },
            },
        });
        let params = &request.params;
        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = params.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(stop) = &params.stop {
            body["stop"] = json!(stop);
        }
        if let Some(seed) = params.seed {
            body["seed"] = json!(seed);
        }

        Ok(ProviderWireRequest::new(Self::ENDPOINT, body))
    }

    fn decode_response(
        &self,
        response: &ProviderWireResponse,
    ) -> Result<IntermediateReply, EngineError> {
        let reply: ChatReply = serde_json::from_str(&response.body)
            .map_err(|e| EngineError::malformed(format!("chat completion did not parse: {}", e)))?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::malformed("chat completion carried no choices"))?;

        let raw_text = choice.message.content.unwrap_or_default();
        // Strict mode makes the content the JSON value itself; anything
        // else leaves the candidate empty for the extractor to classify.
        let candidate: Option<JsonValue> = serde_json::from_str(&raw_text).ok();
        let usage = reply
            .usage
            .map(|u| UsageStats::from_counters(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let mut decoded = IntermediateReply::new(raw_text)
            .with_finish_reason(map_finish(choice.finish_reason.as_deref()))
            .with_usage(usage);
        if let Some(candidate) = candidate {
            decoded = decoded.with_candidate(candidate);
        }
        if let Some(id) = reply.id {
            decoded = decoded.with_response_id(id);
        }
        if let Some(model) = reply.model {
            decoded = decoded.with_model(model);
        }
        if let Some(fingerprint) = reply.system_fingerprint {
            decoded = decoded.with_vendor_details(json!({"system_fingerprint": fingerprint}));
        }
        Ok(decoded)
    }
}

/// Explicit mapping from the provider's finish codes.
fn map_finish(code: Option<&str>) -> FinishReason {
    match code {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some("tool_calls") | Some("function_call") => FinishReason::ToolCall,
        _ => FinishReason::Unknown,
    }
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
    system_fingerprint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}
