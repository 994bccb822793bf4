//! Anthropic adapter.
//!
//! Uses the messages API with a forced tool call: the rendered schema
//! becomes the input schema of one synthetic tool, `tool_choice` pins
//! the model to it, and the structured value is read back out of the
//! `tool_use` block's input.

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use tessera_core::{EngineError, FinishReason, IntermediateReply, UsageStats};

use crate::adapter::{ProviderAdapter, ProviderId, SchemaCapability};
use crate::request::StructuredRequest;
use crate::wire::{ProviderWireRequest, ProviderWireResponse};

/// Name of the synthetic output tool.
pub const OUTPUT_TOOL_NAME: &str = "structured_output";

/// The messages API requires max_tokens; used when the caller sets none.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Adapter for the Anthropic messages API using a forced tool call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    /// Default API base URL.
    pub const BASE_URL: &'static str = "https://api.anthropic.com";

    /// Messages endpoint, relative to the base URL.
    pub const ENDPOINT: &'static str = "/v1/messages";

    /// Create a new adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn capability(&self) -> SchemaCapability {
        SchemaCapability::ToolCall
    }

    fn encode_request(
        &self,
        request: &StructuredRequest,
    ) -> Result<ProviderWireRequest, EngineError> {
        if !request.schema.is_object() {
            return Err(EngineError::unsupported(
                self.id().to_string(),
                "tool input schema must be an object at the root",
            ));
        }

        let description = if request.schema.description().is_empty() {
            "Record the structured response for this request.".to_string()
        } else {
            request.schema.description().to_string()
        };

        let mut body = json!({
            "model": request.model,
            "max_tokens": request.params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{"role": "user", "content": request.prompt}],
            "tools": [{
                "name": OUTPUT_TOOL_NAME,
                "description": description,
                "input_schema": request.schema.to_json_schema(),
            }],
            "tool_choice": {"type": "tool", "name": OUTPUT_TOOL_NAME},
        });
        if let Some(system) = &request.system_prompt {
            body["system"] = json!(system);
        }
        let params = &request.params;
        if let Some(temperature) = params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = params.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(stop) = &params.stop {
            body["stop_sequences"] = json!(stop);
        }
        // seed has no equivalent on this API and is not forwarded

        Ok(ProviderWireRequest::new(Self::ENDPOINT, body))
    }

    fn decode_response(
        &self,
        response: &ProviderWireResponse,
    ) -> Result<IntermediateReply, EngineError> {
        let reply: MessagesReply = serde_json::from_str(&response.body)
            .map_err(|e| EngineError::malformed(format!("messages reply did not parse: {}", e)))?;

        let mut text_parts = Vec::new();
        let mut candidate: Option<JsonValue> = None;
        for block in &reply.content {
            match block.get("type").and_then(JsonValue::as_str) {
                Some("text") => {
                    if let Some(text) = block.get("text").and_then(JsonValue::as_str) {
                        text_parts.push(text.to_string());
                    }
                }
                Some("tool_use") if candidate.is_none() => {
                    let name = block.get("name").and_then(JsonValue::as_str);
                    if name == Some(OUTPUT_TOOL_NAME) {
                        candidate = block.get("input").cloned();
                    }
                }
                _ => {}
            }
        }

        let raw_text = if text_parts.is_empty() {
            candidate
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        } else {
            text_parts.join("\n")
        };
        let usage = reply
            .usage
            .map(|u| UsageStats::from_counters(u.input_tokens, u.output_tokens))
            .unwrap_or_default();

        let mut decoded = IntermediateReply::new(raw_text)
            .with_finish_reason(map_stop(reply.stop_reason.as_deref()))
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
        Ok(decoded)
    }
}

/// Explicit mapping from the provider's stop reasons.
fn map_stop(code: Option<&str>) -> FinishReason {
    match code {
        Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        Some("tool_use") => FinishReason::ToolCall,
        Some("refusal") => FinishReason::ContentFilter,
        _ => FinishReason::Unknown,
    }
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    content: Vec<JsonValue>,
    stop_reason: Option<String>,
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}
