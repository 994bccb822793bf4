//! Groq adapter.
//!
//! Groq speaks an OpenAI-compatible wire format but, for this engine's
//! purposes, offers no schema-aware response format. The schema is
//! rendered as a textual directive appended to the system prompt,
//! `json_object` mode keeps the reply JSON-shaped, and the candidate is
//! recovered from the reply text, tolerating fences and surrounding
//! prose.

use serde::Deserialize;
use serde_json::json;

use tessera_core::{EngineError, FinishReason, IntermediateReply, UsageStats};

use crate::adapter::{ProviderAdapter, ProviderId, SchemaCapability};
use crate::request::StructuredRequest;
use crate::scan::scan_json;
use crate::wire::{ProviderWireRequest, ProviderWireResponse};

/// Adapter for Groq chat completions via prompt coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroqAdapter;

impl GroqAdapter {
    /// Default API base URL.
    pub const BASE_URL: &'static str = "https://api.groq.com/openai/v1";

    /// Chat completions endpoint, relative to the base URL.
    pub const ENDPOINT: &'static str = "/chat/completions";

    /// Create a new adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProviderAdapter for GroqAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn capability(&self) -> SchemaCapability {
        SchemaCapability::PromptCoercion
    }

    fn encode_request(
        &self,
        request: &StructuredRequest,
    ) -> Result<ProviderWireRequest, EngineError> {
        // The prompt path can describe any root shape; no schema
        // construct is rejected here.
        let directive = request.schema.to_prompt_directive();
        let system = match &request.system_prompt {
            Some(prompt) => format!("{}\n\n{}", prompt, directive),
            None => directive,
        };

        let mut body = json!({
            "model": request.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": request.prompt},
            ],
            "response_format": {"type": "json_object"},
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
        let candidate = scan_json(&raw_text);
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
        Ok(decoded)
    }
}

/// Explicit mapping from the provider's finish codes.
fn map_finish(code: Option<&str>) -> FinishReason {
    match code {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some("tool_calls") => FinishReason::ToolCall,
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use tessera_schema::{BooleanSchema, ObjectSchema, StringSchema};

    fn weather_request() -> StructuredRequest {
        StructuredRequest::builder()
            .schema(
                ObjectSchema::new("output", "the output object")
                    .with_property(StringSchema::new("weather", "The weather forecast"), true)
                    .with_property(StringSchema::new("game_time", "The tigers game time"), true)
                    .with_property(
                        BooleanSchema::new("coat_required", "whether a coat is required"),
                        true,
                    ),
            )
            .system_prompt("The tigers game is at 3pm in Detroit")
            .prompt("What time is the tigers game today and should I wear a coat?")
            .using(ProviderId::Groq, "llama-3.3-70b-versatile")
            .build()
            .unwrap()
    }

    #[test]
    fn test_encode_appends_directive_to_system_prompt() {
        let wire = GroqAdapter::new().encode_request(&weather_request()).unwrap();
        assert_eq!(wire.endpoint, GroqAdapter::ENDPOINT);
        assert_eq!(wire.body["response_format"], json!({"type": "json_object"}));

        let system = wire.body["messages"][0]["content"].as_str().unwrap();
        assert!(system.starts_with("The tigers game is at 3pm in Detroit"));
        assert!(system.contains("Respond with ONLY a JSON value"));
        assert!(system.contains("\"coat_required\""));
    }

    #[test]
    fn test_encode_without_system_prompt_uses_directive_alone() {
        let mut request = weather_request();
        request.system_prompt = None;
        let wire = GroqAdapter::new().encode_request(&request).unwrap();
        let system = wire.body["messages"][0]["content"].as_str().unwrap();
        assert!(system.starts_with("Respond with ONLY a JSON value"));
    }

    #[test]
    fn test_encode_accepts_non_object_root() {
        let request = StructuredRequest::builder()
            .schema(StringSchema::new("answer", "the answer"))
            .prompt("Just the answer")
            .using(ProviderId::Groq, "llama-3.3-70b-versatile")
            .build()
            .unwrap();
        assert!(GroqAdapter::new().encode_request(&request).is_ok());
    }

    #[test]
    fn test_decode_structured_reply() {
        let body = json!({
            "id": "chatcmpl-259cad75-8b85-4980-a0db-5f64b91b1fc5",
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"weather\":\"75º\",\"game_time\":\"3pm\",\"coat_required\":false}",
                },
                "finish_reason": "stop",
            }],
            "usage": {"prompt_tokens": 172, "completion_tokens": 26, "total_tokens": 198},
        });
        let reply = GroqAdapter::new()
            .decode_response(&ProviderWireResponse::ok_json(&body))
            .unwrap();
        assert_eq!(
            reply.candidate,
            Some(json!({"weather": "75º", "game_time": "3pm", "coat_required": false}))
        );
        assert_eq!(reply.finish_reason, FinishReason::Stop);
        assert_eq!(reply.usage, UsageStats::new(172, 26));
        assert_eq!(
            reply.response_id.as_deref(),
            Some("chatcmpl-259cad75-8b85-4980-a0db-5f64b91b1fc5")
        );
        assert_eq!(reply.model.as_deref(), Some("llama-3.3-70b-versatile"));
    }

    #[test]
    fn test_decode_fenced_reply_recovers_candidate() {
        let body = json!({
            "choices": [{
                "message": {"content": "```json\n{\"weather\": \"75º\"}\n```"},
                "finish_reason": "stop",
            }],
        });
        let reply = GroqAdapter::new()
            .decode_response(&ProviderWireResponse::ok_json(&body))
            .unwrap();
        assert_eq!(reply.candidate, Some(json!({"weather": "75º"})));
    }

    #[test]
    fn test_decode_prose_reply_leaves_candidate_empty() {
        let body = json!({
            "choices": [{
                "message": {"content": "I'm sorry, I can't answer that as JSON."},
                "finish_reason": "stop",
            }],
        });
        let reply = GroqAdapter::new()
            .decode_response(&ProviderWireResponse::ok_json(&body))
            .unwrap();
        assert!(reply.candidate.is_none());
        assert!(!reply.raw_text.is_empty());
    }

    #[test]
    fn test_decode_unparseable_body() {
        let err = GroqAdapter::new()
            .decode_response(&ProviderWireResponse::new(200, "Internal Server Error"))
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedReply(_)));
    }

    #[rstest]
    #[case("stop", FinishReason::Stop)]
    #[case("length", FinishReason::Length)]
    #[case("content_filter", FinishReason::ContentFilter)]
    #[case("tool_calls", FinishReason::ToolCall)]
    #[case("eos_token", FinishReason::Unknown)]
    fn test_finish_mapping(#[case] code: &str, #[case] expected: FinishReason) {
        assert_eq!(map_finish(Some(code)), expected);
    }
}
