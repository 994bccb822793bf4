//! End-to-end structured output scenarios on scripted transports.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use tessera::prelude::*;
use tessera_core::TypeTag;
use tessera_providers::{AnthropicAdapter, OpenAiAdapter};

fn weather_schema() -> ObjectSchema {
    ObjectSchema::new("output", "the output object")
        .with_property(StringSchema::new("weather", "The weather forecast"), true)
        .with_property(StringSchema::new("game_time", "The tigers game time"), true)
        .with_property(
            BooleanSchema::new("coat_required", "whether a coat is required"),
            true,
        )
}

fn groq_weather_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-259cad75-8b85-4980-a0db-5f64b91b1fc5",
        "object": "chat.completion",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop",
        }],
        "usage": {"prompt_tokens": 172, "completion_tokens": 26, "total_tokens": 198},
    })
}

fn groq_engine(transport: MockTransport) -> Engine {
    Engine::new(Arc::new(transport))
}

#[tokio::test]
async fn returns_structured_output() {
    let transport = MockTransport::new().with_json_response(
        200,
        &groq_weather_body(r#"{"weather":"75º","game_time":"3pm","coat_required":false}"#),
    );
    let engine = groq_engine(transport);

    let envelope = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .system_prompt("The tigers game is at 3pm in Detroit, the temperature is expected to be 75º")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await
        .unwrap();

    assert_eq!(
        envelope.structured.clone().into_value(),
        json!({"weather": "75º", "game_time": "3pm", "coat_required": false})
    );
    assert_eq!(envelope.id, "chatcmpl-259cad75-8b85-4980-a0db-5f64b91b1fc5");
    assert_eq!(envelope.model, "llama-3.3-70b-versatile");
    assert_eq!(envelope.usage.prompt_tokens, 172);
    assert_eq!(envelope.usage.completion_tokens, 26);
    assert_eq!(envelope.finish_reason, FinishReason::Stop);
}

#[tokio::test]
async fn missing_required_field_rejects_with_one_path() {
    let transport = MockTransport::new().with_json_response(
        200,
        &groq_weather_body(r#"{"weather":"75º","game_time":"3pm"}"#),
    );
    let engine = groq_engine(transport);

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(failure) => {
            assert_eq!(failure.len(), 1);
            let error = &failure.errors[0];
            assert_eq!(error.path_string(), "coat_required");
            assert_eq!(error.expected, TypeTag::Boolean);
            assert_eq!(error.actual, TypeTag::Missing);
        }
        other => panic!("expected validation failure, got {}", other),
    }
}

#[tokio::test]
async fn unparseable_reply_is_malformed_not_validation() {
    let transport = MockTransport::new().with_json_response(
        200,
        &groq_weather_body("I would rather chat about the Tigers."),
    );
    let engine = groq_engine(transport);

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today?")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::MalformedReply(_)));
    assert!(!err.is_retryable_with_repair());
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let transport = MockTransport::new()
        .with_response(tessera_providers::ProviderWireResponse::new(200, "<html>oops</html>"));
    let engine = groq_engine(transport);

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today?")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::MalformedReply(_)));
}

#[tokio::test]
async fn unknown_extra_keys_are_stripped() {
    let transport = MockTransport::new().with_json_response(
        200,
        &groq_weather_body(
            r#"{"weather":"75º","game_time":"3pm","coat_required":false,"commentary":"go tigers"}"#,
        ),
    );
    let engine = groq_engine(transport);

    let envelope = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await
        .unwrap();

    assert!(envelope.structured.get("commentary").is_none());
    assert_eq!(envelope.structured.get("weather"), Some(&json!("75º")));
}

#[tokio::test]
async fn strict_unknown_key_policy_rejects() {
    let transport = MockTransport::new().with_json_response(
        200,
        &groq_weather_body(
            r#"{"weather":"75º","game_time":"3pm","coat_required":false,"commentary":"go tigers"}"#,
        ),
    );
    let engine = groq_engine(transport)
        .with_validation(ValidationOptions::new().unknown_keys(UnknownKeys::Reject));

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(failure) => {
            assert_eq!(failure.paths(), vec!["commentary"]);
        }
        other => panic!("expected validation failure, got {}", other),
    }
}

#[tokio::test]
async fn echoed_payload_round_trips_through_native_schema() {
    let payload = json!({"weather": "75º", "game_time": "3pm", "coat_required": false});
    let transport = Arc::new(MockTransport::new().with_json_response(
        200,
        &json!({
            "id": "chatcmpl-echo",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"content": payload.to_string()},
                "finish_reason": "stop",
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 10},
        }),
    ));
    let engine = Engine::new(transport.clone());

    let envelope = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::OpenAi, "gpt-4o-mini")
        .prompt("Echo the forecast back")
        .send()
        .await
        .unwrap();

    assert_eq!(envelope.structured.into_value(), payload);

    // The outbound request really carried the schema constraint.
    let recorded = transport.recorded_requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].endpoint, OpenAiAdapter::ENDPOINT);
    assert_eq!(
        recorded[0].body["response_format"]["type"],
        json!("json_schema")
    );
}

#[tokio::test]
async fn anthropic_tool_call_path_end_to_end() {
    let transport = Arc::new(MockTransport::new().with_json_response(
        200,
        &json!({
            "id": "msg_01ABC",
            "model": "claude-sonnet-4-20250514",
            "content": [{
                "type": "tool_use",
                "id": "toolu_01",
                "name": "structured_output",
                "input": {"weather": "75º", "game_time": "3pm", "coat_required": false},
            }],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 210, "output_tokens": 31},
        }),
    ));
    let engine = Engine::new(transport.clone());

    let envelope = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Anthropic, "claude-sonnet-4-20250514")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await
        .unwrap();

    assert_eq!(envelope.id, "msg_01ABC");
    assert_eq!(envelope.finish_reason, FinishReason::ToolCall);
    assert_eq!(envelope.usage.prompt_tokens, 210);
    assert_eq!(envelope.structured.get("coat_required"), Some(&json!(false)));

    let recorded = transport.recorded_requests();
    assert_eq!(recorded[0].endpoint, AnthropicAdapter::ENDPOINT);
    assert_eq!(recorded[0].body["tool_choice"]["type"], json!("tool"));
}

#[tokio::test]
async fn transport_failure_propagates_unchanged() {
    let transport = MockTransport::new().with_error(TransportError::Timeout);
    let engine = groq_engine(transport);

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today?")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn cancelled_call_surfaces_without_partial_validation() {
    let transport = MockTransport::new().with_error(TransportError::Cancelled);
    let engine = groq_engine(transport);

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today?")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Transport(TransportError::Cancelled)
    ));
    assert!(!err.is_retryable_with_repair());
}

#[tokio::test]
async fn invalid_request_never_reaches_transport() {
    let transport = Arc::new(MockTransport::new());
    let engine = Engine::new(transport.clone());

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("   ")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidRequest(_)));
    assert!(transport.recorded_requests().is_empty());
}

#[tokio::test]
async fn unsupported_schema_detected_before_sending() {
    let transport = Arc::new(MockTransport::new());
    let engine = Engine::new(transport.clone());

    // A chain deeper than the provider's strict-schema cap.
    let mut schema = ObjectSchema::new("level6", "");
    for level in (1..=5).rev() {
        schema = ObjectSchema::new(format!("level{}", level), "").with_property(schema, true);
    }

    let err = engine
        .structured()
        .schema(schema)
        .using(ProviderId::OpenAi, "gpt-4o-mini")
        .prompt("nest away")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::UnsupportedSchemaFeature { .. }));
    assert!(transport.recorded_requests().is_empty());
}

#[tokio::test]
async fn concurrent_calls_share_one_engine() {
    let body = groq_weather_body(r#"{"weather":"75º","game_time":"3pm","coat_required":false}"#);
    let transport = MockTransport::new()
        .with_json_response(200, &body)
        .with_json_response(200, &body);
    let engine = groq_engine(transport);

    let call = |engine: Engine| async move {
        engine
            .structured()
            .schema(weather_schema())
            .using(ProviderId::Groq, "llama-3.3-70b-versatile")
            .prompt("What time is the tigers game today and should I wear a coat?")
            .send()
            .await
    };

    let (first, second) = tokio::join!(call(engine.clone()), call(engine));
    assert_eq!(first.unwrap().structured, second.unwrap().structured);
}

#[tokio::test]
async fn weather_scenario_over_http() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groq_weather_body(
            r#"{"weather":"75º","game_time":"3pm","coat_required":false}"#,
        )))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri()).with_bearer_token("test-key");
    let engine = Engine::new(Arc::new(transport));

    let envelope = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .system_prompt("The tigers game is at 3pm in Detroit, the temperature is expected to be 75º")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await
        .unwrap();

    assert_eq!(envelope.id, "chatcmpl-259cad75-8b85-4980-a0db-5f64b91b1fc5");
    assert_eq!(envelope.structured.get("game_time"), Some(&json!("3pm")));
    assert_eq!(envelope.usage.prompt_tokens, 172);
}

#[tokio::test]
async fn http_error_status_is_a_transport_failure() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let engine = Engine::new(Arc::new(HttpTransport::new(server.uri())));

    let err = engine
        .structured()
        .schema(weather_schema())
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .prompt("What time is the tigers game today?")
        .send()
        .await
        .unwrap_err();

    match err {
        EngineError::Transport(TransportError::Status { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected transport status error, got {}", other),
    }
}
