//! Weather demo: the full structured output pipeline on a scripted
//! transport, so it runs without any API key.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p tessera-demos --bin weather
//! ```

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use tessera::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Scripted Groq-style reply; swap for an HttpTransport pointed at
    // the Groq base URL with a bearer token to hit the real API.
    let transport = MockTransport::new().with_json_response(
        200,
        &json!({
            "id": "chatcmpl-demo",
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"weather\":\"75º\",\"game_time\":\"3pm\",\"coat_required\":false}",
                },
                "finish_reason": "stop",
            }],
            "usage": {"prompt_tokens": 172, "completion_tokens": 26},
        }),
    );
    let engine = Engine::new(Arc::new(transport));

    let envelope = engine
        .structured()
        .schema(
            ObjectSchema::new("output", "the output object")
                .with_property(StringSchema::new("weather", "The weather forecast"), true)
                .with_property(StringSchema::new("game_time", "The tigers game time"), true)
                .with_property(
                    BooleanSchema::new("coat_required", "whether a coat is required"),
                    true,
                ),
        )
        .using(ProviderId::Groq, "llama-3.3-70b-versatile")
        .system_prompt("The tigers game is at 3pm in Detroit, the temperature is expected to be 75º")
        .prompt("What time is the tigers game today and should I wear a coat?")
        .send()
        .await?;

    tracing::info!(id = %envelope.id, model = %envelope.model, "structured reply received");
    println!("structured: {}", serde_json::to_string_pretty(envelope.structured.value())?);
    println!(
        "usage: {} prompt + {} completion tokens, finished: {}",
        envelope.usage.prompt_tokens, envelope.usage.completion_tokens, envelope.finish_reason
    );
    Ok(())
}
