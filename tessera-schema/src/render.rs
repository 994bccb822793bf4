//! Schema rendering for provider requests.
//!
//! Two renderings cover the provider capability levels: a JSON-Schema
//! object for providers with native structured output or tool calling,
//! and a textual directive for providers that only follow instructions
//! in the prompt. Adapters pick the rendering their wire format needs;
//! nothing provider-specific lives here.

use serde_json::{json, Value as JsonValue};

use crate::node::Schema;

impl Schema {
    /// Render the schema as a JSON-Schema object.
    ///
    /// Objects emit `properties`, `required`, and
    /// `additionalProperties: false`; arrays emit `items` and `minItems`
    /// when declared; enums emit a string `enum` list. Descriptions are
    /// carried on every node.
    #[must_use]
    pub fn to_json_schema(&self) -> JsonValue {
        match self {
            Self::String(s) => annotated(json!({"type": "string"}), &s.description),
            Self::Number(s) => annotated(json!({"type": "number"}), &s.description),
            Self::Boolean(s) => annotated(json!({"type": "boolean"}), &s.description),
            Self::Enum(s) => annotated(
                json!({"type": "string", "enum": s.values}),
                &s.description,
            ),
            Self::Array(s) => {
                let mut schema = json!({
                    "type": "array",
                    "items": s.items.to_json_schema(),
                });
                if let Some(min) = s.min_items {
                    schema["minItems"] = JsonValue::from(min);
                }
                annotated(schema, &s.description)
            }
            Self::Object(s) => {
                let mut properties = serde_json::Map::new();
                for (name, child) in s.properties() {
                    properties.insert(name.clone(), child.to_json_schema());
                }
                annotated(
                    json!({
                        "type": "object",
                        "properties": properties,
                        "required": s.required(),
                        "additionalProperties": false,
                    }),
                    &s.description,
                )
            }
        }
    }

    /// Render a textual directive for providers without native schema
    /// support.
    ///
    /// Appended to the system prompt; the model is asked to reply with
    /// only a JSON value matching the shape. This path is approximate by
    /// nature.
    #[must_use]
    pub fn to_prompt_directive(&self) -> String {
        let rendered = self.to_json_schema();
        let pretty =
            serde_json::to_string_pretty(&rendered).unwrap_or_else(|_| rendered.to_string());
        format!(
            "Respond with ONLY a JSON value that matches the following schema. \
             Do not include any other text, explanation, or markdown fences.\n\n{}",
            pretty
        )
    }
}

fn annotated(mut schema: JsonValue, description: &str) -> JsonValue {
    if !description.is_empty() {
        schema["description"] = JsonValue::String(description.to_string());
    }
    schema
}
