//! The provider adapter interface.
//!
//! An adapter owns both directions of one provider's wire format:
//! encoding a [`StructuredRequest`] into that provider's native
//! structured-output mechanism, and decoding the raw reply back into the
//! provider-agnostic [`IntermediateReply`]. Adapters hold no state and
//! are safely shared read-only across concurrent requests; adding a
//! provider means adding one adapter without touching the schema model
//! or the validator.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tessera_core::{EngineError, IntermediateReply};

use crate::request::StructuredRequest;
use crate::wire::{ProviderWireRequest, ProviderWireResponse};

/// Identifier of a backend provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    /// OpenAI chat completions.
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic messages.
    #[serde(rename = "anthropic")]
    Anthropic,
    /// Groq chat completions (OpenAI-compatible wire format).
    #[serde(rename = "groq")]
    Groq,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Groq => "groq",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "groq" => Ok(Self::Groq),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// How a provider constrains output to a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaCapability {
    /// The provider accepts a schema directly as a response-format
    /// constraint.
    NativeSchema,
    /// The schema is wrapped as a single synthetic tool the model is
    /// forced to invoke; the result comes from that tool's arguments.
    ToolCall,
    /// The schema is described in the system prompt and the model is
    /// asked to reply with only matching JSON. Approximate by nature.
    PromptCoercion,
}

impl fmt::Display for SchemaCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NativeSchema => "native_schema",
            Self::ToolCall => "tool_call",
            Self::PromptCoercion => "prompt_coercion",
        };
        write!(f, "{}", s)
    }
}

/// Per-provider request/response translation.
///
/// Implementations are pure: no side effects beyond the returned values,
/// no state retained across requests.
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter speaks for.
    fn id(&self) -> ProviderId;

    /// The structured-output mechanism this adapter uses.
    fn capability(&self) -> SchemaCapability;

    /// Encode a request into the provider's wire format.
    ///
    /// Fails with `UnsupportedSchemaFeature` when the schema contains a
    /// construct this provider cannot represent; the caller should
    /// simplify the schema or choose another provider.
    fn encode_request(
        &self,
        request: &StructuredRequest,
    ) -> Result<ProviderWireRequest, EngineError>;

    /// Decode a raw provider reply into the intermediate representation.
    ///
    /// Finish reasons are mapped through an explicit per-provider table
    /// and token counters are taken verbatim, a missing counter reading
    /// as 0. Fails with `MalformedReply` when the payload cannot be
    /// parsed at all; schema conformance is checked later by the
    /// validator, not here.
    fn decode_response(
        &self,
        response: &ProviderWireResponse,
    ) -> Result<IntermediateReply, EngineError>;
}

/// Shared adapter handle for registries and engines.
pub type BoxedAdapter = Arc<dyn ProviderAdapter>;
