//! # tessera
//!
//! Provider-agnostic structured output for large-language-model
//! services.
//!
//! A caller declares the shape of the reply it wants as a [`Schema`],
//! picks a provider and model, and gets back either a value guaranteed
//! to conform to that schema or a typed, inspectable failure, whichever
//! backend serves the request and however loosely it behaves.
//!
//! ## How a request flows
//!
//! 1. The [`Engine`] looks up the provider's adapter in its registry
//! 2. The adapter encodes the schema into that provider's native
//!    mechanism: a `response_format` constraint, a forced tool call, or
//!    a prompt directive
//! 3. The transport executes the wire request
//! 4. The adapter decodes the raw reply into a provider-agnostic
//!    intermediate form, normalizing finish reasons and token counters
//! 5. The validator walks the candidate against the schema and either
//!    produces the validated value or every field-level failure
//! 6. The envelope carries the value plus normalized metadata back to
//!    the caller
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tessera::{Engine, ProviderId};
//! use tessera_providers::{GroqAdapter, HttpTransport};
//! use tessera_schema::{BooleanSchema, ObjectSchema, StringSchema};
//!
//! # async fn run() -> Result<(), tessera::EngineError> {
//! let transport = HttpTransport::new(GroqAdapter::BASE_URL)
//!     .with_bearer_token(std::env::var("GROQ_API_KEY").unwrap_or_default());
//! let engine = Engine::new(Arc::new(transport));
//!
//! let envelope = engine
//!     .structured()
//!     .schema(
//!         ObjectSchema::new("output", "the output object")
//!             .with_property(StringSchema::new("weather", "The weather forecast"), true)
//!             .with_property(StringSchema::new("game_time", "The tigers game time"), true)
//!             .with_property(
//!                 BooleanSchema::new("coat_required", "whether a coat is required"),
//!                 true,
//!             ),
//!     )
//!     .using(ProviderId::Groq, "llama-3.3-70b-versatile")
//!     .system_prompt("The tigers game is at 3pm in Detroit, the temperature is expected to be 75º")
//!     .prompt("What time is the tigers game today and should I wear a coat?")
//!     .send()
//!     .await?;
//!
//! println!("{}: {:?}", envelope.model, envelope.structured.get("coat_required"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure taxonomy
//!
//! Every failure surfaces as one of five [`EngineError`] kinds:
//! `InvalidRequest` (rejected before any network cost),
//! `UnsupportedSchemaFeature` (schema/provider mismatch, detected while
//! encoding), `Transport` (network-level, propagated unchanged),
//! `MalformedReply` (the payload never parsed), and `Validation` (the
//! value parsed but does not conform, with one field path per failure).
//! Re-prompting after a validation failure is caller policy, not engine
//! behavior.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod engine;
pub mod extract;

pub use engine::{Engine, StructuredCall};
pub use extract::{Extraction, OutputExtractor, RejectReason};

// Re-exports from the workspace crates
pub use tessera_core::{
    EngineError, FinishReason, GenerationParams, IntermediateReply, ResponseEnvelope,
    TransportError, UsageStats, ValidatedOutput, ValidationError, ValidationFailure,
};
pub use tessera_providers::{
    ProviderAdapter, ProviderId, ProviderRegistry, StructuredRequest, Transport,
};
pub use tessera_schema::{
    ArraySchema, BooleanSchema, EnumSchema, NumberSchema, ObjectSchema, Schema, StringSchema,
    UnknownKeys, ValidationOptions,
};

/// Prelude for common imports.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{Engine, StructuredCall};
    pub use tessera_core::{
        EngineError, FinishReason, GenerationParams, ResponseEnvelope, TransportError, UsageStats,
        ValidatedOutput,
    };
    pub use tessera_providers::{
        HttpTransport, MockTransport, ProviderId, ProviderRegistry, StructuredRequest, Transport,
    };
    pub use tessera_schema::{
        ArraySchema, BooleanSchema, EnumSchema, NumberSchema, ObjectSchema, Schema, StringSchema,
        UnknownKeys, ValidationOptions,
    };
}
