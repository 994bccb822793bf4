//! # tessera-providers
//!
//! Provider adapters, registry, and the transport boundary for the
//! tessera structured output engine.
//!
//! Each [`ProviderAdapter`] owns one provider's wire format end to end:
//! encoding a [`StructuredRequest`] into that provider's structured
//! output mechanism and decoding the raw reply into the shared
//! intermediate representation. The capability levels differ:
//!
//! - **OpenAI** ([`OpenAiAdapter`]): native schema via
//!   `response_format: json_schema`
//! - **Anthropic** ([`AnthropicAdapter`]): a single forced tool call
//!   whose arguments carry the structured value
//! - **Groq** ([`GroqAdapter`]): prompt coercion with `json_object` mode
//!
//! The [`ProviderRegistry`] maps provider ids to adapter instances and
//! is passed to the engine as a plain value. The [`Transport`] trait is
//! the only place network I/O happens; [`HttpTransport`] is the reqwest
//! implementation and [`MockTransport`] scripts responses for tests.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod anthropic;
pub mod groq;
pub mod openai;
pub mod registry;
pub mod request;
pub mod scan;
pub mod transport;
pub mod wire;

pub use adapter::{BoxedAdapter, ProviderAdapter, ProviderId, SchemaCapability};
pub use anthropic::AnthropicAdapter;
pub use groq::GroqAdapter;
pub use openai::OpenAiAdapter;
pub use registry::ProviderRegistry;
pub use request::{StructuredRequest, StructuredRequestBuilder};
pub use scan::scan_json;
pub use transport::{HttpTransport, MockTransport, Transport};
pub use wire::{ProviderWireRequest, ProviderWireResponse};
