//! Provider-agnostic decoded replies.

use serde_json::Value as JsonValue;

use crate::finish::FinishReason;
use crate::usage::UsageStats;

/// Provider-agnostic result of decoding a raw provider response.
///
/// This is the contract boundary between a provider adapter and the
/// validator: the adapter normalizes wire-format differences into this
/// shape, and the extraction pipeline consumes it immediately. One is
/// created per round-trip and discarded after extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntermediateReply {
    /// The reply's textual content, verbatim.
    pub raw_text: String,
    /// The semi-structured value the adapter recovered from the reply,
    /// if any. `None` means the reply text never parsed as a value.
    pub candidate: Option<JsonValue>,
    /// Normalized finish reason.
    pub finish_reason: FinishReason,
    /// Token usage, verbatim from provider counters.
    pub usage: UsageStats,
    /// Provider-assigned response id, when present.
    pub response_id: Option<String>,
    /// Model identifier the provider reports having served the request.
    pub model: Option<String>,
    /// Opaque provider-specific metadata not covered by the fields above.
    pub vendor_details: Option<JsonValue>,
}

impl IntermediateReply {
    /// Create a reply holding only raw text.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// Set the parsed candidate value.
    #[must_use]
    pub fn with_candidate(mut self, candidate: JsonValue) -> Self {
        self.candidate = Some(candidate);
        self
    }

    /// Set the finish reason.
    #[must_use]
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }

    /// Set usage stats.
    #[must_use]
    pub fn with_usage(mut self, usage: UsageStats) -> Self {
        self.usage = usage;
        self
    }

    /// Set the provider response id.
    #[must_use]
    pub fn with_response_id(mut self, id: impl Into<String>) -> Self {
        self.response_id = Some(id.into());
        self
    }

    /// Set the serving model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attach opaque vendor metadata.
    #[must_use]
    pub fn with_vendor_details(mut self, details: JsonValue) -> Self {
        self.vendor_details = Some(details);
        self
    }
}
