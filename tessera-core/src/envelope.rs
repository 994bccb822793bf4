//! The response envelope returned to callers.

use serde::Serialize;

use crate::finish::FinishReason;
use crate::output::ValidatedOutput;
use crate::reply::IntermediateReply;
use crate::usage::UsageStats;

/// Cross-provider normalized response returned to the caller.
///
/// Owned exclusively by the caller after return; the engine holds no
/// reference to it and no state between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    /// Provider-assigned response id, or `""` if the provider omitted one.
    pub id: String,
    /// Model that served the request; falls back to the requested model
    /// id when the provider does not echo one.
    pub model: String,
    /// The validated structured value.
    pub structured: ValidatedOutput,
    /// Token usage, verbatim from provider counters.
    pub usage: UsageStats,
    /// Normalized finish reason.
    pub finish_reason: FinishReason,
}

impl ResponseEnvelope {
    /// Assemble an envelope from a decoded reply and its validated output.
    ///
    /// A pure mapping: no branching beyond filling absent optional fields
    /// with their documented defaults. Cannot fail given validated inputs.
    #[must_use]
    pub fn assemble(
        reply: IntermediateReply,
        structured: ValidatedOutput,
        requested_model: &str,
    ) -> Self {
        Self {
            id: reply.response_id.unwrap_or_default(),
            model: reply.model.unwrap_or_else(|| requested_model.to_string()),
            structured,
            usage: reply.usage,
            finish_reason: reply.finish_reason,
        }
    }
}
