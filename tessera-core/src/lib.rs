//! # tessera-core
//!
//! Core types, errors, and response metadata for the tessera structured
//! output engine.
//!
//! This crate provides the foundational types shared across the tessera
//! workspace:
//!
//! - **Errors**: the five-kind engine taxonomy ([`EngineError`]) plus
//!   structured validation errors with field paths
//! - **Usage**: provider-reported token counters ([`UsageStats`])
//! - **Finish reasons**: normalized stop codes ([`FinishReason`])
//! - **Replies**: the adapter/validator contract ([`IntermediateReply`])
//! - **Envelopes**: the caller-facing response shape ([`ResponseEnvelope`])
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{FinishReason, IntermediateReply, UsageStats};
//!
//! let reply = IntermediateReply::new(r#"{"ok": true}"#)
//!     .with_candidate(serde_json::json!({"ok": true}))
//!     .with_finish_reason(FinishReason::Stop)
//!     .with_usage(UsageStats::from_counters(Some(12), None));
//!
//! assert_eq!(reply.usage.completion_tokens, 0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod envelope;
pub mod errors;
pub mod finish;
pub mod output;
pub mod params;
pub mod reply;
pub mod usage;

// Re-exports for convenience
pub use envelope::ResponseEnvelope;
pub use errors::{
    EngineError, MalformedReply, PathSegment, Result, TransportError, TypeTag, ValidationError,
    ValidationFailure,
};
pub use finish::FinishReason;
pub use output::ValidatedOutput;
pub use params::GenerationParams;
pub use reply::IntermediateReply;
pub use usage::UsageStats;
