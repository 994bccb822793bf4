//! Reply extraction pipeline.
//!
//! One request's reply moves through a fixed set of states:
//!
//! ```text
//! Received(raw) -> Parsed(IntermediateReply) -> Validated | Rejected
//! ```
//!
//! The first transition is the adapter's decode step; a decode failure
//! rejects the reply as malformed without ever invoking validation. The
//! second transition runs schema validation on the parsed candidate.
//! Both rejection shapes are terminal and surface to the caller; the
//! engine never re-prompts the model on its own.

use tessera_core::{EngineError, IntermediateReply, MalformedReply, ValidatedOutput, ValidationFailure};
use tessera_schema::{Schema, ValidationOptions};

/// Terminal outcome of extracting one reply.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// The candidate conformed to the schema.
    Validated(ValidatedOutput),
    /// The reply was rejected; see the reason.
    Rejected(RejectReason),
}

/// Why a reply was rejected.
#[derive(Debug, Clone)]
pub enum RejectReason {
    /// The reply never parsed as a value. Validation was not invoked.
    Malformed(MalformedReply),
    /// The candidate parsed but failed schema validation.
    Validation(ValidationFailure),
}

impl Extraction {
    /// Whether extraction produced a validated value.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        matches!(self, Self::Validated(_))
    }

    /// Convert into the engine's result shape.
    pub fn into_result(self) -> Result<ValidatedOutput, EngineError> {
        match self {
            Self::Validated(output) => Ok(output),
            Self::Rejected(RejectReason::Malformed(err)) => Err(EngineError::MalformedReply(err)),
            Self::Rejected(RejectReason::Validation(failure)) => {
                Err(EngineError::Validation(failure))
            }
        }
    }
}

/// Runs the `Parsed -> Validated | Rejected` transition.
#[derive(Debug, Clone, Default)]
pub struct OutputExtractor {
    options: ValidationOptions,
}

impl OutputExtractor {
    /// Create an extractor with default validation options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with explicit validation options.
    #[must_use]
    pub fn with_options(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// Extract a validated value from a decoded reply.
    ///
    /// A reply whose candidate is absent never parsed as a value and is
    /// rejected as malformed before validation runs.
    pub fn run(&self, schema: &Schema, reply: &IntermediateReply) -> Extraction {
        let Some(candidate) = &reply.candidate else {
            return Extraction::Rejected(RejectReason::Malformed(MalformedReply::new(
                "reply text did not contain a parseable value",
            )));
        };
        match schema.validate_with(candidate, &self.options) {
            Ok(output) => Extraction::Validated(output),
            Err(failure) => {
                tracing::debug!(errors = failure.len(), "reply failed schema validation");
                Extraction::Rejected(RejectReason::Validation(failure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use tessera_schema::{BooleanSchema, ObjectSchema, StringSchema};

    fn weather_schema() -> Schema {
        ObjectSchema::new("output", "")
            .with_property(StringSchema::new("weather", ""), true)
            .with_property(BooleanSchema::new("coat_required", ""), true)
            .into()
    }

    #[test]
    fn test_conformant_candidate_validates() {
        let reply = IntermediateReply::new("")
            .with_candidate(json!({"weather": "75º", "coat_required": false}));
        let extraction = OutputExtractor::new().run(&weather_schema(), &reply);
        assert!(extraction.is_validated());
        let output = extraction.into_result().unwrap();
        assert_eq!(output.get("coat_required"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_candidate_is_malformed() {
        let reply = IntermediateReply::new("no json here at all");
        let extraction = OutputExtractor::new().run(&weather_schema(), &reply);
        let err = extraction.into_result().unwrap_err();
        assert!(matches!(err, EngineError::MalformedReply(_)));
    }

    #[test]
    fn test_nonconformant_candidate_is_validation_failure() {
        let reply = IntermediateReply::new("").with_candidate(json!({"weather": "75º"}));
        let extraction = OutputExtractor::new().run(&weather_schema(), &reply);
        match extraction.into_result().unwrap_err() {
            EngineError::Validation(failure) => {
                assert_eq!(failure.paths(), vec!["coat_required"]);
            }
            other => panic!("expected validation failure, got {}", other),
        }
    }
}
