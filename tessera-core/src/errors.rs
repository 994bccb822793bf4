//! Error types for the structured output engine.
//!
//! The engine surfaces exactly five failure kinds to callers, each
//! distinct and inspectable: a malformed request that never reaches the
//! network, a schema the target provider cannot encode, a transport-level
//! failure, a provider reply that did not parse at all, and a reply that
//! parsed but does not conform to the declared schema.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// The main error type for structured output requests.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller-side malformed input, rejected before any network cost.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The schema contains a construct the selected provider cannot
    /// represent. Detected while encoding, before sending.
    #[error("schema feature unsupported by {provider}: {detail}")]
    UnsupportedSchemaFeature {
        /// Provider that rejected the schema.
        provider: String,
        /// Which construct could not be encoded.
        detail: String,
    },

    /// Network, timeout, or auth failure, propagated unchanged from the
    /// transport collaborator.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The provider returned a payload that could not be parsed as a
    /// value. This is provider misbehavior, not a schema issue.
    #[error(transparent)]
    MalformedReply(#[from] MalformedReply),

    /// The reply parsed but does not conform to the declared schema.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

impl EngineError {
    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an unsupported schema feature error.
    pub fn unsupported(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedSchemaFeature {
            provider: provider.into(),
            detail: detail.into(),
        }
    }

    /// Create a malformed reply error.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedReply(MalformedReply::new(detail))
    }

    /// Whether re-invoking the pipeline with a correction prompt could
    /// plausibly succeed.
    ///
    /// True only for validation failures: the model produced a value, it
    /// just didn't conform. Re-prompting is caller policy, never engine
    /// behavior; callers can cite [`ValidationFailure::paths`] in the
    /// repair prompt.
    #[must_use]
    pub fn is_retryable_with_repair(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Transport-level failure.
///
/// Opaque to the engine: timeout and retry policy belong to the
/// transport collaborator, and the engine never attempts partial
/// validation of a partial payload.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The request was cancelled before completion.
    #[error("request was cancelled")]
    Cancelled,

    /// The connection failed or the body could not be read.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },
}

/// The provider returned a payload that did not parse as a value.
///
/// Raised before schema validation ever runs; a reply that parses but
/// does not conform is a [`ValidationFailure`] instead.
#[derive(Debug, Clone, Error)]
#[error("malformed provider reply: {detail}")]
pub struct MalformedReply {
    /// What failed to parse.
    pub detail: String,
}

impl MalformedReply {
    /// Create a new malformed reply error.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// JSON type tag used in validation error reporting.
///
/// `Missing` stands for "no value at all": a required field that is
/// absent reports `actual = Missing`, and an unknown field rejected
/// under the strict policy reports `expected = Missing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// One of a declared set of string literals.
    Enum,
    /// JSON null.
    Null,
    /// No value present.
    Missing,
}

impl TypeTag {
    /// The tag of a candidate JSON value.
    #[must_use]
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Boolean,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Enum => "enum",
            Self::Null => "null",
            Self::Missing => "missing",
        };
        write!(f, "{}", s)
    }
}

/// One segment of a path into a candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object field name.
    Field(String),
    /// An array element index.
    Index(usize),
}

impl PathSegment {
    /// Create a field segment.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{}", name),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A single schema-conformance failure at one location in the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path of field names and indices leading to the offending value.
    pub path: Vec<PathSegment>,
    /// The type the schema declares at this location.
    pub expected: TypeTag,
    /// The type (or absence) actually found.
    pub actual: TypeTag,
    /// Extra context for constraint violations (offending enum literal,
    /// minimum item count, unknown field).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ValidationError {
    /// A type mismatch at `path`.
    pub fn mismatch(path: Vec<PathSegment>, expected: TypeTag, actual: TypeTag) -> Self {
        Self {
            path,
            expected,
            actual,
            detail: None,
        }
    }

    /// A required field absent from the candidate.
    pub fn missing(path: Vec<PathSegment>, expected: TypeTag) -> Self {
        Self {
            path,
            expected,
            actual: TypeTag::Missing,
            detail: None,
        }
    }

    /// A constraint violation with extra context.
    pub fn constraint(
        path: Vec<PathSegment>,
        expected: TypeTag,
        actual: TypeTag,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            path,
            expected,
            actual,
            detail: Some(detail.into()),
        }
    }

    /// Dotted rendering of the path, e.g. `order.items.[2].price`.
    #[must_use]
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "$".to_string();
        }
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at {}: expected {}, got {}",
            self.path_string(),
            self.expected,
            self.actual
        )?;
        if let Some(ref detail) = self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// One or more conformance failures for a single reply.
///
/// Always non-empty: a reply that produced no errors is validated, not
/// rejected.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// The individual failures, in schema walk order.
    pub errors: Vec<ValidationError>,
}

impl ValidationFailure {
    /// Create a failure from a non-empty error list.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty(), "validation failure with no errors");
        Self { errors }
    }

    /// Rendered paths of every failure, for correction prompts.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.errors.iter().map(ValidationError::path_string).collect()
    }

    /// Number of individual failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the failure list is empty. Never true for a failure
    /// produced by validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reply failed schema validation ({} error{})",
            self.errors.len(),
            if self.errors.len() == 1 { "" } else { "s" }
        )?;
        for error in &self.errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_of_value() {
        assert_eq!(TypeTag::of(&serde_json::json!("hi")), TypeTag::String);
        assert_eq!(TypeTag::of(&serde_json::json!(3.5)), TypeTag::Number);
        assert_eq!(TypeTag::of(&serde_json::json!(true)), TypeTag::Boolean);
        assert_eq!(TypeTag::of(&serde_json::json!([1])), TypeTag::Array);
        assert_eq!(TypeTag::of(&serde_json::json!({})), TypeTag::Object);
        assert_eq!(TypeTag::of(&serde_json::Value::Null), TypeTag::Null);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::missing(
            vec![PathSegment::field("coat_required")],
            TypeTag::Boolean,
        );
        let text = err.to_string();
        assert!(text.contains("coat_required"));
        assert!(text.contains("expected boolean"));
        assert!(text.contains("got missing"));
    }

    #[test]
    fn test_validation_error_path_string() {
        let err = ValidationError::mismatch(
            vec![
                PathSegment::field("items"),
                PathSegment::Index(2),
                PathSegment::field("price"),
            ],
            TypeTag::Number,
            TypeTag::String,
        );
        assert_eq!(err.path_string(), "items.[2].price");
    }

    #[test]
    fn test_validation_error_root_path() {
        let err = ValidationError::mismatch(vec![], TypeTag::Object, TypeTag::String);
        assert_eq!(err.path_string(), "$");
    }

    #[test]
    fn test_validation_failure_paths() {
        let failure = ValidationFailure::new(vec![
            ValidationError::missing(vec![PathSegment::field("weather")], TypeTag::String),
            ValidationError::missing(vec![PathSegment::field("game_time")], TypeTag::String),
        ]);
        assert_eq!(failure.paths(), vec!["weather", "game_time"]);
        assert_eq!(failure.len(), 2);
    }

    #[test]
    fn test_engine_error_retryable_only_for_validation() {
        let validation: EngineError = ValidationFailure::new(vec![ValidationError::missing(
            vec![PathSegment::field("x")],
            TypeTag::String,
        )])
        .into();
        assert!(validation.is_retryable_with_repair());

        assert!(!EngineError::invalid_request("empty prompt").is_retryable_with_repair());
        assert!(!EngineError::malformed("not json").is_retryable_with_repair());
        let transport: EngineError = TransportError::Timeout.into();
        assert!(!transport.is_retryable_with_repair());
    }

    #[test]
    fn test_unsupported_display() {
        let err = EngineError::unsupported("openai", "nesting depth exceeds 5");
        assert!(err.to_string().contains("openai"));
        assert!(err.to_string().contains("nesting depth"));
    }
}
