//! Validated structured output.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// A structured value that satisfied its originating schema.
///
/// Produced by schema validation; the wrapped tree is guaranteed to
/// match the schema's shape, required-field set, and enum literals, with
/// unknown keys already stripped (under the permissive policy).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedOutput(JsonValue);

impl ValidatedOutput {
    /// Wrap a value that passed validation.
    ///
    /// Callers normally obtain this from `Schema::validate`; constructing
    /// one directly carries no conformance guarantee.
    #[must_use]
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Borrow the underlying value.
    #[must_use]
    pub fn value(&self) -> &JsonValue {
        &self.0
    }

    /// Consume into the underlying value.
    #[must_use]
    pub fn into_value(self) -> JsonValue {
        self.0
    }

    /// Look up a top-level field, when the output is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Deserialize the output into a typed value.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.0.clone())
    }
}

impl From<ValidatedOutput> for JsonValue {
    fn from(output: ValidatedOutput) -> Self {
        output.0
    }
}
