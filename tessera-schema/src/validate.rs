//! Candidate validation against a schema tree.
//!
//! A depth-first walk pairs the schema with the candidate value and
//! collects every conformance failure, so callers can pinpoint each
//! offending field rather than receiving one flat message. The walk is a
//! pure function of its inputs; re-running it always yields the same
//! result.

use serde_json::{Map, Value as JsonValue};

use tessera_core::{PathSegment, TypeTag, ValidatedOutput, ValidationError, ValidationFailure};

use crate::node::Schema;

/// Policy for object keys present in a candidate but absent from the
/// schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Strip the key from the output and log it. Tolerates provider
    /// looseness; the default.
    #[default]
    Strip,
    /// Treat the key as a validation failure.
    Reject,
}

/// Options governing the validation walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// What to do with undeclared object keys.
    pub unknown_keys: UnknownKeys,
}

impl ValidationOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown-key policy.
    #[must_use]
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }
}

impl Schema {
    /// Validate a candidate value with default options.
    pub fn validate(&self, candidate: &JsonValue) -> Result<ValidatedOutput, ValidationFailure> {
        self.validate_with(candidate, &ValidationOptions::default())
    }

    /// Validate a candidate value against this schema.
    ///
    /// Returns the rebuilt, conformant value (unknown keys stripped
    /// under the permissive policy), or every failure found, each with a
    /// field path and expected/actual type tags. Primitive types are
    /// matched strictly: a numeric string does not satisfy a number
    /// schema, surfacing provider non-compliance instead of masking it.
    pub fn validate_with(
        &self,
        candidate: &JsonValue,
        options: &ValidationOptions,
    ) -> Result<ValidatedOutput, ValidationFailure> {
        let mut errors = Vec::new();
        let mut path = Vec::new();
        let rebuilt = walk(self, candidate, &mut path, options, &mut errors);
        if errors.is_empty() {
            Ok(ValidatedOutput::new(rebuilt))
        } else {
            Err(ValidationFailure::new(errors))
        }
    }
}

fn walk(
    schema: &Schema,
    candidate: &JsonValue,
    path: &mut Vec<PathSegment>,
    options: &ValidationOptions,
    errors: &mut Vec<ValidationError>,
) -> JsonValue {
    match schema {
        Schema::String(_) => expect_primitive(candidate, TypeTag::String, path, errors),
        Schema::Number(_) => expect_primitive(candidate, TypeTag::Number, path, errors),
        Schema::Boolean(_) => expect_primitive(candidate, TypeTag::Boolean, path, errors),
        Schema::Enum(e) => match candidate.as_str() {
            Some(literal) if e.allows(literal) => candidate.clone(),
            Some(literal) => {
                errors.push(ValidationError::constraint(
                    path.clone(),
                    TypeTag::Enum,
                    TypeTag::String,
                    format!(
                        "\"{}\" is not one of [{}]",
                        literal,
                        e.values.join(", ")
                    ),
                ));
                JsonValue::Null
            }
            None => {
                errors.push(ValidationError::mismatch(
                    path.clone(),
                    TypeTag::Enum,
                    TypeTag::of(candidate),
                ));
                JsonValue::Null
            }
        },
        Schema::Array(a) => match candidate.as_array() {
            Some(elements) => {
                if let Some(min) = a.min_items {
                    if elements.len() < min {
                        errors.push(ValidationError::constraint(
                            path.clone(),
                            TypeTag::Array,
                            TypeTag::Array,
                            format!("expected at least {} items, got {}", min, elements.len()),
                        ));
                    }
                }
                let mut rebuilt = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    rebuilt.push(walk(a.items(), element, path, options, errors));
                    path.pop();
                }
                JsonValue::Array(rebuilt)
            }
            None => {
                errors.push(ValidationError::mismatch(
                    path.clone(),
                    TypeTag::Array,
                    TypeTag::of(candidate),
                ));
                JsonValue::Null
            }
        },
        Schema::Object(o) => match candidate.as_object() {
            Some(fields) => {
                let mut rebuilt = Map::new();
                for (name, child) in o.properties() {
                    match fields.get(name) {
                        Some(value) => {
                            path.push(PathSegment::field(name));
                            let validated = walk(child, value, path, options, errors);
                            path.pop();
                            rebuilt.insert(name.clone(), validated);
                        }
                        None if o.is_required(name) => {
                            let mut field_path = path.clone();
                            field_path.push(PathSegment::field(name));
                            errors.push(ValidationError::missing(field_path, child.type_tag()));
                        }
                        None => {}
                    }
                }
                for (name, value) in fields {
                    if o.properties().contains_key(name) {
                        continue;
                    }
                    match options.unknown_keys {
                        UnknownKeys::Strip => {
                            tracing::warn!(field = %name, "stripping unknown field from reply");
                        }
                        UnknownKeys::Reject => {
                            let mut field_path = path.clone();
                            field_path.push(PathSegment::field(name));
                            errors.push(ValidationError::constraint(
                                field_path,
                                TypeTag::Missing,
                                TypeTag::of(value),
                                "field is not declared in the schema",
                            ));
                        }
                    }
                }
                JsonValue::Object(rebuilt)
            }
            None => {
                errors.push(ValidationError::mismatch(
                    path.clone(),
                    TypeTag::Object,
                    TypeTag::of(candidate),
                ));
                JsonValue::Null
            }
        },
    }
}

fn expect_primitive(
    candidate: &JsonValue,
    expected: TypeTag,
    path: &mut Vec<PathSegment>,
    errors: &mut Vec<ValidationError>,
) -> JsonValue {
    let matches = match expected {
        TypeTag::String => candidate.is_string(),
        TypeTag::Number => candidate.is_number(),
        TypeTag::Boolean => candidate.is_boolean(),
        _ => false,
    };
    if matches {
        candidate.clone()
    } else {
        errors.push(ValidationError::mismatch(
            path.clone(),
            expected,
            TypeTag::of(candidate),
        ));
        JsonValue::Null
    }
}
