//! Schema tree nodes.
//!
//! A schema is a tree of tagged nodes describing the shape a model's
//! structured output must take. Nodes are built by composing constructors
//! at call time and are immutable afterwards, so a schema can be shared
//! read-only across concurrent requests.

use indexmap::IndexMap;

use tessera_core::TypeTag;

/// Declarative description of an expected output shape.
///
/// Object children are keyed by their own name, so names are unique
/// within a parent and the `required` set is always a subset of the
/// children. The tree is owned top-down; back-edges cannot exist.
///
/// # Example
///
/// ```rust
/// use tessera_schema::{BooleanSchema, ObjectSchema, Schema, StringSchema};
///
/// let schema: Schema = ObjectSchema::new("output", "the output object")
///     .with_property(StringSchema::new("weather", "The weather forecast"), true)
///     .with_property(StringSchema::new("game_time", "The tigers game time"), true)
///     .with_property(
///         BooleanSchema::new("coat_required", "whether a coat is required"),
///         true,
///     )
///     .into();
///
/// assert_eq!(schema.name(), "output");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A string value.
    String(StringSchema),
    /// A numeric value.
    Number(NumberSchema),
    /// A boolean value.
    Boolean(BooleanSchema),
    /// A sequence of values of one element type.
    Array(ArraySchema),
    /// A mapping with declared, ordered children.
    Object(ObjectSchema),
    /// One of a declared set of string literals.
    Enum(EnumSchema),
}

impl Schema {
    /// The node's identifier, unique within its parent object.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String(s) => &s.name,
            Self::Number(s) => &s.name,
            Self::Boolean(s) => &s.name,
            Self::Array(s) => &s.name,
            Self::Object(s) => &s.name,
            Self::Enum(s) => &s.name,
        }
    }

    /// Free-text description, used for documentation and as a hint in
    /// provider prompts.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::String(s) => &s.description,
            Self::Number(s) => &s.description,
            Self::Boolean(s) => &s.description,
            Self::Array(s) => &s.description,
            Self::Object(s) => &s.description,
            Self::Enum(s) => &s.description,
        }
    }

    /// The type tag this node expects of a conforming value.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::String(_) => TypeTag::String,
            Self::Number(_) => TypeTag::Number,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Array(_) => TypeTag::Array,
            Self::Object(_) => TypeTag::Object,
            Self::Enum(_) => TypeTag::Enum,
        }
    }

    /// Whether the node is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Greatest node count on any root-to-leaf chain.
    ///
    /// Providers with native schema support commonly cap nesting; their
    /// adapters check this before encoding.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Object(o) => {
                1 + o
                    .properties
                    .values()
                    .map(Schema::depth)
                    .max()
                    .unwrap_or(0)
            }
            Self::Array(a) => 1 + a.items.depth(),
            _ => 1,
        }
    }
}

/// Schema for a string value.
#[derive(Debug, Clone, PartialEq)]
pub struct StringSchema {
    /// Node identifier.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

impl StringSchema {
    /// Create a string schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Schema for a numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberSchema {
    /// Node identifier.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

impl NumberSchema {
    /// Create a number schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Schema for a boolean value.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanSchema {
    /// Node identifier.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

impl BooleanSchema {
    /// Create a boolean schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Schema for an array of homogeneous elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Node identifier.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Element schema.
    pub items: Box<Schema>,
    /// Minimum element count. Empty arrays are valid when unset.
    pub min_items: Option<usize>,
}

impl ArraySchema {
    /// Create an array schema with the given element schema.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        items: impl Into<Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            items: Box::new(items.into()),
            min_items: None,
        }
    }

    /// Require at least `count` elements.
    #[must_use]
    pub fn with_min_items(mut self, count: usize) -> Self {
        self.min_items = Some(count);
        self
    }

    /// The element schema.
    #[must_use]
    pub fn items(&self) -> &Schema {
        &self.items
    }
}

/// Schema for an object with declared children.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Node identifier.
    pub name: String,
    /// Free-text description.
    pub description: String,
    properties: IndexMap<String, Schema>,
    required: Vec<String>,
}

impl ObjectSchema {
    /// Create an empty object schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Register a child under its own name.
    ///
    /// Re-registering a name replaces the previous child and its
    /// required flag, so child names stay unique and `required` stays a
    /// subset of the children.
    #[must_use]
    pub fn with_property(mut self, schema: impl Into<Schema>, required: bool) -> Self {
        let schema = schema.into();
        let name = schema.name().to_string();
        self.properties.insert(name.clone(), schema);
        self.required.retain(|n| n != &name);
        if required {
            self.required.push(name);
        }
        self
    }

    /// The declared children, in registration order.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Schema> {
        &self.properties
    }

    /// Names of children that must be present in a conforming value.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Whether the named child must be present.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }
}

/// Schema for a closed set of string literals.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// Node identifier.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Allowed literals, in declaration order. Compared case-sensitively.
    pub values: Vec<String>,
}

impl EnumSchema {
    /// Create an enum schema from its allowed literals.
    pub fn new<I, S>(name: impl Into<String>, description: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `candidate` is one of the allowed literals.
    #[must_use]
    pub fn allows(&self, candidate: &str) -> bool {
        self.values.iter().any(|v| v == candidate)
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Self::String(s)
    }
}

impl From<NumberSchema> for Schema {
    fn from(s: NumberSchema) -> Self {
        Self::Number(s)
    }
}

impl From<BooleanSchema> for Schema {
    fn from(s: BooleanSchema) -> Self {
        Self::Boolean(s)
    }
}

impl From<ArraySchema> for Schema {
    fn from(s: ArraySchema) -> Self {
        Self::Array(s)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(s: ObjectSchema) -> Self {
        Self::Object(s)
    }
}

impl From<EnumSchema> for Schema {
    fn from(s: EnumSchema) -> Self {
        Self::Enum(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_property_order_preserved() {
        let object = ObjectSchema::new("output", "")
            .with_property(StringSchema::new("weather", ""), true)
            .with_property(StringSchema::new("game_time", ""), true)
            .with_property(BooleanSchema::new("coat_required", ""), true);

        let names: Vec<_> = object.properties().keys().cloned().collect();
        assert_eq!(names, vec!["weather", "game_time", "coat_required"]);
        assert_eq!(object.required(), names.as_slice());
    }

    #[test]
    fn test_reregistering_replaces_child_and_flag() {
        let object = ObjectSchema::new("output", "")
            .with_property(StringSchema::new("status", "first"), true)
            .with_property(NumberSchema::new("status", "second"), false);

        assert_eq!(object.properties().len(), 1);
        assert!(!object.is_required("status"));
        assert!(matches!(
            object.properties().get("status"),
            Some(Schema::Number(_))
        ));
    }

    #[test]
    fn test_depth() {
        let leaf = StringSchema::new("leaf", "");
        assert_eq!(Schema::from(leaf.clone()).depth(), 1);

        let nested: Schema = ObjectSchema::new("a", "")
            .with_property(
                ObjectSchema::new("b", "").with_property(leaf, true),
                true,
            )
            .into();
        assert_eq!(nested.depth(), 3);

        let list: Schema = ArraySchema::new("xs", "", StringSchema::new("x", "")).into();
        assert_eq!(list.depth(), 2);
    }

    #[test]
    fn test_enum_allows_case_sensitive() {
        let status = EnumSchema::new("status", "", ["active", "inactive"]);
        assert!(status.allows("active"));
        assert!(!status.allows("Active"));
        assert!(!status.allows("archived"));
    }
}
