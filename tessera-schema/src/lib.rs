//! # tessera-schema
//!
//! Declarative output schemas and validation for the tessera structured
//! output engine.
//!
//! A [`Schema`] is an immutable tree of tagged nodes describing the
//! shape a model reply must take, independent of any provider's wire
//! format. The same tree drives both directions of a request:
//!
//! - **Rendering**: `to_json_schema()` for providers with native schema
//!   or tool-call support, `to_prompt_directive()` for providers steered
//!   through the prompt
//! - **Validation**: `validate()` walks the reply candidate against the
//!   tree and returns either a conformant [`ValidatedOutput`] or every
//!   failure with its field path
//!
//! ## Example
//!
//! ```rust
//! use tessera_schema::{BooleanSchema, ObjectSchema, Schema, StringSchema};
//!
//! let schema: Schema = ObjectSchema::new("output", "the output object")
//!     .with_property(StringSchema::new("weather", "The weather forecast"), true)
//!     .with_property(BooleanSchema::new("coat_required", "whether a coat is required"), true)
//!     .into();
//!
//! let candidate = serde_json::json!({"weather": "75º", "coat_required": false});
//! let output = schema.validate(&candidate).unwrap();
//! assert_eq!(output.get("weather"), Some(&serde_json::json!("75º")));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod node;
pub mod render;
pub mod validate;

pub use node::{
    ArraySchema, BooleanSchema, EnumSchema, NumberSchema, ObjectSchema, Schema, StringSchema,
};
pub use validate::{UnknownKeys, ValidationOptions};

// Re-exported so schema callers get the validation result types without
// importing tessera-core directly.
pub use tessera_core::{ValidatedOutput, ValidationError, ValidationFailure};
