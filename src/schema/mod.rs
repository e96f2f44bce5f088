//! Schema model and validation
//!
//! A schema is a tree of seven kinds (string, number, boolean, null, array,
//! object, id). Schemas are parsed once from their stored JSON form and then
//! shared read-only by the validator and the generator.
//!
//! # Design Principles
//!
//! - One closed `Schema` enum, matched exhaustively by both interpreters
//! - Validation is total: malformed input is `false`, never a fault
//! - Constraints that do not apply to a kind are ignored

mod errors;
mod format;
mod loader;
mod parser;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, ValidationDetails};
pub use format::{is_date_like, is_email, is_phone_number, is_uuid, matches_format};
pub use loader::{read_schema_file, SchemaLoader};
pub use parser::{SchemaParser, DEFAULT_MAX_DEPTH};
pub use types::{
    ArraySchema, IdFormat, IdSchema, NumberSchema, ObjectSchema, Pattern, Schema, StringFormat,
    StringSchema,
};
pub use validator::{check, validate, validate_value, SchemaValidator};

pub(crate) use types::number_value;
