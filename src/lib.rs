//! schemock - compact schemas for validating and mocking JSON data
//!
//! A schema is one of seven kinds (string, number, boolean, null, array,
//! object, id). The crate interprets a schema two ways:
//!
//! - [`validate`] decides whether a JSON value conforms to it
//! - [`generate`] synthesizes a JSON value that conforms to it
//!
//! ```ignore
//! use schemock::{generate, validate, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "type": "object",
//!     "properties": {"id": {"type": "id", "format": "uuid"}},
//!     "required": ["id"]
//! }))?;
//!
//! let value = generate(&schema)?;
//! assert!(validate(&schema, &value));
//! ```

pub mod cli;
pub mod generator;
pub mod observability;
pub mod schema;

pub use generator::{generate, generate_value, Generator, RandomSource, RngSource};
pub use schema::{validate, validate_value, Schema, SchemaError, SchemaResult};
