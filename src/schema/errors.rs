//! Schema error types
//!
//! Error codes:
//! - SCHEMA_UNSUPPORTED_TYPE: schema tag outside the seven kinds
//! - SCHEMA_MALFORMED: recognized kind with unusable constraints
//! - SCHEMA_IO: schema file could not be read
//! - SCHEMA_UNKNOWN: no schema registered under the requested name
//!
//! Validation failures are not errors. They are reported as
//! [`ValidationDetails`] so callers can log them without matching on faults.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema tag names a kind this crate does not know.
    #[error("Unsupported schema type: {0}")]
    UnsupportedSchemaType(String),

    /// The schema is structurally unusable at `path`.
    #[error("Malformed schema at {path}: {reason}")]
    MalformedSchema { path: String, reason: String },

    /// A schema file could not be read.
    #[error("Failed to read schema '{path}': {reason}")]
    Io { path: String, reason: String },

    /// No schema registered under this name.
    #[error("Schema '{0}' not found")]
    UnknownSchema(String),
}

impl SchemaError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnsupportedSchemaType(_) => "SCHEMA_UNSUPPORTED_TYPE",
            SchemaError::MalformedSchema { .. } => "SCHEMA_MALFORMED",
            SchemaError::Io { .. } => "SCHEMA_IO",
            SchemaError::UnknownSchema(_) => "SCHEMA_UNKNOWN",
        }
    }
}

/// Where and why a value failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Data path (e.g., "$.user.tags[2]")
    pub path: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::new(path, "field to be present", "missing")
    }

    pub fn type_mismatch(path: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(path, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': expected {}, got {}", self.path, self.expected, self.actual)
    }
}
