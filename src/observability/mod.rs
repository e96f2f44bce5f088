//! Observability for schemock
//!
//! Structured JSON-line logging. Logging is read-only with respect to the
//! interpreters: nothing logged changes a validation result or a generated
//! value.
//!
//! # Usage
//!
//! ```ignore
//! use schemock::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Warn);
//! Logger::info("SCHEMA_LOADED", &[("name", "user")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
