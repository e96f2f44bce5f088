//! Schema validator
//!
//! Validation semantics:
//! - The data value must match the declared kind exactly (no coercion)
//! - Every present constraint applies; absent constraints impose nothing
//! - Object `required` names must be present; extra keys are ignored
//! - Declared properties are checked only when present in the data
//! - Array elements are each checked against `items`
//!
//! Validation is total. A malformed or unknown schema yields `false`, never
//! an error, and the validator does not mutate the data. Raw schemas are
//! read lazily: a child schema the data never reaches is never parsed.

use serde_json::{Map, Value};

use super::errors::ValidationDetails;
use super::format::{is_uuid, matches_format};
use super::parser::{SchemaParser, ShallowNode};
use super::types::{ArraySchema, IdFormat, IdSchema, NumberSchema, ObjectSchema, Schema, StringSchema};

/// Validator bound to one schema.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Returns whether `data` conforms to the schema.
    pub fn validate(&self, data: &Value) -> bool {
        self.check(data).is_ok()
    }

    /// Checks `data`, reporting the first non-conforming location.
    pub fn check(&self, data: &Value) -> Result<(), ValidationDetails> {
        check_value(self.schema, data, "$")
    }
}

/// Returns whether `data` conforms to `schema`.
pub fn validate(schema: &Schema, data: &Value) -> bool {
    SchemaValidator::new(schema).validate(data)
}

/// Validates against a raw, unparsed schema.
///
/// A schema node that fails to parse (not an object, missing tag, unknown
/// kind, unusable constraints) makes the value invalid once the data
/// reaches it. Child schemas under an empty array or an absent property
/// are never looked at.
pub fn validate_value(raw_schema: &Value, data: &Value) -> bool {
    check_raw(&SchemaParser::new(), raw_schema, "$", data, "$", 0).is_ok()
}

/// Checks `data` against `schema`, reporting the first failure.
pub fn check(schema: &Schema, data: &Value) -> Result<(), ValidationDetails> {
    SchemaValidator::new(schema).check(data)
}

fn check_value(schema: &Schema, value: &Value, path: &str) -> Result<(), ValidationDetails> {
    match schema {
        Schema::Object(obj_schema) => {
            let obj = value
                .as_object()
                .ok_or_else(|| type_error(path, "object", value))?;
            check_object(obj_schema, obj, path)
        }
        Schema::String(str_schema) => {
            let s = value
                .as_str()
                .ok_or_else(|| type_error(path, "string", value))?;
            check_string(str_schema, s, path)
        }
        Schema::Number(num_schema) => {
            let n = value
                .as_f64()
                .ok_or_else(|| type_error(path, "number", value))?;
            check_number(num_schema, n, path)
        }
        Schema::Boolean => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(type_error(path, "boolean", value))
            }
        }
        Schema::Array(arr_schema) => {
            let arr = value
                .as_array()
                .ok_or_else(|| type_error(path, "array", value))?;
            check_array(arr_schema, arr, path)
        }
        Schema::Null => {
            if value.is_null() {
                Ok(())
            } else {
                Err(type_error(path, "null", value))
            }
        }
        Schema::Id(id_schema) => check_id(id_schema, value, path),
    }
}

fn check_raw(
    parser: &SchemaParser,
    raw: &Value,
    schema_path: &str,
    value: &Value,
    path: &str,
    depth: usize,
) -> Result<(), ValidationDetails> {
    let node = parser
        .parse_shallow(raw, schema_path, depth)
        .map_err(|e| ValidationDetails::new(path, "a valid schema", e.to_string()))?;

    match node {
        ShallowNode::Leaf(schema) => check_value(&schema, value, path),
        ShallowNode::Array {
            items,
            min_items,
            max_items,
        } => {
            let arr = value
                .as_array()
                .ok_or_else(|| type_error(path, "array", value))?;
            check_item_count(min_items, max_items, arr.len(), path)?;

            let items_path = format!("{}.items", schema_path);
            for (i, elem) in arr.iter().enumerate() {
                check_raw(parser, items, &items_path, elem, &format!("{}[{}]", path, i), depth + 1)?;
            }
            Ok(())
        }
        ShallowNode::Object { properties, required } => {
            let obj = value
                .as_object()
                .ok_or_else(|| type_error(path, "object", value))?;
            check_required(&required, obj, path)?;

            for (name, sub) in properties.into_iter().flatten() {
                if let Some(field) = obj.get(name) {
                    let sub_schema_path = format!("{}.properties.{}", schema_path, name);
                    check_raw(parser, sub, &sub_schema_path, field, &make_path(path, name), depth + 1)?;
                }
            }
            Ok(())
        }
    }
}

fn check_required(required: &[String], obj: &Map<String, Value>, path: &str) -> Result<(), ValidationDetails> {
    for name in required {
        if !obj.contains_key(name) {
            return Err(ValidationDetails::missing_field(make_path(path, name)));
        }
    }
    Ok(())
}

fn check_object(schema: &ObjectSchema, obj: &Map<String, Value>, path: &str) -> Result<(), ValidationDetails> {
    check_required(&schema.required, obj, path)?;

    for (name, sub_schema) in &schema.properties {
        if let Some(field) = obj.get(name) {
            check_value(sub_schema, field, &make_path(path, name))?;
        }
    }

    Ok(())
}

fn check_string(schema: &StringSchema, s: &str, path: &str) -> Result<(), ValidationDetails> {
    let len = s.chars().count();

    if let Some(min) = schema.min_length {
        if len < min {
            return Err(ValidationDetails::new(
                path,
                format!("length >= {}", min),
                format!("length {}", len),
            ));
        }
    }

    if let Some(max) = schema.max_length {
        if len > max {
            return Err(ValidationDetails::new(
                path,
                format!("length <= {}", max),
                format!("length {}", len),
            ));
        }
    }

    if let Some(allowed) = &schema.enum_values {
        if !allowed.iter().any(|candidate| candidate == s) {
            return Err(ValidationDetails::new(
                path,
                format!("one of {:?}", allowed),
                format!("{:?}", s),
            ));
        }
    }

    if let Some(pattern) = &schema.pattern {
        if !pattern.is_match(s) {
            return Err(ValidationDetails::new(
                path,
                format!("match for /{}/", pattern.as_str()),
                format!("{:?}", s),
            ));
        }
    }

    if let Some(format) = &schema.format {
        if !matches_format(format, s) {
            return Err(ValidationDetails::new(
                path,
                format!("{} format", format.as_str()),
                format!("{:?}", s),
            ));
        }
    }

    Ok(())
}

fn check_number(schema: &NumberSchema, n: f64, path: &str) -> Result<(), ValidationDetails> {
    if let Some(min) = schema.min {
        if n < min {
            return Err(ValidationDetails::new(path, format!(">= {}", min), n.to_string()));
        }
    }

    if let Some(max) = schema.max {
        if n > max {
            return Err(ValidationDetails::new(path, format!("<= {}", max), n.to_string()));
        }
    }

    if let Some(allowed) = &schema.enum_values {
        if !allowed.iter().any(|candidate| *candidate == n) {
            return Err(ValidationDetails::new(
                path,
                format!("one of {:?}", allowed),
                n.to_string(),
            ));
        }
    }

    Ok(())
}

fn check_array(schema: &ArraySchema, arr: &[Value], path: &str) -> Result<(), ValidationDetails> {
    check_item_count(schema.min_items, schema.max_items, arr.len(), path)?;

    for (i, elem) in arr.iter().enumerate() {
        check_value(&schema.items, elem, &format!("{}[{}]", path, i))?;
    }

    Ok(())
}

fn check_item_count(
    min_items: Option<usize>,
    max_items: Option<usize>,
    len: usize,
    path: &str,
) -> Result<(), ValidationDetails> {
    if let Some(min) = min_items {
        if len < min {
            return Err(ValidationDetails::new(
                path,
                format!(">= {} items", min),
                format!("{} items", len),
            ));
        }
    }

    if let Some(max) = max_items {
        if len > max {
            return Err(ValidationDetails::new(
                path,
                format!("<= {} items", max),
                format!("{} items", len),
            ));
        }
    }

    Ok(())
}

fn check_id(schema: &IdSchema, value: &Value, path: &str) -> Result<(), ValidationDetails> {
    match &schema.format {
        Some(IdFormat::Uuid) => match value.as_str() {
            Some(s) if is_uuid(s) => Ok(()),
            Some(s) => Err(ValidationDetails::new(path, "uuid", format!("{:?}", s))),
            None => Err(type_error(path, "uuid string", value)),
        },
        Some(IdFormat::Number) => {
            if value.is_number() {
                Ok(())
            } else {
                Err(type_error(path, "number", value))
            }
        }
        Some(IdFormat::Unknown(name)) => Err(ValidationDetails::new(
            path,
            "id format 'number' or 'uuid'",
            format!("format '{}'", name),
        )),
        None => Err(ValidationDetails::new(
            path,
            "id format 'number' or 'uuid'",
            "no format",
        )),
    }
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a data path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    format!("{}.{}", prefix, field)
}

fn type_error(path: &str, expected: &str, actual: &Value) -> ValidationDetails {
    ValidationDetails::type_mismatch(path, expected, json_type_name(actual))
}
