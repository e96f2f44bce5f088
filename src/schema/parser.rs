//! Raw JSON to typed [`Schema`]
//!
//! The stored form tags each node with `type`; `kind` is accepted as a
//! synonym. Unknown tags surface as `UnsupportedSchemaType`. Every other
//! structural problem is `MalformedSchema` with the path of the offending
//! node, e.g. `$.properties.tags.items`.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    ArraySchema, IdFormat, IdSchema, NumberSchema, ObjectSchema, Pattern, Schema, StringFormat,
    StringSchema,
};
use super::validator::json_type_name;

/// Default nesting limit for parsed schemas
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Schema parser with a bounded nesting depth.
#[derive(Debug, Clone, Copy)]
pub struct SchemaParser {
    max_depth: usize,
}

impl Default for SchemaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaParser {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum number of nested schema levels.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parses a raw schema.
    ///
    /// # Errors
    ///
    /// - `UnsupportedSchemaType` if any node's tag is not one of the seven kinds
    /// - `MalformedSchema` for non-object nodes, missing tags, missing
    ///   `items`, wrongly typed or inverted constraints, invalid patterns,
    ///   or nesting deeper than the configured limit
    pub fn parse(&self, raw: &Value) -> SchemaResult<Schema> {
        self.parse_node(raw, "$", 0)
    }

    fn parse_node(&self, raw: &Value, path: &str, depth: usize) -> SchemaResult<Schema> {
        match self.parse_shallow(raw, path, depth)? {
            ShallowNode::Leaf(schema) => Ok(schema),
            ShallowNode::Array {
                items,
                min_items,
                max_items,
            } => {
                let items = self.parse_node(items, &format!("{}.items", path), depth + 1)?;
                Ok(Schema::Array(ArraySchema {
                    items: Box::new(items),
                    min_items,
                    max_items,
                }))
            }
            ShallowNode::Object { properties, required } => {
                let mut schema = ObjectSchema {
                    required,
                    ..ObjectSchema::default()
                };
                for (name, sub) in properties.into_iter().flatten() {
                    let sub_path = format!("{}.properties.{}", path, name);
                    let parsed = self.parse_node(sub, &sub_path, depth + 1)?;
                    schema.properties.insert(name.clone(), parsed);
                }
                Ok(Schema::Object(schema))
            }
        }
    }

    /// Parses one node without descending into `items` or `properties`.
    ///
    /// The node's own fields are fully checked; its child schemas are
    /// returned raw. `depth` is the nesting level of `raw`.
    pub(crate) fn parse_shallow<'a>(
        &self,
        raw: &'a Value,
        path: &str,
        depth: usize,
    ) -> SchemaResult<ShallowNode<'a>> {
        if depth >= self.max_depth {
            return Err(SchemaError::malformed(
                path,
                format!("nesting exceeds {} levels", self.max_depth),
            ));
        }

        let obj = raw.as_object().ok_or_else(|| {
            SchemaError::malformed(path, format!("expected an object, got {}", json_type_name(raw)))
        })?;

        let tag = obj
            .get("type")
            .or_else(|| obj.get("kind"))
            .ok_or_else(|| SchemaError::malformed(path, "missing 'type'"))?;
        let tag = tag
            .as_str()
            .ok_or_else(|| SchemaError::malformed(path, "'type' must be a string"))?;

        match tag {
            "string" => parse_string(obj, path).map(|s| ShallowNode::Leaf(Schema::String(s))),
            "number" => parse_number(obj, path).map(|n| ShallowNode::Leaf(Schema::Number(n))),
            "boolean" => Ok(ShallowNode::Leaf(Schema::Boolean)),
            "null" => Ok(ShallowNode::Leaf(Schema::Null)),
            "id" => parse_id(obj, path).map(|id| ShallowNode::Leaf(Schema::Id(id))),
            "array" => parse_array(obj, path),
            "object" => parse_object(obj, path),
            other => Err(SchemaError::UnsupportedSchemaType(other.to_string())),
        }
    }
}

/// One parsed schema node whose children are still raw JSON.
pub(crate) enum ShallowNode<'a> {
    /// A kind with no child schemas
    Leaf(Schema),
    Array {
        items: &'a Value,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: Option<&'a Map<String, Value>>,
        required: Vec<String>,
    },
}

fn parse_array<'a>(obj: &'a Map<String, Value>, path: &str) -> SchemaResult<ShallowNode<'a>> {
    let items = present(obj, "items")
        .ok_or_else(|| SchemaError::malformed(path, "array schema requires 'items'"))?;

    let min_items = length_field(obj, "minItems", path)?;
    let max_items = length_field(obj, "maxItems", path)?;
    check_bounds(path, "minItems", "maxItems", min_items, max_items)?;

    Ok(ShallowNode::Array {
        items,
        min_items,
        max_items,
    })
}

fn parse_object<'a>(obj: &'a Map<String, Value>, path: &str) -> SchemaResult<ShallowNode<'a>> {
    let properties = match present(obj, "properties") {
        Some(raw_props) => Some(raw_props.as_object().ok_or_else(|| {
            SchemaError::malformed(format!("{}.properties", path), "expected an object")
        })?),
        None => None,
    };

    let required = match present(obj, "required") {
        Some(raw_required) => string_list(raw_required, &format!("{}.required", path))?,
        None => Vec::new(),
    };

    Ok(ShallowNode::Object { properties, required })
}

fn parse_string(obj: &Map<String, Value>, path: &str) -> SchemaResult<StringSchema> {
    let min_length = length_field(obj, "minLength", path)?;
    let max_length = length_field(obj, "maxLength", path)?;
    check_bounds(path, "minLength", "maxLength", min_length, max_length)?;

    let pattern = match present(obj, "pattern") {
        Some(raw) => {
            let field_path = format!("{}.pattern", path);
            let source = raw
                .as_str()
                .ok_or_else(|| SchemaError::malformed(&field_path, "expected a string"))?;
            let compiled = Pattern::new(source)
                .map_err(|e| SchemaError::malformed(&field_path, format!("invalid regex: {}", e)))?;
            Some(compiled)
        }
        None => None,
    };

    let enum_values = match present(obj, "enum") {
        Some(raw) => Some(string_list(raw, &format!("{}.enum", path))?),
        None => None,
    };

    let format = string_field(obj, "format", path)?.map(StringFormat::from_name);

    Ok(StringSchema {
        min_length,
        max_length,
        pattern,
        enum_values,
        format,
    })
}

fn parse_number(obj: &Map<String, Value>, path: &str) -> SchemaResult<NumberSchema> {
    let min = number_field(obj, "min", path)?;
    let max = number_field(obj, "max", path)?;
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(SchemaError::malformed(
                path,
                format!("min ({}) exceeds max ({})", lo, hi),
            ));
        }
    }

    let enum_values = match present(obj, "enum") {
        Some(raw) => {
            let field_path = format!("{}.enum", path);
            let list = raw
                .as_array()
                .ok_or_else(|| SchemaError::malformed(&field_path, "expected an array"))?;
            let numbers = list
                .iter()
                .map(|v| {
                    v.as_f64()
                        .ok_or_else(|| SchemaError::malformed(&field_path, "expected numbers only"))
                })
                .collect::<SchemaResult<Vec<f64>>>()?;
            Some(numbers)
        }
        None => None,
    };

    Ok(NumberSchema { min, max, enum_values })
}

fn parse_id(obj: &Map<String, Value>, path: &str) -> SchemaResult<IdSchema> {
    let format = string_field(obj, "format", path)?.map(IdFormat::from_name);
    Ok(IdSchema { format })
}

/// Field lookup treating explicit `null` as absent.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn length_field(obj: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<usize>> {
    let Some(raw) = present(obj, key) else {
        return Ok(None);
    };

    let as_len = raw.as_u64().or_else(|| {
        raw.as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    });

    match as_len {
        Some(n) if n <= isize::MAX as u64 => Ok(Some(n as usize)),
        Some(n) => Err(SchemaError::malformed(
            format!("{}.{}", path, key),
            format!("length {} is too large", n),
        )),
        None => Err(SchemaError::malformed(
            format!("{}.{}", path, key),
            "expected a non-negative integer",
        )),
    }
}

fn number_field(obj: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<f64>> {
    match present(obj, key) {
        Some(raw) => raw
            .as_f64()
            .map(Some)
            .ok_or_else(|| SchemaError::malformed(format!("{}.{}", path, key), "expected a number")),
        None => Ok(None),
    }
}

fn string_field<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<&'a str>> {
    match present(obj, key) {
        Some(raw) => raw
            .as_str()
            .map(Some)
            .ok_or_else(|| SchemaError::malformed(format!("{}.{}", path, key), "expected a string")),
        None => Ok(None),
    }
}

fn string_list(raw: &Value, path: &str) -> SchemaResult<Vec<String>> {
    let list = raw
        .as_array()
        .ok_or_else(|| SchemaError::malformed(path, "expected an array of strings"))?;
    list.iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::malformed(path, "expected an array of strings"))
        })
        .collect()
}

fn check_bounds(
    path: &str,
    min_key: &str,
    max_key: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> SchemaResult<()> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(SchemaError::malformed(
            path,
            format!("{} ({}) exceeds {} ({})", min_key, lo, max_key, hi),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> SchemaResult<Schema> {
        SchemaParser::new().parse(&raw)
    }

    #[test]
    fn test_parse_all_kinds() {
        for tag in ["string", "number", "boolean", "null", "id"] {
            let schema = parse(json!({ "type": tag })).unwrap();
            assert_eq!(schema.type_name(), tag);
        }
        let schema = parse(json!({"type": "array", "items": {"type": "null"}})).unwrap();
        assert_eq!(schema.type_name(), "array");
        let schema = parse(json!({"type": "object"})).unwrap();
        assert_eq!(schema.type_name(), "object");
    }

    #[test]
    fn test_kind_is_synonym_for_type() {
        let a = parse(json!({"kind": "string", "minLength": 2})).unwrap();
        let b = parse(json!({"type": "string", "minLength": 2})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let err = parse(json!({"type": "unknownType"})).unwrap_err();
        assert_eq!(err, SchemaError::UnsupportedSchemaType("unknownType".into()));
    }

    #[test]
    fn test_nested_unknown_kind_is_unsupported() {
        let err = parse(json!({
            "type": "object",
            "properties": {"x": {"type": "tuple"}}
        }))
        .unwrap_err();
        assert_eq!(err, SchemaError::UnsupportedSchemaType("tuple".into()));
    }

    #[test]
    fn test_non_object_schema_is_malformed() {
        assert_eq!(parse(json!("string")).unwrap_err().code(), "SCHEMA_MALFORMED");
        assert_eq!(parse(json!(null)).unwrap_err().code(), "SCHEMA_MALFORMED");
        assert_eq!(parse(json!({"minLength": 3})).unwrap_err().code(), "SCHEMA_MALFORMED");
        assert_eq!(parse(json!({"type": 7})).unwrap_err().code(), "SCHEMA_MALFORMED");
    }

    #[test]
    fn test_array_without_items_is_malformed() {
        let err = parse(json!({"type": "array", "minItems": 1})).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSchema { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_error_path_points_at_node() {
        let err = parse(json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "string", "minLength": -1}}
            }
        }))
        .unwrap_err();
        match err {
            SchemaError::MalformedSchema { path, .. } => {
                assert_eq!(path, "$.properties.tags.items.minLength");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_inverted_bounds_are_malformed() {
        assert!(parse(json!({"type": "string", "minLength": 5, "maxLength": 2})).is_err());
        assert!(parse(json!({"type": "number", "min": 10, "max": 1})).is_err());
        assert!(parse(json!({
            "type": "array", "items": {"type": "boolean"}, "minItems": 3, "maxItems": 1
        }))
        .is_err());
        assert!(parse(json!({"type": "string", "minLength": 2, "maxLength": 2})).is_ok());
    }

    #[test]
    fn test_invalid_pattern_is_malformed() {
        let err = parse(json!({"type": "string", "pattern": "(unclosed"})).unwrap_err();
        assert!(err.to_string().contains("invalid regex"));
    }

    #[test]
    fn test_constraints_on_other_kinds_are_ignored() {
        let schema = parse(json!({"type": "boolean", "min": "not even a number"})).unwrap();
        assert_eq!(schema, Schema::Boolean);
        let schema = parse(json!({"type": "string", "min": 4, "items": 3})).unwrap();
        assert_eq!(schema, Schema::string());
    }

    #[test]
    fn test_null_constraints_are_absent() {
        let schema = parse(json!({"type": "string", "minLength": null, "format": null})).unwrap();
        assert_eq!(schema, Schema::string());
    }

    #[test]
    fn test_integral_float_lengths_accepted() {
        let schema = parse(json!({"type": "string", "maxLength": 4.0})).unwrap();
        match schema {
            Schema::String(s) => assert_eq!(s.max_length, Some(4)),
            other => panic!("unexpected schema: {:?}", other),
        }
    }

    #[test]
    fn test_oversized_lengths_are_malformed() {
        let err = parse(json!({"type": "array", "items": {"type": "null"}, "minItems": 1e300})).unwrap_err();
        match err {
            SchemaError::MalformedSchema { path, reason } => {
                assert_eq!(path, "$.minItems");
                assert!(reason.contains("too large"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(parse(json!({"type": "string", "maxLength": u64::MAX})).is_err());
    }

    #[test]
    fn test_object_fields() {
        let schema = parse(json!({
            "type": "object",
            "properties": {
                "id": {"type": "id", "format": "uuid"},
                "name": {"type": "string"}
            },
            "required": ["id", "extra"]
        }))
        .unwrap();
        match schema {
            Schema::Object(o) => {
                assert_eq!(o.properties.len(), 2);
                assert_eq!(o.required, vec!["id".to_string(), "extra".to_string()]);
                assert_eq!(o.properties["id"], Schema::id(IdFormat::Uuid));
            }
            other => panic!("unexpected schema: {:?}", other),
        }
    }

    #[test]
    fn test_enum_types_enforced() {
        assert!(parse(json!({"type": "string", "enum": ["a", "b"]})).is_ok());
        assert!(parse(json!({"type": "string", "enum": ["a", 1]})).is_err());
        assert!(parse(json!({"type": "number", "enum": [1, 2.5]})).is_ok());
        assert!(parse(json!({"type": "number", "enum": ["1"]})).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let mut raw = json!({"type": "null"});
        for _ in 0..10 {
            raw = json!({"type": "array", "items": raw});
        }

        assert!(SchemaParser::new().with_max_depth(11).parse(&raw).is_ok());
        let err = SchemaParser::new().with_max_depth(10).parse(&raw).unwrap_err();
        assert!(err.to_string().contains("nesting exceeds 10 levels"));
    }

    #[test]
    fn test_default_depth_allows_deep_schemas() {
        let mut raw = json!({"type": "null"});
        for _ in 0..100 {
            raw = json!({"type": "array", "items": raw});
        }
        assert!(SchemaParser::new().parse(&raw).is_ok());
    }
}
