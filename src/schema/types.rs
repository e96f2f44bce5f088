//! Schema type definitions
//!
//! Supported kinds:
//! - string: UTF-8 string with length, enum, pattern and format constraints
//! - number: JSON number with bounds and enum
//! - boolean
//! - null
//! - array: homogeneous array with element schema
//! - object: named properties plus a required list
//! - id: integer or UUID identifier

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::parser::SchemaParser;

/// A schema node. Children are owned, so a schema is always a finite tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean,
    Null,
    Array(ArraySchema),
    Object(ObjectSchema),
    Id(IdSchema),
}

impl Schema {
    /// Returns the wire tag of this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(_) => "number",
            Schema::Boolean => "boolean",
            Schema::Null => "null",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
            Schema::Id(_) => "id",
        }
    }

    /// Parses a raw JSON schema with the default depth limit.
    pub fn from_value(raw: &Value) -> super::SchemaResult<Self> {
        SchemaParser::new().parse(raw)
    }

    /// Unconstrained string schema
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    /// Unconstrained number schema
    pub fn number() -> Self {
        Schema::Number(NumberSchema::default())
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(ArraySchema::new(items))
    }

    pub fn object(properties: BTreeMap<String, Schema>) -> Self {
        Schema::Object(ObjectSchema {
            properties,
            required: Vec::new(),
        })
    }

    pub fn id(format: IdFormat) -> Self {
        Schema::Id(IdSchema {
            format: Some(format),
        })
    }

    /// Renders the schema back to its stored JSON form.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::from(self.type_name()));

        match self {
            Schema::String(s) => {
                insert_opt(&mut out, "minLength", s.min_length.map(Value::from));
                insert_opt(&mut out, "maxLength", s.max_length.map(Value::from));
                insert_opt(&mut out, "pattern", s.pattern.as_ref().map(|p| Value::from(p.as_str())));
                insert_opt(&mut out, "enum", s.enum_values.as_ref().map(|e| json!(e)));
                insert_opt(&mut out, "format", s.format.as_ref().map(|f| Value::from(f.as_str())));
            }
            Schema::Number(n) => {
                insert_opt(&mut out, "min", n.min.map(number_value));
                insert_opt(&mut out, "max", n.max.map(number_value));
                insert_opt(
                    &mut out,
                    "enum",
                    n.enum_values
                        .as_ref()
                        .map(|e| Value::Array(e.iter().copied().map(number_value).collect())),
                );
            }
            Schema::Boolean | Schema::Null => {}
            Schema::Array(a) => {
                out.insert("items".into(), a.items.to_value());
                insert_opt(&mut out, "minItems", a.min_items.map(Value::from));
                insert_opt(&mut out, "maxItems", a.max_items.map(Value::from));
            }
            Schema::Object(o) => {
                let props = o
                    .properties
                    .iter()
                    .map(|(name, sub)| (name.clone(), sub.to_value()))
                    .collect();
                out.insert("properties".into(), Value::Object(props));
                if !o.required.is_empty() {
                    out.insert("required".into(), json!(o.required));
                }
            }
            Schema::Id(i) => {
                insert_opt(&mut out, "format", i.format.as_ref().map(|f| Value::from(f.as_str())));
            }
        }

        Value::Object(out)
    }
}

fn insert_opt(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(v) = value {
        out.insert(key.into(), v);
    }
}

/// Integral floats render as JSON integers.
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Schema::from_value(&raw).map_err(de::Error::custom)
    }
}

/// Named refinement of the string kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    PhoneNumber,
    Date,
    DateTime,
    Uuid,
    /// Unrecognized name, kept for round-tripping; imposes no check.
    Unknown(String),
}

impl StringFormat {
    pub fn from_name(name: &str) -> Self {
        match name {
            "email" => StringFormat::Email,
            "phoneNumber" => StringFormat::PhoneNumber,
            "date" => StringFormat::Date,
            "date-time" => StringFormat::DateTime,
            "uuid" => StringFormat::Uuid,
            other => StringFormat::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StringFormat::Email => "email",
            StringFormat::PhoneNumber => "phoneNumber",
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
            StringFormat::Uuid => "uuid",
            StringFormat::Unknown(name) => name,
        }
    }
}

/// Identifier representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFormat {
    Number,
    Uuid,
    Unknown(String),
}

impl IdFormat {
    pub fn from_name(name: &str) -> Self {
        match name {
            "number" => IdFormat::Number,
            "uuid" => IdFormat::Uuid,
            other => IdFormat::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IdFormat::Number => "number",
            IdFormat::Uuid => "uuid",
            IdFormat::Unknown(name) => name,
        }
    }
}

/// A compiled `pattern` constraint. Equality compares the source text.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Unanchored search, matching anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub enum_values: Option<Vec<String>>,
    pub format: Option<StringFormat>,
}

impl StringSchema {
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub enum_values: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Element schema (boxed for the recursive type)
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl ArraySchema {
    pub fn new(items: Schema) -> Self {
        Self {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    pub fn with_bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_items = min;
        self.max_items = max;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, Schema>,
    /// Names that must be present; may include names not in `properties`.
    pub required: Vec<String>,
}

impl ObjectSchema {
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdSchema {
    pub format: Option<IdFormat>,
}
