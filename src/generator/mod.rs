//! Synthetic data generation from schemas
//!
//! The generator walks a schema the same way the validator does and builds
//! a fresh JSON value for every node. Values are built to pass validation
//! against the same schema:
//!
//! - enums pick a member
//! - formatted strings ignore length bounds and follow the format
//! - array lengths stay inside explicit `minItems`/`maxItems`
//! - every declared object property is populated, required or not
//!
//! Only `pattern` is best effort: random candidates are tried a bounded
//! number of times.

mod random;

pub use random::{RandomSource, RngSource};

use chrono::SecondsFormat;
use rand::rngs::StdRng;
use serde_json::{Map, Value};

use crate::schema::{
    number_value, ArraySchema, IdFormat, IdSchema, NumberSchema, ObjectSchema, Schema, SchemaError, SchemaResult,
    StringFormat, StringSchema,
};

const DEFAULT_MIN_LENGTH: usize = 3;
const DEFAULT_MAX_LENGTH: usize = 10;
const DEFAULT_MIN_NUMBER: f64 = 1.0;
const DEFAULT_MAX_NUMBER: f64 = 100.0;
const DEFAULT_MIN_ITEMS: usize = 3;
const DEFAULT_MAX_ITEMS: usize = 4;
/// Largest string or array length the generator will build
pub const MAX_GENERATED_LENGTH: usize = 10_000;
const MIN_NUMERIC_ID: i64 = 1;
const MAX_NUMERIC_ID: i64 = 100_000;
/// Candidates tried before giving up on a `pattern`
const PATTERN_ATTEMPTS: usize = 100;

/// Schema-driven value generator.
pub struct Generator<S = RngSource<StdRng>> {
    source: S,
}

impl Generator<RngSource<StdRng>> {
    /// Generator with a reproducible sequence of values.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngSource::seeded(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(RngSource::from_entropy())
    }
}

impl<S: RandomSource> Generator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Generates a value conforming to `schema`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSchema` for constraints no value can satisfy
    /// (inverted bounds, an empty `enum`, non-finite number bounds) and for
    /// a `minLength`/`minItems` above [`MAX_GENERATED_LENGTH`].
    pub fn generate(&mut self, schema: &Schema) -> SchemaResult<Value> {
        self.generate_node(schema, "$")
    }

    /// Parses a raw schema, then generates from it.
    ///
    /// # Errors
    ///
    /// `UnsupportedSchemaType` carries the unknown tag. Any other parse or
    /// generation failure is `MalformedSchema`.
    pub fn generate_value(&mut self, raw_schema: &Value) -> SchemaResult<Value> {
        let schema = Schema::from_value(raw_schema)?;
        self.generate(&schema)
    }

    fn generate_node(&mut self, schema: &Schema, path: &str) -> SchemaResult<Value> {
        match schema {
            Schema::String(s) => self.string(s, path),
            Schema::Id(id) => Ok(self.id(id)),
            Schema::Number(n) => self.number(n, path),
            Schema::Boolean => Ok(Value::Bool(self.source.boolean())),
            Schema::Null => Ok(Value::Null),
            Schema::Array(a) => self.array(a, path),
            Schema::Object(o) => self.object(o, path),
        }
    }

    fn string(&mut self, schema: &StringSchema, path: &str) -> SchemaResult<Value> {
        if let Some(values) = &schema.enum_values {
            return self.pick(values, path).map(|s| Value::String(s.clone()));
        }

        if let Some(formatted) = schema.format.as_ref().and_then(|f| self.formatted(f)) {
            return Ok(Value::String(formatted));
        }

        let (lo, hi) = string_length_range(schema, path)?;
        let mut candidate = self.alpha_between(lo, hi);

        if let Some(pattern) = &schema.pattern {
            for _ in 1..PATTERN_ATTEMPTS {
                if pattern.is_match(&candidate) {
                    break;
                }
                candidate = self.alpha_between(lo, hi);
            }
        }

        Ok(Value::String(candidate))
    }

    /// Returns `None` for formats with no generator of their own.
    fn formatted(&mut self, format: &StringFormat) -> Option<String> {
        match format {
            StringFormat::Email => Some(self.source.email()),
            StringFormat::PhoneNumber => Some(self.source.phone_number()),
            StringFormat::Date => Some(self.source.date_time().format("%Y-%m-%d").to_string()),
            StringFormat::DateTime => Some(
                self.source
                    .date_time()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            StringFormat::Uuid => Some(self.source.uuid().to_string()),
            StringFormat::Unknown(_) => None,
        }
    }

    fn alpha_between(&mut self, lo: usize, hi: usize) -> String {
        let len = self.source.int_in_range(lo as i64, hi as i64) as usize;
        self.source.alpha(len)
    }

    fn id(&mut self, schema: &IdSchema) -> Value {
        match schema.format {
            Some(IdFormat::Uuid) => Value::String(self.source.uuid().to_string()),
            _ => Value::from(self.source.int_in_range(MIN_NUMERIC_ID, MAX_NUMERIC_ID)),
        }
    }

    fn number(&mut self, schema: &NumberSchema, path: &str) -> SchemaResult<Value> {
        if let Some(values) = &schema.enum_values {
            return self.pick(values, path).map(|n| number_value(*n));
        }

        let lo = schema
            .min
            .unwrap_or_else(|| schema.max.map_or(DEFAULT_MIN_NUMBER, |max| max.min(DEFAULT_MIN_NUMBER)));
        let hi = schema.max.unwrap_or_else(|| lo.max(DEFAULT_MAX_NUMBER));
        if !lo.is_finite() || !hi.is_finite() {
            return Err(SchemaError::malformed(path, "min and max must be finite"));
        }
        if lo > hi {
            return Err(SchemaError::malformed(
                path,
                format!("min ({}) exceeds max ({})", lo, hi),
            ));
        }

        let (int_lo, int_hi) = (lo.ceil(), hi.floor());
        if int_lo <= int_hi && int_lo >= i64::MIN as f64 && int_hi <= i64::MAX as f64 {
            let n = self.source.int_in_range(int_lo as i64, int_hi as i64);
            Ok(Value::from(n))
        } else {
            Ok(number_value(self.source.float_in_range(lo, hi)))
        }
    }

    fn array(&mut self, schema: &ArraySchema, path: &str) -> SchemaResult<Value> {
        let (lo, hi) = array_length_range(schema, path)?;
        let len = self.source.int_in_range(lo as i64, hi as i64) as usize;

        let items_path = format!("{}.items", path);
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.generate_node(&schema.items, &items_path)?);
        }
        Ok(Value::Array(out))
    }

    fn object(&mut self, schema: &ObjectSchema, path: &str) -> SchemaResult<Value> {
        let mut out = Map::new();
        for (name, sub_schema) in &schema.properties {
            let sub_path = format!("{}.properties.{}", path, name);
            out.insert(name.clone(), self.generate_node(sub_schema, &sub_path)?);
        }
        Ok(Value::Object(out))
    }

    fn pick<'a, T>(&mut self, values: &'a [T], path: &str) -> SchemaResult<&'a T> {
        if values.is_empty() {
            return Err(SchemaError::malformed(path, "enum is empty"));
        }
        Ok(&values[self.source.index(values.len())])
    }
}

/// Generates a value with a fresh entropy-seeded source.
pub fn generate(schema: &Schema) -> SchemaResult<Value> {
    Generator::from_entropy().generate(schema)
}

/// Parses a raw schema and generates a value for it.
pub fn generate_value(raw_schema: &Value) -> SchemaResult<Value> {
    Generator::from_entropy().generate_value(raw_schema)
}

/// Length range for unformatted strings. A lone bound never inverts the
/// default `[3, 10]` range.
fn string_length_range(schema: &StringSchema, path: &str) -> SchemaResult<(usize, usize)> {
    let lo = schema.min_length.unwrap_or_else(|| {
        schema
            .max_length
            .map_or(DEFAULT_MIN_LENGTH, |max| max.min(DEFAULT_MIN_LENGTH))
    });
    let hi = schema
        .max_length
        .unwrap_or_else(|| lo.max(DEFAULT_MAX_LENGTH));
    ordered(path, "minLength", "maxLength", lo, hi)?;
    capped(path, "minLength", lo, hi)
}

/// Length range for arrays: the default `[3, 4]` widened by, then kept
/// inside, the explicit `minItems`/`maxItems`.
fn array_length_range(schema: &ArraySchema, path: &str) -> SchemaResult<(usize, usize)> {
    let lo = schema.min_items.unwrap_or_else(|| {
        schema
            .max_items
            .map_or(DEFAULT_MIN_ITEMS, |max| max.min(DEFAULT_MIN_ITEMS))
    });
    let hi = schema
        .max_items
        .unwrap_or_else(|| lo.max(DEFAULT_MAX_ITEMS));
    ordered(path, "minItems", "maxItems", lo, hi)?;
    capped(path, "minItems", lo, hi)
}

fn ordered(path: &str, min_key: &str, max_key: &str, lo: usize, hi: usize) -> SchemaResult<()> {
    if lo > hi {
        return Err(SchemaError::malformed(
            path,
            format!("{} ({}) exceeds {} ({})", min_key, lo, max_key, hi),
        ));
    }
    Ok(())
}

/// Keeps a length range within [`MAX_GENERATED_LENGTH`]. An upper bound
/// above the cap is lowered to it; a lower bound above it cannot be met.
fn capped(path: &str, min_key: &str, lo: usize, hi: usize) -> SchemaResult<(usize, usize)> {
    if lo > MAX_GENERATED_LENGTH {
        return Err(SchemaError::malformed(
            path,
            format!("{} ({}) exceeds the generation limit of {}", min_key, lo, MAX_GENERATED_LENGTH),
        ));
    }
    Ok((lo, hi.min(MAX_GENERATED_LENGTH)))
}
