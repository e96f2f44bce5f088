//! Generator Round-Trip Tests
//!
//! Every value generated from a schema must validate against that schema.

use schemock::generator::{Generator, MAX_GENERATED_LENGTH};
use schemock::schema::{validate, validate_value, Schema, SchemaError};
use schemock::{generate, generate_value};
use serde_json::{json, Value};

const ITERATIONS: usize = 200;

fn schema(raw: Value) -> Schema {
    Schema::from_value(&raw).unwrap()
}

fn assert_round_trip(raw: Value, seed: u64) {
    let schema = schema(raw.clone());
    let mut generator = Generator::seeded(seed);
    for _ in 0..ITERATIONS {
        let value = generator.generate(&schema).unwrap();
        assert!(
            validate(&schema, &value),
            "generated {} does not validate against {}",
            value,
            raw
        );
    }
}

#[test]
fn test_scalar_round_trips() {
    assert_round_trip(json!({"type": "string"}), 1);
    assert_round_trip(json!({"type": "string", "minLength": 3, "maxLength": 5}), 2);
    assert_round_trip(json!({"type": "string", "minLength": 0, "maxLength": 0}), 3);
    assert_round_trip(json!({"type": "string", "enum": ["x", "y"]}), 4);
    assert_round_trip(json!({"type": "number"}), 5);
    assert_round_trip(json!({"type": "number", "min": -3, "max": 3}), 6);
    assert_round_trip(json!({"type": "number", "min": 0.1, "max": 0.2}), 7);
    assert_round_trip(json!({"type": "number", "enum": [3, 5, 8]}), 8);
    assert_round_trip(json!({"type": "boolean"}), 9);
    assert_round_trip(json!({"type": "null"}), 10);
    assert_round_trip(json!({"type": "id", "format": "number"}), 11);
    assert_round_trip(json!({"type": "id", "format": "uuid"}), 12);
}

#[test]
fn test_format_round_trips() {
    for (i, format) in ["email", "phoneNumber", "date", "date-time", "uuid"].iter().enumerate() {
        assert_round_trip(json!({"type": "string", "format": format}), 20 + i as u64);
    }
}

#[test]
fn test_array_round_trips() {
    assert_round_trip(json!({"type": "array", "items": {"type": "boolean"}}), 30);
    assert_round_trip(
        json!({"type": "array", "items": {"type": "boolean"}, "minItems": 2, "maxItems": 2}),
        31,
    );
    assert_round_trip(json!({"type": "array", "items": {"type": "number"}, "minItems": 7}), 32);
    assert_round_trip(json!({"type": "array", "items": {"type": "number"}, "maxItems": 1}), 33);
    assert_round_trip(json!({"type": "array", "items": {"type": "null"}, "maxItems": 0}), 34);
}

#[test]
fn test_extreme_number_bounds_round_trip() {
    assert_round_trip(json!({"type": "number", "min": -1e308, "max": 1e308}), 50);
    assert_round_trip(json!({"type": "number", "min": -1.7e308, "max": 1.7e308}), 51);
    assert_round_trip(json!({"type": "number", "min": 1e19, "max": 1e20}), 52);
    assert_round_trip(json!({"type": "number", "min": 1e300}), 53);
    assert_round_trip(json!({"type": "number", "max": -1e300}), 54);
    assert_round_trip(json!({"type": "number", "min": 0, "max": 0}), 55);
}

#[test]
fn test_one_sided_and_wide_array_bounds_round_trip() {
    assert_round_trip(json!({"type": "array", "items": {"type": "boolean"}, "minItems": 0}), 60);
    assert_round_trip(json!({"type": "array", "items": {"type": "boolean"}, "minItems": 5}), 61);
    assert_round_trip(json!({"type": "array", "items": {"type": "boolean"}, "maxItems": 2}), 62);

    let wide = schema(json!({"type": "array", "items": {"type": "null"}, "maxItems": 4_000_000_000u64}));
    let mut generator = Generator::seeded(63);
    for _ in 0..5 {
        let value = generator.generate(&wide).unwrap();
        assert!(value.as_array().unwrap().len() <= MAX_GENERATED_LENGTH);
        assert!(validate(&wide, &value));
    }
}

#[test]
fn test_unbuildable_array_length_is_an_error() {
    let huge = json!({"type": "array", "items": {"type": "null"}, "minItems": 1e300});
    assert_eq!(generate_value(&huge).unwrap_err().code(), "SCHEMA_MALFORMED");

    let over_limit = json!({"type": "array", "items": {"type": "null"}, "minItems": MAX_GENERATED_LENGTH + 1});
    assert_eq!(generate_value(&over_limit).unwrap_err().code(), "SCHEMA_MALFORMED");

    let at_limit = json!({"type": "array", "items": {"type": "null"}, "minItems": MAX_GENERATED_LENGTH});
    let value = generate_value(&at_limit).unwrap();
    assert_eq!(value.as_array().unwrap().len(), MAX_GENERATED_LENGTH);
}

#[test]
fn test_deep_nesting_round_trip() {
    let mut raw = json!({"type": "null"});
    for _ in 0..100 {
        raw = json!({"type": "array", "items": raw, "minItems": 1, "maxItems": 1});
    }

    let value = Generator::seeded(70).generate_value(&raw).unwrap();
    assert!(validate_value(&raw, &value));
    assert!(validate(&schema(raw), &value));
}

#[test]
fn test_nested_round_trip() {
    assert_round_trip(
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "id", "format": "uuid"},
                "email": {"type": "string", "format": "email"},
                "age": {"type": "number", "min": 18, "max": 99},
                "active": {"type": "boolean"},
                "deleted_at": {"type": "null"},
                "roles": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["admin", "editor", "viewer"]},
                    "minItems": 1,
                    "maxItems": 3
                },
                "address": {
                    "type": "object",
                    "properties": {
                        "city": {"type": "string", "minLength": 2, "maxLength": 20},
                        "phone": {"type": "string", "format": "phoneNumber"}
                    },
                    "required": ["city"]
                }
            },
            "required": ["id", "email"]
        }),
        40,
    );
}

#[test]
fn test_generate_null_is_null() {
    for _ in 0..10 {
        assert_eq!(generate(&Schema::Null).unwrap(), Value::Null);
        assert_eq!(generate_value(&json!({"type": "null"})).unwrap(), Value::Null);
    }
}

#[test]
fn test_generate_unknown_type() {
    match generate_value(&json!({"type": "unknownType"})) {
        Err(SchemaError::UnsupportedSchemaType(tag)) => assert_eq!(tag, "unknownType"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_generate_malformed_schema() {
    let err = generate_value(&json!({"type": "array", "minItems": 1})).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_MALFORMED");
}

#[test]
fn test_entropy_generation_round_trips() {
    let schema = schema(json!({
        "type": "object",
        "properties": {"id": {"type": "id", "format": "number"}, "name": {"type": "string"}},
        "required": ["id", "name"]
    }));
    for _ in 0..20 {
        let value = generate(&schema).unwrap();
        assert!(validate(&schema, &value));
    }
}
