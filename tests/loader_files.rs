//! Schema Loader Tests
//!
//! Named schemas loaded from a directory drive both interpreters.

use std::fs;

use schemock::generator::Generator;
use schemock::schema::{validate, SchemaLoader, SchemaParser};
use serde_json::json;
use tempfile::TempDir;

fn write_schemas(dir: &std::path::Path) {
    fs::write(
        dir.join("user.json"),
        r#"{
            "type": "object",
            "properties": {
                "id": {"type": "id", "format": "number"},
                "name": {"type": "string", "minLength": 3, "maxLength": 5}
            },
            "required": ["id", "name"]
        }"#,
    )
    .unwrap();
    fs::write(
        dir.join("tags.json"),
        r#"{"kind": "array", "items": {"kind": "string"}, "maxItems": 2}"#,
    )
    .unwrap();
}

#[test]
fn test_loaded_schemas_validate_and_generate() {
    let tmp = TempDir::new().unwrap();
    write_schemas(tmp.path());

    let mut loader = SchemaLoader::new(tmp.path());
    assert_eq!(loader.load_all().unwrap(), 2);

    let user = loader.require("user").unwrap();
    assert!(validate(user, &json!({"id": 7, "name": "Amy"})));
    assert!(!validate(user, &json!({"name": "Amy"})));

    let tags = loader.require("tags").unwrap();
    let mut generator = Generator::seeded(5);
    for _ in 0..50 {
        let value = generator.generate(tags).unwrap();
        assert!(value.as_array().unwrap().len() <= 2);
        assert!(validate(tags, &value));
    }
}

#[test]
fn test_bad_file_reported_without_hiding_good_ones() {
    let tmp = TempDir::new().unwrap();
    write_schemas(tmp.path());
    fs::write(tmp.path().join("broken.json"), r#"{"type": "array"}"#).unwrap();

    let mut loader = SchemaLoader::with_parser(tmp.path(), SchemaParser::new());
    let outcomes = loader.load_each().unwrap();

    let failures: Vec<_> = outcomes.iter().filter(|(_, r)| r.is_err()).collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].0.ends_with("broken.json"));
    assert_eq!(loader.schema_count(), 2);
    assert!(loader.load_all().is_err());
}
