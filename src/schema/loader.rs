//! Schema loader for named schema files
//!
//! - Schemas are stored as `<schema_dir>/<name>.json`, one schema per file
//! - The file stem is the schema name
//! - Files are only read; writing schemas is the caller's concern

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::parser::SchemaParser;
use super::types::Schema;
use crate::observability::Logger;

/// Reads schema files from disk and keeps them in an in-memory registry.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    parser: SchemaParser,
    /// Loaded schemas indexed by name
    schemas: BTreeMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a loader over `schema_dir` with the default parser.
    pub fn new(schema_dir: &Path) -> Self {
        Self::with_parser(schema_dir, SchemaParser::new())
    }

    pub fn with_parser(schema_dir: &Path, parser: SchemaParser) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            parser,
            schemas: BTreeMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory loads nothing. Files are visited in name order and
    /// the first unreadable or invalid file is returned as the error.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let mut loaded = 0;
        for result in self.load_each()? {
            let (_, outcome) = result;
            outcome?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Loads every `*.json` file, reporting each file's outcome instead of
    /// stopping at the first failure.
    pub fn load_each(&mut self) -> SchemaResult<Vec<(PathBuf, SchemaResult<String>)>> {
        if !self.schema_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.schema_dir)
            .map_err(|e| SchemaError::io(self.schema_dir.display().to_string(), e.to_string()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| SchemaError::io(self.schema_dir.display().to_string(), e.to_string()))?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let outcomes = paths
            .into_iter()
            .map(|path| {
                let outcome = self.load_schema_file(&path);
                (path, outcome)
            })
            .collect();

        Ok(outcomes)
    }

    /// Loads a single schema file and registers it under its file stem.
    pub fn load_schema_file(&mut self, path: &Path) -> SchemaResult<String> {
        let display = path.display().to_string();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| SchemaError::io(&display, "file name is not valid UTF-8"))?;

        match read_schema_file(path, &self.parser) {
            Ok(schema) => {
                Logger::info(
                    "SCHEMA_LOADED",
                    &[("name", name.as_str()), ("path", display.as_str()), ("type", schema.type_name())],
                );
                self.schemas.insert(name.clone(), schema);
                Ok(name)
            }
            Err(e) => {
                Logger::error(
                    "SCHEMA_LOAD_FAILED",
                    &[("code", e.code()), ("error", e.to_string().as_str()), ("path", display.as_str())],
                );
                Err(e)
            }
        }
    }

    /// Loads only `<schema_dir>/<name>.json`, leaving other files unread.
    ///
    /// A missing file is `UnknownSchema`.
    pub fn load_named(&mut self, name: &str) -> SchemaResult<&Schema> {
        let path = self.schema_dir.join(format!("{}.json", name));
        if !path.is_file() {
            return Err(SchemaError::UnknownSchema(name.to_string()));
        }

        let loaded = self.load_schema_file(&path)?;
        self.require(&loaded)
    }

    /// Registers a schema directly, replacing any schema of the same name.
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Gets a schema by name, failing with `UnknownSchema`.
    pub fn require(&self, name: &str) -> SchemaResult<&Schema> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }

    /// Returns registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

/// Reads and parses one schema file without registering it.
pub fn read_schema_file(path: &Path, parser: &SchemaParser) -> SchemaResult<Schema> {
    let display = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| SchemaError::io(&display, e.to_string()))?;

    let raw: Value = serde_json::from_str(&content)
        .map_err(|e| SchemaError::malformed("$", format!("invalid JSON in '{}': {}", display, e)))?;

    parser.parse(&raw)
}
