//! CLI command implementations
//!
//! Each command resolves its configuration, does its work through the
//! library API and returns the `data` payload for the response envelope.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::generator::Generator;
use crate::observability::{Logger, Severity};
use crate::schema::{read_schema_file, Schema, SchemaLoader, SchemaParser, SchemaValidator, DEFAULT_MAX_DEPTH};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./schemock.json";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of named schema files (default ./schemas)
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Maximum schema nesting depth (default 1024)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Seed for generation; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            max_depth: default_max_depth(),
            seed: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolves the config for a command.
    ///
    /// An explicit path must exist. Without one, `./schemock.json` is used if
    /// present and defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.max_depth == 0 {
            return Err(CliError::config_error("max_depth must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Schema parser honouring `max_depth`
    pub fn parser(&self) -> SchemaParser {
        SchemaParser::new().with_max_depth(self.max_depth)
    }
}

/// Run a CLI command, writing its response to stdout.
pub fn run_command(command: Command) -> CliResult<()> {
    let result = match command {
        Command::Validate { schema, data, config } => {
            let config = apply_config(config.as_deref())?;
            validate(&config, &schema, data.as_deref())
        }
        Command::Generate {
            schema,
            count,
            seed,
            config,
        } => {
            let config = apply_config(config.as_deref())?;
            generate(&config, &schema, count, seed)
        }
        Command::CheckSchemas { config } => {
            let config = apply_config(config.as_deref())?;
            check_schemas(&config)
        }
    };

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn apply_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::resolve(path)?;
    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

/// Resolves `--schema`: an existing file path is read directly, anything
/// else is looked up by name in the schema directory.
pub fn resolve_schema(config: &Config, reference: &str) -> CliResult<Schema> {
    let parser = config.parser();
    let as_path = Path::new(reference);

    if as_path.is_file() {
        return Ok(read_schema_file(as_path, &parser)?);
    }

    let mut loader = SchemaLoader::with_parser(&config.schema_dir, parser);
    Ok(loader.load_named(reference)?.clone())
}

/// Validate command: `{"valid": bool}` plus the first failure when invalid.
pub fn validate(config: &Config, schema_ref: &str, data_path: Option<&Path>) -> CliResult<Value> {
    let schema = resolve_schema(config, schema_ref)?;
    let data = read_input(data_path)?;
    Ok(validate_report(schema_ref, &schema, &data))
}

/// Builds the validate payload and logs the outcome.
pub fn validate_report(schema_name: &str, schema: &Schema, data: &Value) -> Value {
    match SchemaValidator::new(schema).check(data) {
        Ok(()) => {
            Logger::info("VALIDATION_PASSED", &[("schema", schema_name)]);
            json!({ "valid": true })
        }
        Err(details) => {
            Logger::warn(
                "VALIDATION_FAILED",
                &[
                    ("actual", details.actual.as_str()),
                    ("expected", details.expected.as_str()),
                    ("path", details.path.as_str()),
                    ("schema", schema_name),
                ],
            );
            json!({
                "valid": false,
                "path": details.path,
                "expected": details.expected,
                "actual": details.actual,
            })
        }
    }
}

/// Generate command: one value, or an array of `count` values.
pub fn generate(config: &Config, schema_ref: &str, count: usize, seed: Option<u64>) -> CliResult<Value> {
    if count == 0 {
        return Err(CliError::invalid_input("count must be > 0"));
    }

    let schema = resolve_schema(config, schema_ref)?;

    let mut generator = match seed.or(config.seed) {
        Some(seed) => Generator::seeded(seed),
        None => Generator::from_entropy(),
    };

    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        match generator.generate(&schema) {
            Ok(value) => values.push(value),
            Err(e) => {
                Logger::error(
                    "GENERATION_FAILED",
                    &[("error", e.to_string().as_str()), ("schema", schema_ref)],
                );
                return Err(e.into());
            }
        }
    }

    let count_str = count.to_string();
    Logger::info(
        "DATA_GENERATED",
        &[("count", count_str.as_str()), ("schema", schema_ref)],
    );

    if count == 1 {
        Ok(values.pop().unwrap_or(Value::Null))
    } else {
        Ok(Value::Array(values))
    }
}

/// Check-schemas command: per-file outcome for every schema file plus the
/// number of files that failed.
pub fn check_schemas(config: &Config) -> CliResult<Value> {
    let mut loader = SchemaLoader::with_parser(&config.schema_dir, config.parser());
    let outcomes = loader.load_each()?;

    let mut failed = 0;
    let report: Vec<Value> = outcomes
        .into_iter()
        .map(|(path, outcome)| match outcome {
            Ok(name) => json!({
                "file": path.display().to_string(),
                "name": name,
                "ok": true,
            }),
            Err(e) => {
                failed += 1;
                json!({
                    "file": path.display().to_string(),
                    "ok": false,
                    "code": e.code(),
                    "error": e.to_string(),
                })
            }
        })
        .collect();

    if failed > 0 {
        let failed_str = failed.to_string();
        Logger::warn("SCHEMA_CHECK_FAILED", &[("failed", failed_str.as_str())]);
    }

    Ok(json!({ "schemas": report, "failed": failed }))
}
