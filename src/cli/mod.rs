//! CLI module for schemock
//!
//! Provides command-line interface for:
//! - validate: check a JSON document against a schema
//! - generate: produce mock data from a schema
//! - check-schemas: load and report every schema in the schema directory

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check_schemas, generate, resolve_schema, run_command, validate, validate_report, Config,
    DEFAULT_CONFIG_PATH,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_response};

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
