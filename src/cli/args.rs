//! CLI argument definitions using clap
//!
//! Commands:
//! - schemock validate --schema <file|name> [--data <file>]
//! - schemock generate --schema <file|name> [--count N] [--seed S]
//! - schemock check-schemas

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemock - validate JSON against compact schemas and generate mock data
#[derive(Parser, Debug)]
#[command(name = "schemock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a JSON document against a schema
    Validate {
        /// Schema file path, or the name of a schema in the schema directory
        #[arg(long)]
        schema: String,

        /// Data file (reads stdin when omitted)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Path to configuration file (default ./schemock.json if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate mock data from a schema
    Generate {
        /// Schema file path, or the name of a schema in the schema directory
        #[arg(long)]
        schema: String,

        /// Number of values to generate
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Seed for reproducible output (overrides the config seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Path to configuration file (default ./schemock.json if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load every schema in the schema directory and report failures
    CheckSchemas {
        /// Path to configuration file (default ./schemock.json if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
