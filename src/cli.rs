use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

/// SQL Trace Analyzer - Report the tables and columns SQL statements touch
#[derive(Parser, Debug)]
#[command(name = "sql-trace-analyzer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract tables and columns from SQL statements
    Analyze {
        /// Path to SQL file (use - for stdin)
        #[arg(short, long)]
        queries: PathBuf,

        /// SQL dialect for parsing
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short = 'f', long, value_enum)]
        output_format: Option<Format>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Substitute `?` placeholders with parameter values
    Bind {
        /// Path to SQL file (use - for stdin)
        #[arg(short, long)]
        queries: PathBuf,

        /// Parameters as a JSON array of strings and nulls
        #[arg(short, long)]
        params: Option<String>,

        /// File holding the JSON parameter array
        #[arg(long, conflicts_with = "params")]
        params_file: Option<PathBuf>
    },

    /// Analyze a JSON Lines query log
    Log {
        /// Path to the log file (use - for stdin)
        file: PathBuf,

        /// Only analyze records with this tag
        #[arg(long)]
        tag: Option<String>,

        /// SQL dialect for parsing
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short = 'f', long, value_enum)]
        output_format: Option<Format>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite,
    Clickhouse
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Json,
    Yaml
}
