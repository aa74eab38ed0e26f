//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-trace-analyzer.toml` in current directory
//! 4. `~/.config/sql-trace-analyzer/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [parser]
//! dialect = "postgresql"       # generic, mysql, postgresql, sqlite, clickhouse
//!
//! [output]
//! format = "json"              # text, json, yaml
//! colored = false
//! short_sql_len = 120
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_TRACE_DIALECT` | Parser dialect |
//! | `SQL_TRACE_FORMAT` | Output format |
//! | `NO_COLOR` | Disable colored output when set |

use std::{env, fs, path::Path};

use clap::ValueEnum;
use serde::Deserialize;

use crate::{
    cli::{Dialect, Format},
    error::{AppResult, config_error}
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig
}

/// Parser configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ParserConfig {
    pub dialect: Option<Dialect>
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format:        Option<Format>,
    pub colored:       bool,
    /// Width of the query column in text log output
    pub short_sql_len: usize
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format:        None,
            colored:       true,
            short_sql_len: 80
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-trace-analyzer.toml)
    /// 3. Config file in home directory
    ///    (~/.config/sql-trace-analyzer/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = Path::new(&home)
                .join(".config")
                .join("sql-trace-analyzer")
                .join("config.toml");
            if let Some(loaded) = Self::from_file(&home_config)? {
                config = loaded;
            }
        }

        // Current directory config replaces the home config
        if let Some(loaded) = Self::from_file(Path::new(".sql-trace-analyzer.toml"))? {
            config = loaded;
        }

        config.apply_env(|name| env::var(name).ok())?;
        Ok(config)
    }

    /// Read a config file, `None` when it does not exist
    pub fn from_file(path: &Path) -> AppResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content).map(Some)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override settings from environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>
    {
        if let Some(dialect) = lookup("SQL_TRACE_DIALECT") {
            self.parser.dialect = Some(parse_value("SQL_TRACE_DIALECT", &dialect)?);
        }

        if let Some(format) = lookup("SQL_TRACE_FORMAT") {
            self.output.format = Some(parse_value("SQL_TRACE_FORMAT", &format)?);
        }

        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            self.output.colored = false;
        }

        Ok(())
    }
}

fn parse_value<T: ValueEnum>(variable: &str, value: &str) -> AppResult<T> {
    T::from_str(value.trim(), true)
        .map_err(|e| config_error(format!("Invalid value for {}: {}", variable, e)))
}
