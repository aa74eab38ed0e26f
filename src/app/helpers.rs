//! Helper functions shared by the CLI commands.

use std::{
    fs::read_to_string,
    io::{self, Read}
};

use super::convert::{convert_dialect, convert_format};
use crate::{
    bind::Param,
    cli::{Dialect, Format},
    config::Config,
    error::{AppResult, file_read_error, params_error},
    output::{OutputFormat, OutputOptions},
    parser::SqlDialect
};

/// Reads input from a file, or from stdin when the path is "-".
///
/// # Errors
///
/// Returns an error if the file cannot be read or stdin fails.
pub fn read_input(path: &str) -> AppResult<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        read_to_string(path).map_err(|e| file_read_error(path, e))
    }
}

/// Parses a JSON parameter array such as `["42", null]`.
///
/// # Errors
///
/// Returns an error when the text is not an array of strings and nulls.
///
/// # Example
///
/// ```
/// use sql_trace_analyzer::{app::parse_params, bind::Param};
///
/// let params = parse_params(r#"["O'Brien", null]"#).unwrap();
/// assert_eq!(params, [Param::from("O'Brien"), Param::Null]);
/// ```
pub fn parse_params(json: &str) -> AppResult<Vec<Param>> {
    serde_json::from_str(json.trim()).map_err(|e| params_error(e.to_string()))
}

/// Picks the dialect from the command line, then the config, then the default
pub fn resolve_dialect(dialect: Option<Dialect>, config: &Config) -> SqlDialect {
    dialect
        .or(config.parser.dialect)
        .map(convert_dialect)
        .unwrap_or_default()
}

/// Create output options from command-line flags and config
pub fn create_output_options(
    format: Option<Format>,
    no_color: bool,
    config: &Config
) -> OutputOptions {
    OutputOptions {
        format:        format
            .or(config.output.format)
            .map(convert_format)
            .unwrap_or(OutputFormat::Text),
        colored:       !no_color && config.output.colored,
        short_sql_len: config.output.short_sql_len
    }
}
