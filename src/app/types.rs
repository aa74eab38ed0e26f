//! Parameter and result types of the CLI commands.

use crate::cli::{Dialect, Format};

/// Parameters for the analyze command.
///
/// # Example
///
/// ```
/// use sql_trace_analyzer::{app::AnalyzeParams, cli::Dialect};
///
/// let params = AnalyzeParams {
///     queries_path:  "queries.sql".to_string(),
///     dialect:       Some(Dialect::Postgresql),
///     output_format: None,
///     no_color:      true
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    /// Path to queries file or "-" for stdin input.
    pub queries_path:  String,
    /// SQL dialect, falling back to the configured one.
    pub dialect:       Option<Dialect>,
    /// Output format, falling back to the configured one.
    pub output_format: Option<Format>,
    pub no_color:      bool
}

/// Parameters for the bind command
#[derive(Debug, Clone)]
pub struct BindParams {
    pub queries_path: String,
    /// Inline JSON parameter array
    pub params:       Option<String>,
    /// File holding the JSON parameter array
    pub params_file:  Option<String>
}

/// Parameters for the log command
#[derive(Debug, Clone)]
pub struct LogParams {
    /// Path to the JSON Lines log or "-" for stdin input.
    pub log_path:      String,
    pub tag:           Option<String>,
    pub dialect:       Option<Dialect>,
    pub output_format: Option<Format>,
    pub no_color:      bool
}

/// Output from CLI command execution.
///
/// Represents the final output ready for display, including the exit
/// code and all lines to be printed to stdout.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Lines to print to stdout.
    pub stdout:    Vec<String>
}

impl CommandOutput {
    pub fn success(text: String) -> Self {
        Self {
            exit_code: 0,
            stdout:    vec![text]
        }
    }
}
