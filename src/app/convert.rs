//! Conversions from CLI-facing types to internal types.

use crate::{
    cli::{Dialect, Format},
    output::OutputFormat,
    parser::SqlDialect
};

/// Converts a CLI dialect enum to the internal SQL dialect type.
///
/// # Example
///
/// ```
/// use sql_trace_analyzer::{app::convert_dialect, cli::Dialect, parser::SqlDialect};
///
/// let dialect = convert_dialect(Dialect::Mysql);
/// assert!(matches!(dialect, SqlDialect::MySQL));
/// ```
pub fn convert_dialect(dialect: Dialect) -> SqlDialect {
    match dialect {
        Dialect::Generic => SqlDialect::Generic,
        Dialect::Mysql => SqlDialect::MySQL,
        Dialect::Postgresql => SqlDialect::PostgreSQL,
        Dialect::Sqlite => SqlDialect::SQLite,
        Dialect::Clickhouse => SqlDialect::ClickHouse
    }
}

/// Converts a CLI format enum to the internal output format type.
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}
