//! Parser boundary and the `sqlparser`-backed implementation.
//!
//! The extractor never looks at SQL grammar itself. It consumes
//! [`StatementTree`]s produced by a [`StatementParser`]; [`SqlParser`] lowers
//! the AST of the [`sqlparser`] crate into that shape.

mod expr;
mod statement;
mod table;

use sqlparser::{
    dialect::{
        ClickHouseDialect, Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
    },
    parser::Parser
};
pub use statement::lower_statement;

use crate::{
    error::{AppResult, query_parse_error},
    tree::StatementTree
};

/// SQL dialect for parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SqlDialect {
    Generic,
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    ClickHouse
}

impl SqlDialect {
    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::ClickHouse => Box::new(ClickHouseDialect {})
        }
    }
}

/// A statement as understood by a parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    /// Statement text as rendered by the parser
    pub sql:  String,
    pub tree: StatementTree
}

/// Capability of turning SQL text into statement trees.
///
/// Implementations must be stateless between calls: the analyzer may call
/// them from several threads at once.
pub trait StatementParser: Send + Sync {
    /// Parse every statement in `sql`.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not valid SQL for this parser.
    fn parse(&self, sql: &str) -> AppResult<Vec<ParsedStatement>>;
}

/// [`StatementParser`] over the `sqlparser` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParser {
    dialect: SqlDialect
}

impl SqlParser {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}

impl StatementParser for SqlParser {
    fn parse(&self, sql: &str) -> AppResult<Vec<ParsedStatement>> {
        let parser_dialect = self.dialect.into_parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
            .map_err(|e| query_parse_error(e.to_string()))?;
        Ok(statements
            .iter()
            .map(|stmt| ParsedStatement {
                sql:  stmt.to_string(),
                tree: lower_statement(stmt)
            })
            .collect())
    }
}
