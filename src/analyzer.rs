//! Statement analysis facade.
//!
//! [`Analyzer`] ties a [`StatementParser`] to the extractor. Parse failures
//! never surface to the caller: a statement the parser rejects analyzes to an
//! empty [`Extraction`], so one bad statement cannot stop a batch.

use std::fmt;

use compact_str::CompactString;
use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
    extract::{Extraction, extract, extract_into},
    parser::{SqlDialect, SqlParser, StatementParser},
    scan::split_statements,
    tree::StatementTree
};

/// Type of SQL statement, by leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Other
}

impl QueryType {
    /// Classify `sql` by its first keyword, ignoring case and leading
    /// whitespace
    pub fn detect(sql: &str) -> Self {
        let keyword: String = sql
            .trim_start()
            .chars()
            .take_while(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match keyword.as_str() {
            "SELECT" => Self::Select,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            _ => Self::Other
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Other => write!(f, "OTHER")
        }
    }
}

/// Analysis of one statement of a script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementReport {
    pub sql:        String,
    pub query_type: QueryType,
    /// Whether the parser accepted the statement
    pub parsed:     bool,
    pub tables:     Vec<CompactString>,
    pub columns:    Vec<CompactString>
}

/// Table and column analysis over a pluggable parser
#[derive(Debug, Clone, Default)]
pub struct Analyzer<P = SqlParser> {
    parser: P
}

impl Analyzer<SqlParser> {
    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self::new(SqlParser::new(dialect))
    }
}

impl<P: StatementParser> Analyzer<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Analyze every statement in `sql` and merge the results.
    ///
    /// Returns an empty result when the parser rejects the text.
    pub fn analyze(&self, sql: &str) -> Extraction {
        self.try_analyze(sql).unwrap_or_default()
    }

    /// Analyze a tree built by any front end
    pub fn analyze_tree(&self, tree: &StatementTree) -> Extraction {
        extract(tree)
    }

    /// Analyze a script statement by statement.
    ///
    /// Statements are split on `;` outside literals and comments, so a
    /// statement the parser rejects only empties its own report.
    pub fn analyze_script(&self, sql: &str) -> Vec<StatementReport> {
        split_statements(sql)
            .into_par_iter()
            .map(|statement| self.report(statement))
            .collect()
    }

    /// Analyze independent statements in parallel
    pub fn analyze_batch<S>(&self, statements: &[S]) -> Vec<Extraction>
    where
        S: AsRef<str> + Sync
    {
        statements
            .par_iter()
            .map(|statement| self.analyze(statement.as_ref()))
            .collect()
    }

    pub fn report(&self, sql: &str) -> StatementReport {
        let analysis = self.try_analyze(sql);
        let parsed = analysis.is_some();
        let Extraction {
            tables,
            columns
        } = analysis.unwrap_or_default();
        StatementReport {
            sql: sql.to_string(),
            query_type: QueryType::detect(sql),
            parsed,
            tables,
            columns
        }
    }

    fn try_analyze(&self, sql: &str) -> Option<Extraction> {
        let statements = match self.parser.parse(sql) {
            Ok(statements) => statements,
            Err(e) => {
                debug!(error = %e, "statement could not be parsed, skipping analysis");
                return None;
            }
        };

        let mut tables = IndexSet::new();
        let mut columns = IndexSet::new();
        for statement in &statements {
            extract_into(&statement.tree, &mut tables, &mut columns);
        }
        Some(Extraction::from_sets(tables, columns))
    }
}
