//! Table and column extraction over statement trees.
//!
//! Extraction runs in two passes over a [`StatementTree`]:
//!
//! 1. the **table pass** ([`collect_tables`]) walks the table-bearing clauses
//!    and fills the table set and the [`AliasMap`];
//! 2. the **column pass** ([`collect_columns`]) walks the expression clauses
//!    and resolves qualified column references through that map.
//!
//! # Alias scoping
//!
//! The two passes scope subquery aliases differently, and both behaviours
//! are kept on purpose:
//!
//! - the table pass runs a subquery with fresh collections and merges its
//!   tables *and aliases* into the caller, so an alias declared inside a
//!   subquery is visible to the outer statement and to sibling subqueries;
//! - the column pass hands a subquery a *copy* of the caller's alias map, so
//!   aliases declared inside never flow back out.
//!
//! ```
//! use sql_trace_analyzer::{analyzer::Analyzer, extract::Extraction};
//!
//! let analyzer: Analyzer = Analyzer::default();
//! let result = analyzer.analyze("SELECT u.name FROM users u");
//! assert_eq!(result, Extraction::new(["users"], ["users.name"]));
//! ```

mod alias;
mod columns;
mod tables;

use compact_str::CompactString;
use indexmap::IndexSet;
use serde::Serialize;

pub use self::{
    alias::AliasMap,
    columns::{ColumnContext, collect_columns, resolve_column},
    tables::collect_tables
};
use crate::tree::StatementTree;

/// Tables and columns touched by a statement, sorted and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub tables:  Vec<CompactString>,
    pub columns: Vec<CompactString>
}

impl Extraction {
    pub fn new<T, C>(tables: T, columns: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<CompactString>,
        C: IntoIterator,
        C::Item: Into<CompactString>
    {
        Self::from_sets(
            tables.into_iter().map(Into::into).collect(),
            columns.into_iter().map(Into::into).collect()
        )
    }

    /// Build a result from collected sets, sorting both
    pub fn from_sets(tables: IndexSet<CompactString>, columns: IndexSet<CompactString>) -> Self {
        let mut tables: Vec<_> = tables.into_iter().collect();
        let mut columns: Vec<_> = columns.into_iter().collect();
        tables.sort_unstable();
        columns.sort_unstable();
        Self {
            tables,
            columns
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.columns.is_empty()
    }
}

/// Run both passes over `tree`, accumulating into the given sets.
///
/// Tables found by the column pass inside expression subqueries
/// (`WHERE id IN (SELECT ...)`) are added to `tables` as well. Inside such a
/// subquery, bare columns are qualified when the subquery reads exactly one
/// table.
pub fn extract_into(
    tree: &StatementTree,
    tables: &mut IndexSet<CompactString>,
    columns: &mut IndexSet<CompactString>
) {
    let mut aliases = AliasMap::new();
    collect_tables(tree, tables, &mut aliases);

    let mut ctx = ColumnContext {
        aliases:     &aliases,
        columns,
        sub_tables:  tables,
        scope_table: None
    };
    collect_columns(tree, &mut ctx);
}

/// Extract the tables and columns of a single statement tree
pub fn extract(tree: &StatementTree) -> Extraction {
    let mut tables = IndexSet::new();
    let mut columns = IndexSet::new();
    extract_into(tree, &mut tables, &mut columns);
    Extraction::from_sets(tables, columns)
}

/// Strip identifier quoting (backticks, double quotes, brackets).
///
/// Each dotted segment is trimmed on its own, so `` `db`.`users` `` becomes
/// `db.users`.
pub fn clean_identifier(identifier: &str) -> CompactString {
    let mut cleaned = CompactString::default();
    for (i, segment) in identifier.trim().split('.').enumerate() {
        if i > 0 {
            cleaned.push('.');
        }
        cleaned.push_str(
            segment
                .trim_matches('`')
                .trim_matches('"')
                .trim_matches(|c: char| c == '[' || c == ']')
        );
    }
    cleaned
}
