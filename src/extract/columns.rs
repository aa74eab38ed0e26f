use compact_str::{CompactString, format_compact};
use indexmap::IndexSet;
use tracing::trace;

use super::{AliasMap, clean_identifier, collect_tables};
use crate::tree::{Clause, ColumnRef, Node, StatementTree, SubqueryRef};

/// Clauses scanned for column references, in order
const EXPRESSION_CLAUSES: [Clause; 6] = [
    Clause::Select,
    Clause::Where,
    Clause::Set,
    Clause::Group,
    Clause::Order,
    Clause::Having
];

/// Context of the column pass over one scope
pub struct ColumnContext<'a> {
    pub aliases:     &'a AliasMap,
    pub columns:     &'a mut IndexSet<CompactString>,
    /// Tables found while walking expression subqueries
    pub sub_tables:  &'a mut IndexSet<CompactString>,
    /// Sole table of an expression subquery, qualifying its bare columns
    pub scope_table: Option<CompactString>
}

/// Column pass: collect resolved column references of a statement.
///
/// The table pass must already have filled `ctx.aliases` for this scope.
pub fn collect_columns(tree: &StatementTree, ctx: &mut ColumnContext<'_>) {
    for clause in EXPRESSION_CLAUSES {
        if let Some(items) = tree.clause(clause) {
            collect_from_expressions(items, ctx);
        }
    }

    if let Some(items) = tree.clause(Clause::Insert) {
        for item in items {
            if let Node::ColumnList {
                sub_tree
            } = item
            {
                collect_from_expressions(sub_tree, ctx);
            }
        }
    }

    for clause in Clause::join_bearing() {
        for item in tree.clause(clause).unwrap_or_default() {
            collect_from_expressions(item.ref_clause(), ctx);
        }
    }

    // Set operands share the statement scope; the table pass already merged
    // their aliases
    for item in tree.clause(Clause::Union).unwrap_or_default() {
        if let Node::Subquery(SubqueryRef {
            sub_tree: Some(sub_tree),
            ..
        }) = item
        {
            collect_columns(sub_tree, ctx);
        }
    }
}

fn collect_from_expressions(items: &[Node], ctx: &mut ColumnContext<'_>) {
    for item in items {
        match item {
            Node::Colref(column) => {
                if let Some(resolved) = resolve_column(column, ctx.aliases) {
                    let resolved = match &ctx.scope_table {
                        Some(table) if !resolved.contains('.') => {
                            format_compact!("{}.{}", table, resolved)
                        }
                        _ => resolved
                    };
                    ctx.columns.insert(resolved);
                }
            }
            Node::Subquery(subquery) => {
                let Some(sub_tree) = &subquery.sub_tree else {
                    trace!("skipping subquery without a tree");
                    continue;
                };
                let mut scoped = ctx.aliases.clone();
                let mut scope_tables = IndexSet::new();
                collect_tables(sub_tree, &mut scope_tables, &mut scoped);
                let scope_table = match scope_tables.len() {
                    1 => scope_tables.first().cloned(),
                    _ => None
                };
                ctx.sub_tables.extend(scope_tables);
                let mut sub_ctx = ColumnContext {
                    aliases:    &scoped,
                    columns:    &mut *ctx.columns,
                    sub_tables: &mut *ctx.sub_tables,
                    scope_table
                };
                collect_columns(sub_tree, &mut sub_ctx);
            }
            other => collect_from_expressions(other.sub_tree(), ctx)
        }
    }
}

/// Resolve a column reference to `column` or `table.column`.
///
/// Qualifiers go through `aliases`; a `schema.table.column` reference drops
/// the schema. Wildcards and malformed references yield `None`.
pub fn resolve_column(column: &ColumnRef, aliases: &AliasMap) -> Option<CompactString> {
    if column.base_expr.as_str() == "*" {
        return None;
    }

    let Some(parts) = &column.parts else {
        let cleaned = clean_identifier(&column.base_expr);
        return is_column_name(&cleaned).then_some(cleaned);
    };

    match parts.as_slice() {
        [name] if is_column_name(name) => Some(name.clone()),
        [table, name] | [_, table, name] if is_column_name(name) => {
            Some(format_compact!("{}.{}", aliases.resolve(table), name))
        }
        [.., last] if last.as_str() == "*" => None,
        _ => {
            trace!(column = %column.base_expr, "skipping malformed column reference");
            None
        }
    }
}

fn is_column_name(name: &str) -> bool {
    !name.is_empty() && name != "*"
}
