use compact_str::CompactString;
use indexmap::IndexSet;
use tracing::trace;

use super::{AliasMap, clean_identifier};
use crate::tree::{Clause, Node, StatementTree};

/// Table pass: collect table names and aliases from table-bearing clauses.
///
/// Subqueries in these clauses are walked with fresh collections whose
/// tables and aliases are then merged wholesale into `tables` and
/// `aliases`. `INSERT` targets never register an alias.
pub fn collect_tables(
    tree: &StatementTree,
    tables: &mut IndexSet<CompactString>,
    aliases: &mut AliasMap
) {
    for clause in Clause::table_bearing() {
        let Some(items) = tree.clause(clause) else {
            continue;
        };
        if clause == Clause::Insert {
            collect_insert_targets(items, tables);
        } else {
            collect_from_items(items, tables, aliases);
        }
    }
}

fn collect_from_items(
    items: &[Node],
    tables: &mut IndexSet<CompactString>,
    aliases: &mut AliasMap
) {
    for item in items {
        match item {
            Node::Table(table_ref) => {
                let table = clean_identifier(&table_ref.table);
                if table.is_empty() {
                    trace!("skipping table reference without a name");
                    continue;
                }
                if let Some(alias) = &table_ref.alias {
                    let alias = clean_identifier(alias.name());
                    if !alias.is_empty() {
                        aliases.insert(alias, table.clone());
                    }
                }
                tables.insert(table);
            }
            Node::Subquery(subquery) => {
                let Some(sub_tree) = &subquery.sub_tree else {
                    trace!("skipping subquery without a tree");
                    continue;
                };
                let mut sub_tables = IndexSet::new();
                let mut sub_aliases = AliasMap::new();
                collect_tables(sub_tree, &mut sub_tables, &mut sub_aliases);
                tables.extend(sub_tables);
                aliases.merge(sub_aliases);
            }
            _ => {}
        }
    }
}

fn collect_insert_targets(items: &[Node], tables: &mut IndexSet<CompactString>) {
    for item in items {
        if let Node::Table(table_ref) = item {
            let table = clean_identifier(&table_ref.table);
            if !table.is_empty() {
                tables.insert(table);
            }
        }
    }
}
