use sqlparser::ast::{
    Assignment, AssignmentTarget, Delete, FromTable, GroupByExpr, Insert, OrderByKind, Query,
    Select, SelectItem, SetExpr, Statement, Update, UpdateTableFromKind
};

use super::{
    expr::lower_expr,
    table::{push_table_with_joins, push_tables}
};
use crate::tree::{Alias, Clause, ColumnRef, Node, StatementTree, SubqueryRef, TableRef};

/// Lowering of a sqlparser AST fragment into its own statement tree
pub(super) trait Lower {
    fn lower(&self) -> StatementTree;
}

impl Lower for Query {
    fn lower(&self) -> StatementTree {
        let mut tree = StatementTree::new();
        lower_query_into(self, &mut tree);
        tree
    }
}

impl Lower for SetExpr {
    fn lower(&self) -> StatementTree {
        let mut tree = StatementTree::new();
        lower_set_expr_into(self, &mut tree);
        tree
    }
}

/// Lower a parsed statement into a clause-keyed tree.
///
/// Statements without table or column references (`SHOW`, `SET`, DDL)
/// produce an empty tree.
pub fn lower_statement(stmt: &Statement) -> StatementTree {
    let mut tree = StatementTree::new();
    match stmt {
        Statement::Query(query) => lower_query_into(query, &mut tree),
        Statement::Insert(insert) => lower_insert(insert, &mut tree),
        Statement::Update(update) => lower_update(update, &mut tree),
        Statement::Delete(delete) => lower_delete(delete, &mut tree),
        _ => {}
    }
    tree
}

fn lower_query_into(query: &Query, tree: &mut StatementTree) {
    for cte in query.with.iter().flat_map(|w| &w.cte_tables) {
        tree.push(
            Clause::From,
            Node::Subquery(SubqueryRef {
                sub_tree:   Some(cte.query.lower()),
                alias:      Some(Alias::Named {
                    name: cte.alias.name.value.as_str().into()
                }),
                ref_clause: Vec::new()
            })
        );
    }
    lower_set_expr_into(&query.body, tree);
    if let Some(order_by) = &query.order_by
        && let OrderByKind::Expressions(exprs) = &order_by.kind
    {
        for expr in exprs {
            tree.push(Clause::Order, lower_expr(&expr.expr));
        }
    }
}

fn lower_set_expr_into(set_expr: &SetExpr, tree: &mut StatementTree) {
    match set_expr {
        SetExpr::Select(select) => lower_select(select, tree),
        SetExpr::Query(query) => lower_query_into(query, tree),
        SetExpr::SetOperation {
            left,
            right,
            ..
        } => {
            tree.push(Clause::Union, Node::subquery(left.lower()));
            tree.push(Clause::Union, Node::subquery(right.lower()));
        }
        _ => {}
    }
}

fn lower_select(select: &Select, tree: &mut StatementTree) {
    for item in &select.projection {
        tree.push(Clause::Select, lower_select_item(item));
    }
    for table in &select.from {
        push_table_with_joins(table, Clause::From, tree);
    }
    if let Some(selection) = &select.selection {
        tree.push(Clause::Where, lower_expr(selection));
    }
    if let GroupByExpr::Expressions(exprs, _) = &select.group_by {
        for expr in exprs {
            tree.push(Clause::Group, lower_expr(expr));
        }
    }
    if let Some(having) = &select.having {
        tree.push(Clause::Having, lower_expr(having));
    }
}

fn lower_select_item(item: &SelectItem) -> Node {
    match item {
        SelectItem::UnnamedExpr(expr)
        | SelectItem::ExprWithAlias {
            expr, ..
        } => lower_expr(expr),
        // `*` and `t.*`, possibly followed by EXCLUDE/REPLACE options
        wildcard => {
            let written = wildcard.to_string();
            let head = written.split_whitespace().next().unwrap_or("*");
            Node::Colref(ColumnRef::from_written(head))
        }
    }
}

fn lower_insert(insert: &Insert, tree: &mut StatementTree) {
    tree.push(Clause::Insert, Node::Table(TableRef::new(insert.table.to_string())));
    if !insert.columns.is_empty() {
        let columns = insert
            .columns
            .iter()
            .map(|column| Node::Colref(ColumnRef::from_written(&column.to_string())))
            .collect();
        tree.push(Clause::Insert, Node::ColumnList {
            sub_tree: columns
        });
    }
    for assignment in &insert.assignments {
        tree.push(Clause::Set, lower_assignment(assignment));
    }
    if let Some(source) = &insert.source {
        tree.merge(source.lower());
    }
}

// Joined tables of a multi-table `UPDATE` stay under `UPDATE` with their
// join conditions
fn lower_update(update: &Update, tree: &mut StatementTree) {
    push_table_with_joins(&update.table, Clause::Update, tree);
    if let Some(UpdateTableFromKind::BeforeSet(tables) | UpdateTableFromKind::AfterSet(tables)) =
        &update.from
    {
        push_tables(tables, Clause::From, tree);
    }
    for assignment in &update.assignments {
        tree.push(Clause::Set, lower_assignment(assignment));
    }
    if let Some(selection) = &update.selection {
        tree.push(Clause::Where, lower_expr(selection));
    }
}

fn lower_delete(delete: &Delete, tree: &mut StatementTree) {
    for name in &delete.tables {
        tree.push(Clause::Delete, Node::Table(TableRef::new(name.to_string())));
    }
    let (FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables)) = &delete.from;
    push_tables(tables, Clause::From, tree);
    if let Some(using) = &delete.using {
        push_tables(using, Clause::From, tree);
    }
    if let Some(selection) = &delete.selection {
        tree.push(Clause::Where, lower_expr(selection));
    }
}

fn lower_assignment(assignment: &Assignment) -> Node {
    let mut sub_tree: Vec<Node> = match &assignment.target {
        AssignmentTarget::ColumnName(name) => {
            vec![Node::Colref(ColumnRef::from_written(&name.to_string()))]
        }
        AssignmentTarget::Tuple(names) => names
            .iter()
            .map(|name| Node::Colref(ColumnRef::from_written(&name.to_string())))
            .collect()
    };
    sub_tree.push(lower_expr(&assignment.value));
    Node::expression(assignment.to_string(), sub_tree)
}
