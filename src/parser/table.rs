use sqlparser::ast::{Join, JoinConstraint, JoinOperator, TableFactor, TableWithJoins};

use super::{expr::lower_expr, statement::Lower};
use crate::tree::{Alias, Clause, JoinKind, Node, StatementTree, SubqueryRef, TableRef};

pub fn push_tables(tables: &[TableWithJoins], clause: Clause, tree: &mut StatementTree) {
    for table in tables {
        push_table_with_joins(table, clause, tree);
    }
}

/// Push a relation and every joined relation as separate clause items.
///
/// Joined items carry their join kind and `ON` condition.
pub fn push_table_with_joins(table: &TableWithJoins, clause: Clause, tree: &mut StatementTree) {
    push_table_factor(&table.relation, None, Vec::new(), clause, tree);
    for join in &table.joins {
        push_join(join, clause, tree);
    }
}

fn push_join(join: &Join, clause: Clause, tree: &mut StatementTree) {
    let (kind, constraint) = join_kind(&join.join_operator);
    let ref_clause = match constraint {
        Some(JoinConstraint::On(expr)) => vec![lower_expr(expr)],
        _ => Vec::new()
    };
    push_table_factor(&join.relation, Some(kind), ref_clause, clause, tree);
}

fn push_table_factor(
    table_factor: &TableFactor,
    join_type: Option<JoinKind>,
    ref_clause: Vec<Node>,
    clause: Clause,
    tree: &mut StatementTree
) {
    match table_factor {
        TableFactor::Table {
            name,
            alias,
            ..
        } => {
            tree.push(
                clause,
                Node::Table(TableRef {
                    table: name.to_string().into(),
                    alias: alias.as_ref().map(|a| Alias::Named {
                        name: a.name.value.as_str().into()
                    }),
                    join_type,
                    ref_clause
                })
            );
        }
        TableFactor::Derived {
            subquery,
            alias,
            ..
        } => {
            tree.push(
                clause,
                Node::Subquery(SubqueryRef {
                    sub_tree: Some(subquery.lower()),
                    alias: alias.as_ref().map(|a| Alias::Named {
                        name: a.name.value.as_str().into()
                    }),
                    ref_clause
                })
            );
        }
        // `(a JOIN b) ON ...`: the outer condition stays on the first relation
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            push_table_factor(&table_with_joins.relation, join_type, ref_clause, clause, tree);
            for join in &table_with_joins.joins {
                push_join(join, clause, tree);
            }
        }
        _ => {}
    }
}

fn join_kind(operator: &JoinOperator) -> (JoinKind, Option<&JoinConstraint>) {
    let (kind, constraint) = match operator {
        JoinOperator::Join(constraint) => (JoinKind::Join, constraint),
        JoinOperator::Inner(constraint) => (JoinKind::Inner, constraint),
        JoinOperator::Left(constraint) => (JoinKind::Left, constraint),
        JoinOperator::LeftOuter(constraint) => (JoinKind::LeftOuter, constraint),
        JoinOperator::Right(constraint) => (JoinKind::Right, constraint),
        JoinOperator::RightOuter(constraint) => (JoinKind::RightOuter, constraint),
        JoinOperator::FullOuter(constraint) => (JoinKind::FullOuter, constraint),
        JoinOperator::StraightJoin(constraint) => (JoinKind::Straight, constraint),
        // MySQL accepts `CROSS JOIN ... ON`
        JoinOperator::CrossJoin(constraint) => (JoinKind::Cross, constraint),
        JoinOperator::Semi(constraint)
        | JoinOperator::LeftSemi(constraint)
        | JoinOperator::RightSemi(constraint)
        | JoinOperator::Anti(constraint)
        | JoinOperator::LeftAnti(constraint)
        | JoinOperator::RightAnti(constraint)
        | JoinOperator::AsOf {
            constraint, ..
        } => (JoinKind::Join, constraint),
        _ => return (JoinKind::Join, None)
    };
    if matches!(constraint, JoinConstraint::Natural) {
        (JoinKind::Natural, Some(constraint))
    } else {
        (kind, Some(constraint))
    }
}
