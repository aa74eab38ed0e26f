use compact_str::CompactString;
use sqlparser::ast::{
    AccessExpr, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments, ObjectName,
    Subscript, WindowType
};

use super::statement::Lower;
use crate::tree::{ColumnRef, NameParts, Node};

/// Lower an expression into a tree node.
///
/// Identifiers become column references with unquoted parts, subqueries
/// keep their own tree, and composite expressions keep their operands as a
/// sub-tree. Expressions without column references become constants.
pub fn lower_expr(expr: &Expr) -> Node {
    match expr {
        Expr::Identifier(ident) => {
            let parts: NameParts = [CompactString::from(ident.value.as_str())]
                .into_iter()
                .collect();
            Node::Colref(ColumnRef::new(ident.to_string(), parts))
        }
        Expr::CompoundIdentifier(idents) => {
            let parts = idents
                .iter()
                .map(|ident| CompactString::from(ident.value.as_str()))
                .collect();
            Node::Colref(ColumnRef::new(expr.to_string(), parts))
        }
        Expr::Subquery(query) => Node::subquery(query.lower()),
        Expr::Exists {
            subquery, ..
        } => Node::subquery(subquery.lower()),
        Expr::InSubquery {
            expr: inner,
            subquery,
            ..
        } => Node::expression(expr.to_string(), vec![
            lower_expr(inner),
            Node::subquery(subquery.lower()),
        ]),
        Expr::BinaryOp {
            left,
            right,
            ..
        }
        | Expr::AnyOp {
            left,
            right,
            ..
        }
        | Expr::AllOp {
            left,
            right,
            ..
        }
        | Expr::IsDistinctFrom(left, right)
        | Expr::IsNotDistinctFrom(left, right)
        | Expr::AtTimeZone {
            timestamp: left,
            time_zone: right
        }
        | Expr::Position {
            expr: left,
            r#in: right
        }
        | Expr::InUnnest {
            expr: left,
            array_expr: right,
            ..
        } => composite(expr, [left.as_ref(), right.as_ref()]),
        Expr::MemberOf(member) => composite(expr, [member.value.as_ref(), member.array.as_ref()]),
        Expr::UnaryOp {
            expr: inner, ..
        }
        | Expr::Cast {
            expr: inner, ..
        }
        | Expr::Extract {
            expr: inner, ..
        }
        | Expr::Ceil {
            expr: inner, ..
        }
        | Expr::Floor {
            expr: inner, ..
        }
        | Expr::Collate {
            expr: inner, ..
        }
        | Expr::IsNormalized {
            expr: inner, ..
        }
        | Expr::Named {
            expr: inner, ..
        }
        | Expr::Prefixed {
            value: inner, ..
        }
        | Expr::JsonAccess {
            value: inner, ..
        }
        | Expr::Nested(inner)
        | Expr::IsNull(inner)
        | Expr::IsNotNull(inner)
        | Expr::IsTrue(inner)
        | Expr::IsNotTrue(inner)
        | Expr::IsFalse(inner)
        | Expr::IsNotFalse(inner)
        | Expr::IsUnknown(inner)
        | Expr::IsNotUnknown(inner)
        | Expr::OuterJoin(inner)
        | Expr::Prior(inner) => composite(expr, [inner.as_ref()]),
        Expr::Interval(interval) => composite(expr, [interval.value.as_ref()]),
        Expr::Convert {
            expr: inner,
            styles,
            ..
        } => composite(expr, std::iter::once(inner.as_ref()).chain(styles)),
        Expr::Substring {
            expr: inner,
            substring_from,
            substring_for,
            ..
        } => composite(
            expr,
            std::iter::once(inner.as_ref())
                .chain(substring_from.as_deref())
                .chain(substring_for.as_deref())
        ),
        Expr::Trim {
            expr: inner,
            trim_what,
            trim_characters,
            ..
        } => composite(
            expr,
            std::iter::once(inner.as_ref())
                .chain(trim_what.as_deref())
                .chain(trim_characters.iter().flatten())
        ),
        Expr::Overlay {
            expr: inner,
            overlay_what,
            overlay_from,
            overlay_for
        } => composite(
            expr,
            [inner.as_ref(), overlay_what.as_ref(), overlay_from.as_ref()]
                .into_iter()
                .chain(overlay_for.as_deref())
        ),
        Expr::CompoundFieldAccess {
            root,
            access_chain
        } => {
            let indexes = access_chain.iter().filter_map(|access| match access {
                AccessExpr::Subscript(Subscript::Index {
                    index
                }) => Some(index),
                _ => None
            });
            composite(expr, std::iter::once(root.as_ref()).chain(indexes))
        }
        Expr::InList {
            expr: inner,
            list,
            ..
        } => composite(expr, std::iter::once(inner.as_ref()).chain(list)),
        Expr::Between {
            expr: inner,
            low,
            high,
            ..
        } => composite(expr, [inner.as_ref(), low.as_ref(), high.as_ref()]),
        Expr::Like {
            expr: inner,
            pattern,
            ..
        }
        | Expr::ILike {
            expr: inner,
            pattern,
            ..
        }
        | Expr::SimilarTo {
            expr: inner,
            pattern,
            ..
        }
        | Expr::RLike {
            expr: inner,
            pattern,
            ..
        } => composite(expr, [inner.as_ref(), pattern.as_ref()]),
        Expr::Case {
            operand,
            conditions,
            else_result,
            ..
        } => {
            let mut sub_tree = Vec::new();
            if let Some(op) = operand {
                sub_tree.push(lower_expr(op));
            }
            for case_when in conditions {
                sub_tree.push(lower_expr(&case_when.condition));
                sub_tree.push(lower_expr(&case_when.result));
            }
            if let Some(else_res) = else_result {
                sub_tree.push(lower_expr(else_res));
            }
            Node::expression(expr.to_string(), sub_tree)
        }
        Expr::Tuple(items)
        | Expr::Struct {
            values: items, ..
        } => composite(expr, items),
        Expr::Array(array) => composite(expr, &array.elem),
        Expr::GroupingSets(sets) | Expr::Cube(sets) | Expr::Rollup(sets) => {
            composite(expr, sets.iter().flatten())
        }
        Expr::MatchAgainst {
            columns, ..
        } => Node::expression(expr.to_string(), columns.iter().map(object_column).collect()),
        Expr::Function(func) => Node::expression(expr.to_string(), lower_function(func)),
        _ => Node::constant(expr.to_string())
    }
}

fn composite<'a>(expr: &Expr, operands: impl IntoIterator<Item = &'a Expr>) -> Node {
    Node::expression(expr.to_string(), operands.into_iter().map(lower_expr).collect())
}

// `MATCH (t.title) AGAINST (...)` names its columns as object names
fn object_column(name: &ObjectName) -> Node {
    let parts = name
        .0
        .iter()
        .map(|part| match part.as_ident() {
            Some(ident) => CompactString::from(ident.value.as_str()),
            None => CompactString::from(part.to_string())
        })
        .collect();
    Node::Colref(ColumnRef::new(name.to_string(), parts))
}

fn lower_function(func: &Function) -> Vec<Node> {
    let mut sub_tree = Vec::new();

    match &func.args {
        FunctionArguments::List(arg_list) => {
            for arg in &arg_list.args {
                if let FunctionArg::Unnamed(arg_expr)
                | FunctionArg::Named {
                    arg: arg_expr, ..
                } = arg
                {
                    sub_tree.push(lower_function_arg(arg_expr));
                }
            }
        }
        FunctionArguments::Subquery(query) => sub_tree.push(Node::subquery(query.lower())),
        _ => {}
    }

    if let Some(WindowType::WindowSpec(spec)) = &func.over {
        sub_tree.extend(spec.partition_by.iter().map(lower_expr));
        sub_tree.extend(spec.order_by.iter().map(|order| lower_expr(&order.expr)));
    }

    sub_tree
}

// `COUNT(*)` and `COUNT(t.*)` lower to wildcard references
fn lower_function_arg(arg: &FunctionArgExpr) -> Node {
    match arg {
        FunctionArgExpr::Expr(expr) => lower_expr(expr),
        wildcard => Node::Colref(ColumnRef::from_written(&wildcard.to_string()))
    }
}
