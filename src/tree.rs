//! Clause-keyed statement tree consumed by the schema extractor.
//!
//! The tree is the contract between a SQL parser and the extractor: every
//! clause of a statement maps to a list of [`Node`]s, and every node is a
//! table reference, a column reference, a subquery, or a generic expression
//! with a sub-tree. Any parser able to produce this shape can feed the
//! extractor (see [`StatementParser`](crate::parser::StatementParser)).
//!
//! Trees serialize to JSON with an `expr_type` tag on every node:
//!
//! ```json
//! {
//!   "FROM": [
//!     { "expr_type": "table", "table": "`users`", "alias": { "name": "u" } }
//!   ],
//!   "SELECT": [
//!     { "expr_type": "colref", "base_expr": "u.name", "parts": ["u", "name"] }
//!   ]
//! }
//! ```

use std::fmt;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use smallvec::SmallVec;
use tracing::trace;

/// Unquoted segments of a dotted identifier (`schema.table.column`)
pub type NameParts = SmallVec<[CompactString; 3]>;

/// Join variants a parser may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum JoinKind {
    Join,
    Inner,
    Left,
    Right,
    Cross,
    LeftOuter,
    RightOuter,
    FullOuter,
    Natural,
    Straight
}

impl JoinKind {
    pub const ALL: [Self; 10] = [
        Self::Join,
        Self::Inner,
        Self::Left,
        Self::Right,
        Self::Cross,
        Self::LeftOuter,
        Self::RightOuter,
        Self::FullOuter,
        Self::Natural,
        Self::Straight
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::Natural => "NATURAL JOIN",
            Self::Straight => "STRAIGHT_JOIN"
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<JoinKind> for String {
    fn from(kind: JoinKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for JoinKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| format!("unknown join kind '{}'", value))
    }
}

/// Clause keys of a statement tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Clause {
    Select,
    From,
    Join(JoinKind),
    Where,
    Set,
    Group,
    Order,
    Having,
    Insert,
    Update,
    Delete,
    /// Operands of `UNION`/`INTERSECT`/`EXCEPT`, one subquery node each
    Union
}

impl Clause {
    /// Clauses that introduce tables and aliases, in processing order
    pub fn table_bearing() -> impl Iterator<Item = Self> {
        [Self::From]
            .into_iter()
            .chain(JoinKind::ALL.into_iter().map(Self::Join))
            .chain([Self::Update, Self::Insert, Self::Delete, Self::Union])
    }

    /// Clauses whose items may carry a join condition, including the
    /// joined targets of a multi-table `UPDATE`
    pub fn join_bearing() -> impl Iterator<Item = Self> {
        [Self::From]
            .into_iter()
            .chain(JoinKind::ALL.into_iter().map(Self::Join))
            .chain([Self::Update])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Join(kind) => kind.as_str(),
            Self::Where => "WHERE",
            Self::Set => "SET",
            Self::Group => "GROUP",
            Self::Order => "ORDER",
            Self::Having => "HAVING",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Union => "UNION"
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Clause> for String {
    fn from(clause: Clause) -> Self {
        clause.as_str().to_string()
    }
}

impl TryFrom<String> for Clause {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let clause = match value.trim().to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "SET" => Self::Set,
            "GROUP" => Self::Group,
            "ORDER" => Self::Order,
            "HAVING" => Self::Having,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "UNION" => Self::Union,
            _ => return JoinKind::try_from(value).map(Self::Join)
        };
        Ok(clause)
    }
}

/// Alias attached to a table or derived table
///
/// Parsers report aliases either as a plain string or as a named sub-node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alias {
    Name(CompactString),
    Named { name: CompactString }
}

impl Alias {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name)
            | Self::Named {
                name
            } => name
        }
    }
}

/// Reference to a table in a table-bearing clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    /// Table name as written, possibly quoted
    pub table:      CompactString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias:      Option<Alias>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_type:  Option<JoinKind>,
    /// Join condition (`ON ...`) of this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ref_clause: Vec<Node>
}

impl TableRef {
    pub fn new(table: impl Into<CompactString>) -> Self {
        Self {
            table:      table.into(),
            alias:      None,
            join_type:  None,
            ref_clause: Vec::new()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<CompactString>) -> Self {
        self.alias = Some(Alias::Named {
            name: alias.into()
        });
        self
    }
}

/// Reference to a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Column expression as written
    pub base_expr: CompactString,
    /// Unquoted dotted segments, when the parser resolved them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts:     Option<NameParts>
}

impl ColumnRef {
    pub fn new(base_expr: impl Into<CompactString>, parts: NameParts) -> Self {
        Self {
            base_expr: base_expr.into(),
            parts:     Some(parts)
        }
    }

    /// Column reference from its written form, splitting on unquoted dots
    pub fn from_written(written: &str) -> Self {
        Self::new(written, split_qualified(written))
    }
}

/// Subquery with its own statement tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryRef {
    #[serde(default)]
    pub sub_tree:   Option<StatementTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias:      Option<Alias>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ref_clause: Vec<Node>
}

/// Node of a statement tree.
///
/// Deserialization never rejects a single node: kinds this crate does not
/// know (`operator`, `function`, `bracket_expression`, ...) become an
/// [`Node::Expression`] when they carry a `sub_tree` and a [`Node::Const`]
/// otherwise, and a table item without a name becomes a `Const`. Fields of
/// the wrong shape are treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "expr_type", rename_all = "kebab-case")]
pub enum Node {
    Table(TableRef),
    Colref(ColumnRef),
    Subquery(SubqueryRef),
    /// Function call, operator application or parenthesized group
    Expression {
        base_expr: CompactString,
        sub_tree:  Vec<Node>
    },
    /// Target column list of an `INSERT`
    ColumnList { sub_tree: Vec<Node> },
    /// Literal, operator or anything else without column references
    Const { base_expr: CompactString }
}

/// Wire shape of a node with every field optional
#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    expr_type:  CompactString,
    #[serde(default, deserialize_with = "lenient")]
    base_expr:  Option<CompactString>,
    #[serde(default, deserialize_with = "lenient")]
    table:      Option<CompactString>,
    #[serde(default, deserialize_with = "lenient")]
    alias:      Option<Alias>,
    #[serde(default, deserialize_with = "lenient")]
    join_type:  Option<JoinKind>,
    #[serde(default, deserialize_with = "lenient")]
    ref_clause: Option<Vec<Node>>,
    #[serde(default, deserialize_with = "lenient")]
    parts:      Option<NameParts>,
    #[serde(default, deserialize_with = "lenient")]
    sub_tree:   Option<RawSubTree>
}

/// Expressions nest a node list, subqueries a whole statement tree
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSubTree {
    Nodes(Vec<Node>),
    Tree(StatementTree)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny)
}

// A value of the wrong shape reads as absent instead of failing the tree
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>
{
    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Valid(value)) => Some(value),
        _ => None
    })
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let base_expr = raw.base_expr.unwrap_or_default();
        let ref_clause = raw.ref_clause.unwrap_or_default();
        let (nodes, tree) = match raw.sub_tree {
            Some(RawSubTree::Nodes(nodes)) => (Some(nodes), None),
            Some(RawSubTree::Tree(tree)) => (None, Some(tree)),
            None => (None, None)
        };

        match raw.expr_type.as_str() {
            "table" => match raw.table {
                Some(table) => Self::Table(TableRef {
                    table,
                    alias:     raw.alias,
                    join_type: raw.join_type,
                    ref_clause
                }),
                None => Self::Const {
                    base_expr
                }
            },
            "colref" => Self::Colref(ColumnRef {
                base_expr,
                parts: raw.parts
            }),
            "subquery" => Self::Subquery(SubqueryRef {
                sub_tree: tree,
                alias:    raw.alias,
                ref_clause
            }),
            "column-list" => Self::ColumnList {
                sub_tree: nodes.unwrap_or_default()
            },
            "const" => Self::Const {
                base_expr
            },
            _ => match (nodes, tree) {
                (Some(sub_tree), _) => Self::Expression {
                    base_expr,
                    sub_tree
                },
                (None, Some(tree)) => Self::Subquery(SubqueryRef {
                    sub_tree:   Some(tree),
                    alias:      raw.alias,
                    ref_clause: Vec::new()
                }),
                (None, None) => Self::Const {
                    base_expr
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawNode::deserialize(deserializer).map(Self::from)
    }
}

impl Node {
    pub fn subquery(tree: StatementTree) -> Self {
        Self::Subquery(SubqueryRef {
            sub_tree:   Some(tree),
            alias:      None,
            ref_clause: Vec::new()
        })
    }

    pub fn expression(base_expr: impl Into<CompactString>, sub_tree: Vec<Node>) -> Self {
        Self::Expression {
            base_expr: base_expr.into(),
            sub_tree
        }
    }

    pub fn constant(base_expr: impl Into<CompactString>) -> Self {
        Self::Const {
            base_expr: base_expr.into()
        }
    }

    /// Children of a non-subquery node
    pub fn sub_tree(&self) -> &[Node] {
        match self {
            Self::Expression {
                sub_tree, ..
            }
            | Self::ColumnList {
                sub_tree
            } => sub_tree,
            _ => &[]
        }
    }

    /// Join condition attached to a FROM/JOIN item
    pub fn ref_clause(&self) -> &[Node] {
        match self {
            Self::Table(table) => &table.ref_clause,
            Self::Subquery(subquery) => &subquery.ref_clause,
            _ => &[]
        }
    }
}

/// Clause-keyed tree of a single statement.
///
/// Deserialization drops clauses this crate does not scan (`LIMIT`,
/// `VALUES`, ...) and clause values that are not node lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatementTree {
    clauses: IndexMap<Clause, Vec<Node>>
}

impl<'de> Deserialize<'de> for StatementTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Lenient<Vec<Node>>>::deserialize(deserializer)?;
        let mut tree = Self::new();
        for (key, nodes) in raw {
            match (Clause::try_from(key), nodes) {
                (Ok(clause), Lenient::Valid(nodes)) => {
                    tree.clauses.entry(clause).or_default().extend(nodes);
                }
                (Err(reason), _) => trace!(%reason, "skipping clause"),
                (Ok(clause), Lenient::Invalid(_)) => {
                    trace!(%clause, "skipping clause without a node list");
                }
            }
        }
        Ok(tree)
    }
}

impl StatementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clause(&self, clause: Clause) -> Option<&[Node]> {
        self.clauses.get(&clause).map(Vec::as_slice)
    }

    pub fn push(&mut self, clause: Clause, node: Node) {
        self.clauses.entry(clause).or_default().push(node);
    }

    /// Append every clause of `other` to this tree
    pub fn merge(&mut self, other: StatementTree) {
        for (clause, nodes) in other.clauses {
            self.clauses.entry(clause).or_default().extend(nodes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.values().all(Vec::is_empty)
    }
}

/// Split a written identifier on dots outside quotes and strip the quotes.
///
/// ```
/// use sql_trace_analyzer::tree::split_qualified;
///
/// let parts = split_qualified("`db`.\"t.x\".col");
/// assert_eq!(parts.as_slice(), ["db", "t.x", "col"]);
/// ```
pub fn split_qualified(written: &str) -> NameParts {
    let mut parts = NameParts::new();
    let mut current = CompactString::default();
    let mut closing: Option<char> = None;

    for ch in written.chars() {
        match (closing, ch) {
            (Some(close), c) if c == close => closing = None,
            (Some(_), c) => current.push(c),
            (None, '`') => closing = Some('`'),
            (None, '"') => closing = Some('"'),
            (None, '[') => closing = Some(']'),
            (None, '.') => parts.push(std::mem::take(&mut current)),
            (None, c) => current.push(c)
        }
    }
    parts.push(current);

    parts
}
