//! Rendering of prepared statements with their bound parameters.
//!
//! Captured prepared statements carry their parameters next to the SQL text.
//! [`bind_params`] substitutes them into the placeholders reported by the
//! [`Scanner`](crate::scan::Scanner), producing a statement that can be read
//! or copied into a SQL console.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scan::{Scanner, SpanKind};

/// A single bound parameter value
///
/// Serialized as a JSON string, or `null` for a bound SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Param {
    Null,
    Value(String)
}

impl Param {
    /// Append the SQL rendering of this parameter to `out`.
    ///
    /// Values are single-quoted with backslashes doubled first and single
    /// quotes doubled second.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("NULL"),
            Self::Value(value) => {
                out.push('\'');
                for ch in value.chars() {
                    match ch {
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("''"),
                        other => out.push(other)
                    }
                }
                out.push('\'');
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

impl From<Option<String>> for Param {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

impl From<Param> for Option<String> {
    fn from(param: Param) -> Self {
        match param {
            Param::Null => None,
            Param::Value(value) => Some(value)
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Substitute `params` into the unquoted `?` placeholders of `sql`.
///
/// Returns `None` when `params` is empty so callers can fall back to the raw
/// statement. Extra placeholders are kept as `?`, extra parameters are
/// ignored.
///
/// ```
/// use sql_trace_analyzer::bind::{Param, bind_params};
///
/// let bound = bind_params("SELECT * FROM t WHERE a = '?' AND b = ?", &[Param::from("x")]);
/// assert_eq!(bound.as_deref(), Some("SELECT * FROM t WHERE a = '?' AND b = 'x'"));
/// assert_eq!(bind_params("SELECT 1", &[]), None);
/// ```
pub fn bind_params(sql: &str, params: &[Param]) -> Option<String> {
    if params.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut pending = params.iter();

    for span in Scanner::new(sql) {
        if span.kind != SpanKind::Placeholder {
            out.push_str(span.text);
            continue;
        }
        match pending.next() {
            Some(param) => param.render_into(&mut out),
            None => out.push_str(span.text)
        }
    }

    Some(out)
}

/// Count the placeholders a statement expects
pub fn placeholder_count(sql: &str) -> usize {
    Scanner::new(sql)
        .filter(|span| span.kind == SpanKind::Placeholder)
        .count()
}
