//! Lexical classification of raw SQL text.
//!
//! The [`Scanner`] splits a statement into contiguous [`Span`]s so that
//! callers can tell bound-parameter placeholders apart from question marks
//! that live inside string literals, quoted identifiers or comments. The
//! rules follow the MySQL/MariaDB default SQL mode (backslash escapes are
//! honoured, `NO_BACKSLASH_ESCAPES` is not).
//!
//! ```
//! use sql_trace_analyzer::scan::{Scanner, SpanKind};
//!
//! let kinds: Vec<SpanKind> = Scanner::new("a = '?' AND b = ?")
//!     .map(|span| span.kind)
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         SpanKind::PlainText,
//!         SpanKind::SingleQuoted,
//!         SpanKind::PlainText,
//!         SpanKind::Placeholder
//!     ]
//! );
//! ```
//!
//! Every delimiter the scanner reacts to is ASCII, so span boundaries always
//! fall on UTF-8 character boundaries.

/// Classification of a span of SQL text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    PlainText,
    SingleQuoted,
    DoubleQuoted,
    BacktickQuoted,
    LineCommentDash,
    LineCommentHash,
    BlockComment,
    Placeholder
}

/// A classified, borrowed slice of the scanned statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind:  SpanKind,
    /// Byte offset of the span in the scanned text
    pub start: usize,
    pub text:  &'a str
}

impl Span<'_> {
    /// Byte offset one past the end of the span
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Lazy span iterator over a SQL statement.
///
/// The spans cover the whole input without gaps or overlaps. Unterminated
/// literals and comments absorb the rest of the input instead of failing.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    sql: &'a str,
    pos: usize
}

impl<'a> Scanner<'a> {
    pub fn new(sql: &'a str) -> Self {
        Self {
            sql,
            pos: 0
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.sql.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        let (kind, end) = match bytes[start] {
            b'\'' => (SpanKind::SingleQuoted, quoted_end(bytes, start, b'\'')),
            b'"' => (SpanKind::DoubleQuoted, quoted_end(bytes, start, b'"')),
            b'`' => (SpanKind::BacktickQuoted, delimited_end(self.sql, start, 1, "`")),
            b'#' => (SpanKind::LineCommentHash, line_end(self.sql, start)),
            b'?' => (SpanKind::Placeholder, start + 1),
            b'-' if starts_dash_comment(bytes, start) => {
                (SpanKind::LineCommentDash, line_end(self.sql, start))
            }
            b'/' if starts_block_comment(bytes, start) => {
                (SpanKind::BlockComment, delimited_end(self.sql, start, 2, "*/"))
            }
            _ => (SpanKind::PlainText, plain_end(bytes, start))
        };

        self.pos = end;
        Some(Span {
            kind,
            start,
            text: &self.sql[start..end]
        })
    }
}

/// Split a script into statements on `;` outside literals and comments.
///
/// Segments that are only whitespace are dropped; the rest are trimmed.
pub fn split_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut segment_start = 0;

    for span in Scanner::new(sql) {
        if span.kind != SpanKind::PlainText {
            continue;
        }
        for (offset, _) in span.text.match_indices(';') {
            let end = span.start + offset;
            push_segment(&sql[segment_start..end], &mut statements);
            segment_start = end + 1;
        }
    }
    push_segment(&sql[segment_start..], &mut statements);

    statements
}

fn push_segment<'a>(segment: &'a str, statements: &mut Vec<&'a str>) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed);
    }
}

// `--` only opens a comment when followed by whitespace or the end of input,
// so `1--2` stays arithmetic.
fn starts_dash_comment(bytes: &[u8], at: usize) -> bool {
    bytes.get(at + 1) == Some(&b'-')
        && bytes
            .get(at + 2)
            .is_none_or(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

fn starts_block_comment(bytes: &[u8], at: usize) -> bool {
    bytes.get(at + 1) == Some(&b'*')
}

fn is_span_start(bytes: &[u8], at: usize) -> bool {
    match bytes[at] {
        b'\'' | b'"' | b'`' | b'#' | b'?' => true,
        b'-' => starts_dash_comment(bytes, at),
        b'/' => starts_block_comment(bytes, at),
        _ => false
    }
}

fn plain_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() && !is_span_start(bytes, i) {
        i += 1;
    }
    i
}

fn quoted_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => {
                if bytes.get(i + 1) == Some(&quote) {
                    i += 2;
                } else {
                    return i + 1;
                }
            }
            _ => i += 1
        }
    }
    bytes.len()
}

// Line comments keep their terminating newline.
fn line_end(sql: &str, start: usize) -> usize {
    sql[start..]
        .find('\n')
        .map_or(sql.len(), |offset| start + offset + 1)
}

fn delimited_end(sql: &str, start: usize, opener_len: usize, closer: &str) -> usize {
    let body = start + opener_len;
    sql[body..]
        .find(closer)
        .map_or(sql.len(), |offset| body + offset + closer.len())
}
