//! Query log records.
//!
//! A profiling job writes one JSON object per captured query (JSON Lines):
//!
//! ```json
//! {"k":"job1","q":"SELECT * FROM users WHERE id = ?","ts":1705970401.123,"tag":"api","params":["42"]}
//! ```
//!
//! This module reads those records and analyzes them. Writing the log and
//! managing the jobs that own it happen elsewhere.

use std::io::BufRead;

use compact_str::CompactString;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    analyzer::{Analyzer, QueryType},
    bind::{Param, bind_params},
    error::{AppResult, file_read_error},
    parser::StatementParser
};

/// Call site captured with a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktraceFrame {
    #[serde(default)]
    pub call:       String,
    #[serde(default)]
    pub file:       String,
    #[serde(default)]
    pub line:       u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function:   Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>
}

/// One captured query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryRecord {
    #[serde(rename = "k", default)]
    pub job_key:   String,
    #[serde(rename = "q", default)]
    pub query:     String,
    #[serde(rename = "ts", default)]
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag:       Option<String>,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub status:    Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params:    Vec<Param>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace:     Vec<BacktraceFrame>
}

impl QueryRecord {
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Query with its parameters bound, `None` without parameters
    pub fn bound_query(&self) -> Option<String> {
        bind_params(&self.query, &self.params)
    }

    pub fn query_type(&self) -> QueryType {
        QueryType::detect(&self.query)
    }

    /// Query on one line, truncated to `max_len` characters with `...`
    pub fn short_sql(&self, max_len: usize) -> String {
        shorten_sql(&self.query, max_len)
    }

    /// `file:line` of the innermost captured frame
    pub fn source_location(&self) -> Option<String> {
        frame_location(&self.trace)
    }
}

/// A record together with its analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedRecord {
    #[serde(rename = "k")]
    pub job_key:     String,
    #[serde(rename = "q")]
    pub query:       String,
    #[serde(rename = "b", skip_serializing_if = "Option::is_none")]
    pub bound_query: Option<String>,
    #[serde(rename = "t")]
    pub tables:      Vec<CompactString>,
    #[serde(rename = "c")]
    pub columns:     Vec<CompactString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag:         Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace:       Vec<BacktraceFrame>
}

impl AnalyzedRecord {
    pub fn short_sql(&self, max_len: usize) -> String {
        shorten_sql(&self.query, max_len)
    }

    pub fn source_location(&self) -> Option<String> {
        frame_location(&self.trace)
    }
}

/// Collapse whitespace runs and truncate to `max_len` characters
pub fn shorten_sql(sql: &str, max_len: usize) -> String {
    let one_line = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.chars().count() <= max_len {
        return one_line;
    }
    let mut short: String = one_line.chars().take(max_len.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

fn frame_location(trace: &[BacktraceFrame]) -> Option<String> {
    trace
        .first()
        .map(|frame| format!("{}:{}", frame.file, frame.line))
}

/// Read JSON Lines query records.
///
/// Blank lines are ignored and malformed lines are skipped with a warning.
///
/// # Errors
///
/// Returns an error when the reader itself fails.
pub fn read_records<R: BufRead>(reader: R, source: &str) -> AppResult<Vec<QueryRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| file_read_error(source, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<QueryRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(source, line = index + 1, error = %e, "skipping malformed query record")
        }
    }
    Ok(records)
}

/// Analyze records in parallel, keeping their order.
///
/// Records with an empty query are skipped, as are records whose tag does
/// not match `tag` when one is given.
pub fn analyze_records<P: StatementParser>(
    records: &[QueryRecord],
    analyzer: &Analyzer<P>,
    tag: Option<&str>
) -> Vec<AnalyzedRecord> {
    records
        .par_iter()
        .filter(|record| !record.query.is_empty())
        .filter(|record| tag.is_none_or(|wanted| record.tag.as_deref() == Some(wanted)))
        .map(|record| {
            let extraction = analyzer.analyze(&record.query);
            AnalyzedRecord {
                job_key:     record.job_key.clone(),
                query:       record.query.clone(),
                bound_query: record.bound_query(),
                tables:      extraction.tables,
                columns:     extraction.columns,
                tag:         record.tag.clone(),
                trace:       record.trace.clone()
            }
        })
        .collect()
}
