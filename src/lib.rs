//! # SQL Trace Analyzer
//!
//! Reports which tables and columns SQL statements touch, and renders
//! parameterized statements with their bound values.
//!
//! The crate is built from small layers:
//!
//! 1. [`scan`] - a lexical scanner classifying SQL text into plain text,
//!    quoted literals, comments and `?` placeholders;
//! 2. [`bind`] - placeholder substitution on top of the scanner;
//! 3. [`parser`] - the [`parser::StatementParser`] boundary and its
//!    `sqlparser`-backed implementation, producing [`tree::StatementTree`]s;
//! 4. [`extract`] - the table and column passes over those trees;
//! 5. [`analyzer`] - the facade tying a parser to the extractor.
//!
//! [`record`] reads JSON Lines query logs and analyzes them in bulk.
//!
//! # Quick Start
//!
//! ```bash
//! # Tables and columns per statement
//! sql-trace-analyzer analyze -q queries.sql
//!
//! # Bind parameters
//! echo "SELECT * FROM users WHERE id = ?" | sql-trace-analyzer bind -q - -p '["42"]'
//!
//! # Analyze a captured query log, one JSON object per line
//! sql-trace-analyzer log queries.jsonl --tag api -f json
//! ```
//!
//! ```
//! use sql_trace_analyzer::{
//!     analyzer::Analyzer,
//!     bind::{Param, bind_params}
//! };
//!
//! let analyzer: Analyzer = Analyzer::default();
//! let result = analyzer.analyze("SELECT * FROM b, a");
//! assert_eq!(result.tables, ["a", "b"]);
//!
//! let bound = bind_params("SELECT ? -- ?", &[Param::from("x")]);
//! assert_eq!(bound.as_deref(), Some("SELECT 'x' -- ?"));
//! ```

pub mod analyzer;
pub mod app;
pub mod bind;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod parser;
pub mod record;
pub mod scan;
pub mod tree;
