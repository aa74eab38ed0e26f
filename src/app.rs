//! Application logic for the SQL Trace Analyzer CLI.
//!
//! Each subcommand has a `run_*` function returning a [`CommandOutput`], so
//! the commands are testable without spawning the binary.

mod analyze;
mod bind;
mod convert;
mod helpers;
mod log;
mod types;

pub use self::{
    analyze::run_analyze,
    bind::run_bind,
    convert::{convert_dialect, convert_format},
    helpers::{create_output_options, parse_params, read_input, resolve_dialect},
    log::run_log,
    types::{AnalyzeParams, BindParams, CommandOutput, LogParams}
};
