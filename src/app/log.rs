use std::{
    fs::File,
    io::{self, BufReader}
};

use tracing::debug;

use super::{
    helpers::{create_output_options, resolve_dialect},
    types::{CommandOutput, LogParams}
};
use crate::{
    analyzer::Analyzer,
    config::Config,
    error::{AppResult, file_read_error},
    output::format_records,
    record::{QueryRecord, analyze_records, read_records}
};

/// Analyzes every record of a JSON Lines query log.
///
/// # Errors
///
/// Returns an error if the log cannot be opened or read.
pub fn run_log(params: LogParams, config: &Config) -> AppResult<CommandOutput> {
    let records = load_records(&params.log_path)?;
    let dialect = resolve_dialect(params.dialect, config);
    let output_opts = create_output_options(params.output_format, params.no_color, config);

    let analyzer = Analyzer::with_dialect(dialect);
    let analyzed = analyze_records(&records, &analyzer, params.tag.as_deref());
    debug!(
        read = records.len(),
        analyzed = analyzed.len(),
        "analyzed query log"
    );

    Ok(CommandOutput::success(format_records(&analyzed, &output_opts)))
}

fn load_records(path: &str) -> AppResult<Vec<QueryRecord>> {
    if path == "-" {
        read_records(io::stdin().lock(), "stdin")
    } else {
        let file = File::open(path).map_err(|e| file_read_error(path, e))?;
        read_records(BufReader::new(file), path)
    }
}
