use tracing::debug;

use super::{
    helpers::{create_output_options, read_input, resolve_dialect},
    types::{AnalyzeParams, CommandOutput}
};
use crate::{analyzer::Analyzer, config::Config, error::AppResult, output::format_reports};

/// Reports the tables and columns of every statement in the input.
///
/// Statements the parser rejects are reported as unparsed with empty
/// results; they do not fail the command.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn run_analyze(params: AnalyzeParams, config: &Config) -> AppResult<CommandOutput> {
    let sql = read_input(&params.queries_path)?;
    let dialect = resolve_dialect(params.dialect, config);
    let output_opts = create_output_options(params.output_format, params.no_color, config);

    let analyzer = Analyzer::with_dialect(dialect);
    let reports = analyzer.analyze_script(&sql);
    debug!(
        statements = reports.len(),
        dialect = ?analyzer.parser().dialect(),
        "analyzed script"
    );

    Ok(CommandOutput::success(format_reports(&reports, &output_opts)))
}
