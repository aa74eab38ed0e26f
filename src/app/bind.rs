use tracing::debug;

use super::{
    helpers::{parse_params, read_input},
    types::{BindParams, CommandOutput}
};
use crate::{
    bind::{bind_params, placeholder_count},
    error::AppResult
};

/// Prints the query with its parameters bound, or unchanged without any
///
/// # Errors
///
/// Returns an error if an input cannot be read or the parameter list is not
/// valid JSON.
pub fn run_bind(params: BindParams) -> AppResult<CommandOutput> {
    let sql = read_input(&params.queries_path)?;
    let param_json = match (params.params, params.params_file) {
        (Some(inline), _) => Some(inline),
        (None, Some(path)) => Some(read_input(&path)?),
        (None, None) => None
    };
    let values = match param_json {
        Some(json) => parse_params(&json)?,
        None => Vec::new()
    };

    let sql = sql.trim_end();
    let expected = placeholder_count(sql);
    if !values.is_empty() && expected != values.len() {
        debug!(
            placeholders = expected,
            params = values.len(),
            "Parameter count does not match placeholders"
        );
    }
    let output = bind_params(sql, &values).unwrap_or_else(|| sql.to_string());
    Ok(CommandOutput::success(output))
}
