pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create query parse error with optional position info
pub fn query_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    AppError::bad_request(format_sql_error("Query parse error", &msg))
}

/// Create bound parameter list error
pub fn params_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Invalid parameter list: {}", message.into()))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Format SQL error with position highlighting
fn format_sql_error(prefix: &str, message: &str) -> String {
    // sqlparser reports positions as "... at Line: X, Column: Y"
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, column {}:\n  {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

struct SqlPosition {
    line:   usize,
    column: usize
}

fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let line_start = message.find(line_marker)? + line_marker.len();
    let rest = &message[line_start..];

    let line_end = rest.find(|c: char| !c.is_ascii_digit())?;
    let line = rest[..line_end].parse().ok()?;

    let after_line = &rest[line_end..];
    let col_marker = after_line.find("Column")? + "Column".len();
    let col_text = after_line[col_marker..].trim_start_matches([':', ' ']);
    let col_end = col_text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(col_text.len());
    let column = col_text[..col_end].parse().ok()?;

    Some(SqlPosition {
        line,
        column
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_position_with_colon() {
        let pos = extract_position("Expected: end of statement at Line: 3, Column: 25").unwrap();
        assert_eq!((pos.line, pos.column), (3, 25));
    }

    #[test]
    fn test_extract_position_without_colon() {
        let pos = extract_position("Error at Line: 1, Column 7 in statement").unwrap();
        assert_eq!((pos.line, pos.column), (1, 7));
    }

    #[test]
    fn test_extract_position_missing() {
        assert!(extract_position("Unexpected token").is_none());
    }
}
