// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_trace_analyzer::bind::{Param, bind_params, placeholder_count};

fn values(items: &[&str]) -> Vec<Param> {
    items.iter().map(|item| Param::from(*item)).collect()
}

#[test]
fn test_empty_params_is_absent() {
    assert_eq!(bind_params("SELECT * FROM t WHERE id = ?", &[]), None);
    assert_eq!(bind_params("", &[]), None);
}

#[test]
fn test_binds_in_order() {
    let bound = bind_params("a = ? AND b = ?", &values(&["1", "2"]));
    assert_eq!(bound.as_deref(), Some("a = '1' AND b = '2'"));
}

#[test]
fn test_null_param() {
    let bound = bind_params("UPDATE t SET a = ?", &[Param::Null]);
    assert_eq!(bound.as_deref(), Some("UPDATE t SET a = NULL"));
}

#[test]
fn test_commented_placeholder_untouched() {
    let bound = bind_params("SELECT 1 -- where id = ?\nWHERE name = ?", &values(&["x"]));
    assert_eq!(
        bound.as_deref(),
        Some("SELECT 1 -- where id = ?\nWHERE name = 'x'")
    );
}

#[test]
fn test_quoted_placeholder_untouched() {
    let bound = bind_params("SELECT '?', `?` FROM t WHERE a = ?", &values(&["v"]));
    assert_eq!(bound.as_deref(), Some("SELECT '?', `?` FROM t WHERE a = 'v'"));
}

#[test]
fn test_escapes_quote() {
    let bound = bind_params("?", &values(&["O'Brien"]));
    assert_eq!(bound.as_deref(), Some("'O''Brien'"));
}

#[test]
fn test_escapes_backslash() {
    let bound = bind_params("?", &values(&[r"C:\tmp"]));
    assert_eq!(bound.as_deref(), Some(r"'C:\\tmp'"));
}

#[test]
fn test_escapes_backslash_before_quote() {
    let bound = bind_params("?", &values(&[r"\'"]));
    assert_eq!(bound.as_deref(), Some(r"'\\'''"));
}

#[test]
fn test_fewer_params_than_placeholders() {
    let bound = bind_params("a = ? AND b = ?", &values(&["1"]));
    assert_eq!(bound.as_deref(), Some("a = '1' AND b = ?"));
}

#[test]
fn test_more_params_than_placeholders() {
    let bound = bind_params("a = ?", &values(&["1", "2", "3"]));
    assert_eq!(bound.as_deref(), Some("a = '1'"));
}

#[test]
fn test_no_placeholders_returns_text() {
    let bound = bind_params("SELECT 1", &values(&["unused"]));
    assert_eq!(bound.as_deref(), Some("SELECT 1"));
}

#[test]
fn test_binding_is_deterministic() {
    let params = values(&["x", "y'z"]);
    let sql = "INSERT INTO t VALUES (?, ?)";
    assert_eq!(bind_params(sql, &params), bind_params(sql, &params));
}

#[test]
fn test_injected_content_stays_inert() {
    let hostile = [
        "?",
        "' OR 1=1 -- ?",
        r"\' ?",
        "*/ ? /*",
        "` ?",
        "\" ?",
        "# ?\n?"
    ];
    for value in hostile {
        let bound = bind_params("SELECT * FROM t WHERE a = ? AND b = 1", &values(&[value]))
            .unwrap_or_default();
        assert_eq!(placeholder_count(&bound), 0, "value {:?} -> {}", value, bound);
    }
}

#[test]
fn test_rebinding_bound_output_is_noop() {
    let bound = bind_params("a = ?", &values(&["? ?"])).unwrap();
    let rebound = bind_params(&bound, &values(&["x"])).unwrap();
    assert_eq!(rebound, bound);
}

#[test]
fn test_params_from_json() {
    let params: Vec<Param> = serde_json::from_str(r#"["42", null, "x"]"#).unwrap();
    assert_eq!(params, [Param::from("42"), Param::Null, Param::from("x")]);
    assert_eq!(
        serde_json::to_string(&params).unwrap(),
        r#"["42",null,"x"]"#
    );
}

#[test]
fn test_param_display() {
    assert_eq!(Param::from("it's").to_string(), "'it''s'");
    assert_eq!(Param::Null.to_string(), "NULL");
}

#[test]
fn test_placeholder_count() {
    assert_eq!(placeholder_count("a = ? AND b IN (?, ?) -- ?"), 3);
}
