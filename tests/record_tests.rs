// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::io::Cursor;

use sql_trace_analyzer::{
    analyzer::{Analyzer, QueryType},
    bind::Param,
    record::{BacktraceFrame, QueryRecord, analyze_records, read_records, shorten_sql}
};

const LOG: &str = r#"{"k":"job1","q":"SELECT u.name FROM users u WHERE u.id = ?","ts":1705970401.123,"tag":"api","params":["42"]}

{"k":"job1","q":"UPDATE users SET name = ? WHERE id = ?","ts":1705970402.5,"params":["O'Brien",null],"trace":[{"call":"PDOStatement->execute()","file":"/app/src/Repo.php","line":42,"function":"save","class_name":"Repo"}]}
this line is not json
{"k":"job1","q":"","ts":1705970403}
{"k":"job1","q":"SELECT * FROM orders","ts":1705970404,"tag":"cron","s":"ok"}
"#;

fn records() -> Vec<QueryRecord> {
    read_records(Cursor::new(LOG), "test.jsonl").unwrap()
}

#[test]
fn test_read_records_skips_blank_and_malformed_lines() {
    let records = records();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].tag.as_deref(), Some("api"));
    assert_eq!(records[3].status.as_deref(), Some("ok"));
}

#[test]
fn test_params_and_trace_are_read() {
    let records = records();
    assert_eq!(records[1].params, [Param::from("O'Brien"), Param::Null]);
    assert_eq!(records[1].trace, [BacktraceFrame {
        call:       "PDOStatement->execute()".to_string(),
        file:       "/app/src/Repo.php".to_string(),
        line:       42,
        function:   Some("save".to_string()),
        class_name: Some("Repo".to_string())
    }]);
    assert_eq!(records[1].source_location().as_deref(), Some("/app/src/Repo.php:42"));
    assert_eq!(records[0].source_location(), None);
}

#[test]
fn test_bound_query() {
    let records = records();
    assert_eq!(
        records[1].bound_query().as_deref(),
        Some("UPDATE users SET name = 'O''Brien' WHERE id = NULL")
    );
    assert_eq!(records[3].bound_query(), None);
}

#[test]
fn test_query_type() {
    let records = records();
    assert_eq!(records[0].query_type(), QueryType::Select);
    assert_eq!(records[1].query_type(), QueryType::Update);
}

#[test]
fn test_analyze_records() {
    let analyzer: Analyzer = Analyzer::default();
    let analyzed = analyze_records(&records(), &analyzer, None);

    assert_eq!(analyzed.len(), 3);
    assert_eq!(analyzed[0].tables, ["users"]);
    assert_eq!(analyzed[0].columns, ["users.id", "users.name"]);
    assert_eq!(
        analyzed[0].bound_query.as_deref(),
        Some("SELECT u.name FROM users u WHERE u.id = '42'")
    );
    assert_eq!(analyzed[1].columns, ["id", "name"]);
    assert_eq!(analyzed[2].tables, ["orders"]);
    assert!(analyzed[2].columns.is_empty());
}

#[test]
fn test_analyze_records_with_tag_filter() {
    let analyzer: Analyzer = Analyzer::default();
    let analyzed = analyze_records(&records(), &analyzer, Some("cron"));
    assert_eq!(analyzed.len(), 1);
    assert_eq!(analyzed[0].query, "SELECT * FROM orders");
}

#[test]
fn test_analyzed_record_json_shape() {
    let analyzer: Analyzer = Analyzer::default();
    let analyzed = analyze_records(&records(), &analyzer, Some("api"));
    let json: serde_json::Value = serde_json::to_value(&analyzed[0]).unwrap();

    assert_eq!(json["k"], "job1");
    assert_eq!(json["t"], serde_json::json!(["users"]));
    assert_eq!(json["c"], serde_json::json!(["users.id", "users.name"]));
    assert_eq!(json["tag"], "api");
    assert!(json.get("trace").is_none());
}

#[test]
fn test_unparseable_record_is_empty() {
    let record: QueryRecord =
        serde_json::from_str(r#"{"k":"j","q":"SELEC oops","ts":0}"#).unwrap();
    let analyzer: Analyzer = Analyzer::default();
    let analyzed = analyze_records(&[record], &analyzer, None);
    assert_eq!(analyzed.len(), 1);
    assert!(analyzed[0].tables.is_empty());
    assert!(analyzed[0].columns.is_empty());
}

#[test]
fn test_shorten_sql() {
    assert_eq!(shorten_sql("SELECT   1", 80), "SELECT 1");
    assert_eq!(shorten_sql("SELECT abcdef", 9), "SELECT...");
    assert_eq!(shorten_sql("żółw żółw", 7), "żółw...");
}
