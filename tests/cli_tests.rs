// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::io::Write;

use clap::Parser;
use sql_trace_analyzer::{
    app::{AnalyzeParams, BindParams, LogParams, run_analyze, run_bind, run_log},
    cli::{Cli, Commands, Dialect, Format},
    config::Config
};
use tempfile::NamedTempFile;

fn temp_with(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_str().unwrap().to_string()
}

#[test]
fn test_parse_analyze_command() {
    let cli = Cli::try_parse_from([
        "sql-trace-analyzer",
        "analyze",
        "-q",
        "queries.sql",
        "--dialect",
        "postgresql",
        "-f",
        "json",
        "--no-color"
    ])
    .unwrap();

    assert!(!cli.verbose);
    let Commands::Analyze {
        queries,
        dialect,
        output_format,
        no_color
    } = cli.command
    else {
        panic!("expected analyze");
    };
    assert_eq!(queries.to_str(), Some("queries.sql"));
    assert_eq!(dialect, Some(Dialect::Postgresql));
    assert_eq!(output_format, Some(Format::Json));
    assert!(no_color);
}

#[test]
fn test_parse_log_command_with_global_verbose() {
    let cli =
        Cli::try_parse_from(["sql-trace-analyzer", "log", "trace.jsonl", "--tag", "api", "-v"])
            .unwrap();

    assert!(cli.verbose);
    let Commands::Log {
        file, tag, dialect, ..
    } = cli.command
    else {
        panic!("expected log");
    };
    assert_eq!(file.to_str(), Some("trace.jsonl"));
    assert_eq!(tag.as_deref(), Some("api"));
    assert!(dialect.is_none());
}

#[test]
fn test_bind_params_conflict() {
    let result = Cli::try_parse_from([
        "sql-trace-analyzer",
        "bind",
        "-q",
        "q.sql",
        "-p",
        "[]",
        "--params-file",
        "p.json"
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_dialect_rejected() {
    let result =
        Cli::try_parse_from(["sql-trace-analyzer", "analyze", "-q", "q.sql", "--dialect", "oracle"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_subcommand_rejected() {
    assert!(Cli::try_parse_from(["sql-trace-analyzer"]).is_err());
}

#[test]
fn test_run_analyze() {
    let queries = temp_with("SELECT u.name FROM users u;\nDELETE FROM sessions WHERE id = 1;\n");
    let output = run_analyze(
        AnalyzeParams {
            queries_path:  path_of(&queries),
            dialect:       None,
            output_format: Some(Format::Json),
            no_color:      true
        },
        &Config::default()
    )
    .unwrap();

    assert_eq!(output.exit_code, 0);
    let value: serde_json::Value = serde_json::from_str(&output.stdout[0]).unwrap();
    assert_eq!(value[0]["tables"], serde_json::json!(["users"]));
    assert_eq!(value[0]["columns"], serde_json::json!(["users.name"]));
    assert_eq!(value[1]["query_type"], "DELETE");
    assert_eq!(value[1]["columns"], serde_json::json!(["id"]));
}

#[test]
fn test_run_analyze_uses_config_format() {
    let queries = temp_with("SELECT id FROM t");
    let mut config = Config::default();
    config.output.format = Some(Format::Yaml);

    let output = run_analyze(
        AnalyzeParams {
            queries_path:  path_of(&queries),
            dialect:       Some(Dialect::Generic),
            output_format: None,
            no_color:      true
        },
        &config
    )
    .unwrap();
    assert!(output.stdout[0].contains("query_type: SELECT"));
}

#[test]
fn test_run_analyze_missing_file() {
    let result = run_analyze(
        AnalyzeParams {
            queries_path:  "/nonexistent/queries.sql".to_string(),
            dialect:       None,
            output_format: None,
            no_color:      true
        },
        &Config::default()
    );
    assert!(result.is_err());
}

#[test]
fn test_run_bind_inline_params() {
    let queries = temp_with("SELECT * FROM t WHERE a = ? AND b = ?\n");
    let output = run_bind(BindParams {
        queries_path: path_of(&queries),
        params:       Some(r#"["x", null]"#.to_string()),
        params_file:  None
    })
    .unwrap();
    assert_eq!(output.stdout, ["SELECT * FROM t WHERE a = 'x' AND b = NULL"]);
}

#[test]
fn test_run_bind_params_file() {
    let queries = temp_with("UPDATE t SET name = ?");
    let params = temp_with(r#"["O'Brien"]"#);
    let output = run_bind(BindParams {
        queries_path: path_of(&queries),
        params:       None,
        params_file:  Some(path_of(&params))
    })
    .unwrap();
    assert_eq!(output.stdout, ["UPDATE t SET name = 'O''Brien'"]);
}

#[test]
fn test_run_bind_without_params_echoes_query() {
    let queries = temp_with("SELECT ?\n");
    let output = run_bind(BindParams {
        queries_path: path_of(&queries),
        params:       None,
        params_file:  None
    })
    .unwrap();
    assert_eq!(output.stdout, ["SELECT ?"]);
}

#[test]
fn test_run_bind_invalid_params() {
    let queries = temp_with("SELECT ?");
    let result = run_bind(BindParams {
        queries_path: path_of(&queries),
        params:       Some("{not json".to_string()),
        params_file:  None
    });
    assert!(result.is_err());
}

#[test]
fn test_run_log_with_tag() {
    let log = temp_with(concat!(
        r#"{"k":"j","q":"SELECT id FROM users","ts":1,"tag":"api"}"#,
        "\n",
        r#"{"k":"j","q":"SELECT id FROM jobs","ts":2,"tag":"cron"}"#,
        "\n"
    ));
    let output = run_log(
        LogParams {
            log_path:      path_of(&log),
            tag:           Some("cron".to_string()),
            dialect:       None,
            output_format: Some(Format::Json),
            no_color:      true
        },
        &Config::default()
    )
    .unwrap();

    let lines: Vec<&str> = output.stdout[0].lines().collect();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["t"], serde_json::json!(["jobs"]));
}

#[test]
fn test_run_log_missing_file() {
    let result = run_log(
        LogParams {
            log_path:      "/nonexistent/trace.jsonl".to_string(),
            tag:           None,
            dialect:       None,
            output_format: None,
            no_color:      true
        },
        &Config::default()
    );
    assert!(result.is_err());
}
