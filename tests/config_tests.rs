// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::{collections::HashMap, io::Write};

use sql_trace_analyzer::{
    cli::{Dialect, Format},
    config::{Config, OutputConfig}
};
use tempfile::NamedTempFile;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.parser.dialect.is_none());
    assert!(config.output.format.is_none());
    assert!(config.output.colored);
    assert_eq!(config.output.short_sql_len, 80);
}

#[test]
fn test_from_toml() {
    let config = Config::from_toml(
        r#"
        [parser]
        dialect = "postgresql"

        [output]
        format = "json"
        colored = false
        short_sql_len = 120
        "#
    )
    .unwrap();

    assert_eq!(config.parser.dialect, Some(Dialect::Postgresql));
    assert_eq!(config.output.format, Some(Format::Json));
    assert!(!config.output.colored);
    assert_eq!(config.output.short_sql_len, 120);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = Config::from_toml("[output]\nformat = \"yaml\"\n").unwrap();

    assert_eq!(config.output.format, Some(Format::Yaml));
    assert!(config.output.colored);
    assert_eq!(config.output.short_sql_len, 80);
    assert!(config.parser.dialect.is_none());
}

#[test]
fn test_invalid_toml() {
    assert!(Config::from_toml("[parser]\ndialect = \"oracle\"\n").is_err());
    assert!(Config::from_toml("not = [valid").is_err());
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[parser]\ndialect = \"sqlite\"").unwrap();

    let config = Config::from_file(file.path()).unwrap().unwrap();
    assert_eq!(config.parser.dialect, Some(Dialect::Sqlite));
}

#[test]
fn test_from_missing_file() {
    let missing = std::path::Path::new("/nonexistent/sql-trace-analyzer.toml");
    assert!(Config::from_file(missing).unwrap().is_none());
}

#[test]
fn test_env_overrides() {
    let mut config = Config::from_toml("[parser]\ndialect = \"mysql\"\n").unwrap();
    config
        .apply_env(env_of(&[
            ("SQL_TRACE_DIALECT", "ClickHouse"),
            ("SQL_TRACE_FORMAT", "yaml"),
            ("NO_COLOR", "1")
        ]))
        .unwrap();

    assert_eq!(config.parser.dialect, Some(Dialect::Clickhouse));
    assert_eq!(config.output.format, Some(Format::Yaml));
    assert!(!config.output.colored);
}

#[test]
fn test_empty_no_color_is_ignored() {
    let mut config = Config::default();
    config.apply_env(env_of(&[("NO_COLOR", "")])).unwrap();
    assert!(config.output.colored);
}

#[test]
fn test_invalid_env_value() {
    let mut config = Config::default();
    let result = config.apply_env(env_of(&[("SQL_TRACE_FORMAT", "sarif")]));
    assert!(result.is_err());
}

#[test]
fn test_output_config_default() {
    let output = OutputConfig::default();
    assert!(output.format.is_none());
    assert!(output.colored);
}
