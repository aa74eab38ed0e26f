use colored::Colorize;

use crate::{
    analyzer::{QueryType, StatementReport},
    record::AnalyzedRecord
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:        OutputFormat,
    pub colored:       bool,
    pub short_sql_len: usize
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:        OutputFormat::Text,
            colored:       true,
            short_sql_len: 80
        }
    }
}

/// Format per-statement reports of an `analyze` run
pub fn format_reports(reports: &[StatementReport], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(reports).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(reports).unwrap_or_default(),
        OutputFormat::Text => format_text_reports(reports, opts)
    }
}

/// Format analyzed log records.
///
/// JSON output is one compact record per line so it can be piped back into
/// line-oriented tools.
pub fn format_records(records: &[AnalyzedRecord], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => records
            .iter()
            .filter_map(|record| serde_json::to_string(record).ok())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Yaml => serde_yaml::to_string(records).unwrap_or_default(),
        OutputFormat::Text => format_text_records(records, opts)
    }
}

fn format_text_reports(reports: &[StatementReport], opts: &OutputOptions) -> String {
    let mut output = String::new();
    push_title(&mut output, "=== SQL Statement Analysis ===", opts);

    for (i, report) in reports.iter().enumerate() {
        let header = format!("Statement #{} ({}):", i + 1, report.query_type);
        push_header(&mut output, &header, opts);
        output.push_str(&format!("{}\n", report.sql));

        if !report.parsed {
            let note = "Not parsed: no tables or columns reported";
            if opts.colored {
                output.push_str(&note.yellow().to_string());
            } else {
                output.push_str(note);
            }
            output.push('\n');
        }

        push_list(&mut output, "Tables", &report.tables);
        push_list(&mut output, "Columns", &report.columns);
        output.push('\n');
    }

    output
}

fn format_text_records(records: &[AnalyzedRecord], opts: &OutputOptions) -> String {
    let mut output = String::new();
    push_title(
        &mut output,
        &format!("=== Query Log ({} records) ===", records.len()),
        opts
    );

    for (i, record) in records.iter().enumerate() {
        let mut header = format!(
            "#{} [{}] {}",
            i + 1,
            record.job_key,
            QueryType::detect(&record.query)
        );
        if let Some(tag) = &record.tag {
            header.push_str(&format!(" tag={}", tag));
        }
        push_header(&mut output, &header, opts);
        output.push_str(&format!("{}\n", record.short_sql(opts.short_sql_len)));

        if let Some(bound) = &record.bound_query {
            output.push_str(&format!("Bound: {}\n", bound));
        }
        push_list(&mut output, "Tables", &record.tables);
        push_list(&mut output, "Columns", &record.columns);
        if let Some(location) = record.source_location() {
            let line = format!("Source: {}", location);
            if opts.colored {
                output.push_str(&line.dimmed().to_string());
            } else {
                output.push_str(&line);
            }
            output.push('\n');
        }
        output.push('\n');
    }

    output
}

fn push_title(output: &mut String, title: &str, opts: &OutputOptions) {
    if opts.colored {
        output.push_str(&title.bold().to_string());
    } else {
        output.push_str(title);
    }
    output.push_str("\n\n");
}

fn push_header(output: &mut String, header: &str, opts: &OutputOptions) {
    if opts.colored {
        output.push_str(&header.cyan().bold().to_string());
    } else {
        output.push_str(header);
    }
    output.push('\n');
}

fn push_list<S: AsRef<str>>(output: &mut String, label: &str, items: &[S]) {
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    if items.is_empty() {
        output.push_str(&format!("{}: -\n", label));
    } else {
        output.push_str(&format!("{}: {}\n", label, items.join(", ")));
    }
}
