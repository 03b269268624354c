//! Rendering of tabular query results

use crate::error::{CliError, Result};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;
use serde_json::Value;

/// Column names plus rows of JSON-typed cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResults {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResults {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CliError::config(format!(
                "Unknown format: '{}'. Use table, csv, tsv, or json",
                s
            ))),
        }
    }
}

/// Render `results`; an empty result renders as a "no rows" notice
pub fn render(results: &QueryResults, format: OutputFormat, no_header: bool) -> Result<String> {
    if results.is_empty() && format != OutputFormat::Json {
        return Ok("Query executed but no rows returned.\n".to_string());
    }

    Ok(match format {
        OutputFormat::Table => format_as_table(results),
        OutputFormat::Csv => format_delimited(results, ',', no_header),
        OutputFormat::Tsv => format_delimited(results, '\t', no_header),
        OutputFormat::Json => format_as_json(results)?,
    })
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    table
}

fn format_as_table(results: &QueryResults) -> String {
    let mut table = new_table();
    table.set_header(&results.columns);

    for row in &results.rows {
        table.add_row(row.iter().map(value_to_string).collect::<Vec<_>>());
    }

    format!("{}\n", table)
}

/// Display form of a cell
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_as_json(results: &QueryResults) -> Result<String> {
    let rows: Vec<serde_json::Map<String, Value>> = results
        .rows
        .iter()
        .map(|row| results.columns.iter().cloned().zip(row.iter().cloned()).collect())
        .collect();

    Ok(format!("{}\n", serde_json::to_string_pretty(&rows)?))
}

fn format_delimited(results: &QueryResults, delimiter: char, no_header: bool) -> String {
    let escape = |value: &str| -> String {
        if value.contains(delimiter) || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    };

    let separator = delimiter.to_string();
    let mut output = String::new();

    if !no_header {
        let header: Vec<String> = results.columns.iter().map(|c| escape(c)).collect();
        output.push_str(&header.join(&separator));
        output.push('\n');
    }

    for row in &results.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => escape(&value_to_string(other)),
            })
            .collect();
        output.push_str(&cells.join(&separator));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results() -> QueryResults {
        QueryResults {
            columns: vec!["Team".to_string(), "Wins".to_string(), "GB".to_string()],
            rows: vec![
                vec![json!("New York Yankees"), json!(95), Value::Null],
                vec![json!("Boston, MA"), json!(82), json!(13.5)],
            ],
        }
    }

    #[test]
    fn test_csv() {
        let out = render(&results(), OutputFormat::Csv, false).unwrap();
        assert_eq!(out, "Team,Wins,GB\nNew York Yankees,95,\n\"Boston, MA\",82,13.5\n");
    }

    #[test]
    fn test_tsv_without_header() {
        let out = render(&results(), OutputFormat::Tsv, true).unwrap();
        assert_eq!(out, "New York Yankees\t95\t\nBoston, MA\t82\t13.5\n");
    }

    #[test]
    fn test_json_rows_are_objects() {
        let out = render(&results(), OutputFormat::Json, false).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["Team"], "New York Yankees");
        assert_eq!(parsed[1]["GB"], 13.5);
        assert!(parsed[0]["GB"].is_null());
    }

    #[test]
    fn test_table_and_empty() {
        let out = render(&results(), OutputFormat::Table, false).unwrap();
        assert!(out.contains("New York Yankees"));
        assert!(out.contains("NULL"));

        let empty = QueryResults {
            columns: vec!["Team".to_string()],
            rows: vec![],
        };
        assert!(render(&empty, OutputFormat::Table, false).unwrap().contains("no rows"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
