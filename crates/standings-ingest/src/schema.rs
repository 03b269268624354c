//! Column-oriented staging table and SQL type inference
//!
//! Types are derived from the values actually present, not declared up front:
//! a column of whole numbers is INTEGER, one fractional value makes it REAL,
//! any text makes it TEXT. Nulls never vote.

use crate::{IngestError, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value};
use serde::{Deserialize, Serialize};
use standings_common::NormalizedStandingsRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<Option<f64>> for ColumnValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(ColumnValue::Null, ColumnValue::Real)
    }
}

impl ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ColumnValue::Null => ToSqlOutput::Owned(Value::Null),
            ColumnValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            ColumnValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            ColumnValue::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<ColumnValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<ColumnValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Named columns of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnarTable {
    columns: Vec<Column>,
    rows: usize,
}

impl ColumnarTable {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.values.len());

        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(IngestError::Schema(format!(
                "column '{}' has {} values, expected {}",
                bad.name,
                bad.values.len(),
                rows
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Table layout of the destination: Year, Team, Wins, Losses, WP, GB
    pub fn from_standings(records: &[NormalizedStandingsRecord]) -> Self {
        let collect = |f: fn(&NormalizedStandingsRecord) -> ColumnValue| -> Vec<ColumnValue> {
            records.iter().map(f).collect()
        };

        let columns = vec![
            Column::new("Year", collect(|r| ColumnValue::Integer(i64::from(r.year)))),
            Column::new("Team", collect(|r| ColumnValue::Text(r.team.clone()))),
            Column::new("Wins", collect(|r| ColumnValue::Integer(r.wins))),
            Column::new("Losses", collect(|r| ColumnValue::Integer(r.losses))),
            Column::new("WP", collect(|r| r.wp.into())),
            Column::new("GB", collect(|r| r.gb.into())),
        ];

        Self {
            columns,
            rows: records.len(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Cells of row `index` in column order
    pub fn row(&self, index: usize) -> Option<Vec<&ColumnValue>> {
        if index >= self.rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }
}

/// SQL type for one column of values
pub fn infer_column_type(values: &[ColumnValue]) -> ColumnType {
    let mut saw_value = false;
    let mut fractional = false;

    for value in values {
        match value {
            ColumnValue::Null => {},
            ColumnValue::Text(_) => return ColumnType::Text,
            ColumnValue::Integer(_) => saw_value = true,
            ColumnValue::Real(f) => {
                saw_value = true;
                if f.fract() != 0.0 {
                    fractional = true;
                }
            },
        }
    }

    match (saw_value, fractional) {
        (false, _) => ColumnType::Text,
        (true, true) => ColumnType::Real,
        (true, false) => ColumnType::Integer,
    }
}

/// Schema for every column of `table`, in column order
pub fn infer(table: &ColumnarTable) -> Vec<ColumnSchema> {
    table
        .columns()
        .iter()
        .map(|column| ColumnSchema {
            name: column.name.clone(),
            column_type: infer_column_type(&column.values),
        })
        .collect()
}
