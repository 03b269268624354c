//! `standings query` command implementation
//!
//! Runs one read-only statement against the standings database. Statements
//! are parsed with the SQLite dialect first so that writes are refused with a
//! clear message instead of a driver error; the connection itself is also
//! opened read-only.

use crate::config::CliConfig;
use crate::db::open_read_only;
use crate::error::{CliError, Result};
use crate::output::{render, OutputFormat, QueryResults};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;
use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use tracing::{debug, info};

/// Run the query command
pub fn run(config: &CliConfig, sql: &str, format: OutputFormat, no_header: bool) -> Result<()> {
    info!("Running query command");

    let conn = open_read_only(config.database_path())?;
    let results = execute(&conn, sql)?;
    print!("{}", render(&results, format, no_header)?);

    Ok(())
}

/// Check that `sql` is exactly one query or EXPLAIN
pub fn validate_sql(sql: &str) -> Result<()> {
    let statements = Parser::parse_sql(&SQLiteDialect {}, sql)
        .map_err(|e| CliError::invalid_sql(e.to_string()))?;

    let statement = match statements.as_slice() {
        [] => return Err(CliError::invalid_sql("empty statement")),
        [statement] => statement,
        _ => {
            return Err(CliError::invalid_sql(format!(
                "expected one statement, found {}",
                statements.len()
            )))
        },
    };

    match statement {
        Statement::Query(_) | Statement::Explain { .. } | Statement::ExplainTable { .. } => Ok(()),
        other => Err(CliError::ReadOnly(statement_keyword(other))),
    }
}

fn statement_keyword(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or("This")
        .to_uppercase()
}

/// Validate and run `sql`, collecting every row
pub fn execute(conn: &Connection, sql: &str) -> Result<QueryResults> {
    validate_sql(sql)?;
    debug!(sql = %sql, "Executing query");

    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            cells.push(to_json(row.get_ref(i)?));
        }
        rows.push(cells);
    }

    debug!(rows = rows.len(), "Query complete");
    Ok(QueryResults { columns, rows })
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::String(format!("<{} byte blob>", blob.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE team_standings (\"Year\" INTEGER, \"Team\" TEXT, \"Wins\" INTEGER, \"WP\" REAL, \"GB\" REAL);
             INSERT INTO team_standings VALUES (2001, 'Seattle Mariners', 116, 0.716, NULL);
             INSERT INTO team_standings VALUES (2001, 'Oakland Athletics', 102, 0.630, 14.0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_validate_accepts_reads() {
        assert!(validate_sql("SELECT * FROM team_standings WHERE \"Year\" = 2001").is_ok());
        assert!(validate_sql("EXPLAIN SELECT 1").is_ok());
        assert!(validate_sql(
            "WITH w AS (SELECT \"Team\", AVG(\"Wins\") a FROM team_standings GROUP BY 1) SELECT * FROM w"
        )
        .is_ok());
    }

    #[test]
    fn test_validate_rejects_writes() {
        for sql in [
            "DELETE FROM team_standings",
            "DROP TABLE team_standings",
            "INSERT INTO team_standings VALUES (1, 'x', 1, 0.5, NULL)",
            "UPDATE team_standings SET \"Wins\" = 0",
        ] {
            assert!(matches!(validate_sql(sql), Err(CliError::ReadOnly(_))), "{}", sql);
        }

        match validate_sql("delete from team_standings") {
            Err(CliError::ReadOnly(keyword)) => assert_eq!(keyword, "DELETE"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_garbage_and_batches() {
        assert!(matches!(validate_sql("SELEC 1"), Err(CliError::InvalidSql(_))));
        assert!(matches!(validate_sql(""), Err(CliError::InvalidSql(_))));
        assert!(matches!(validate_sql("SELECT 1; SELECT 2"), Err(CliError::InvalidSql(_))));
    }

    #[test]
    fn test_execute_maps_sqlite_types() {
        let results = execute(
            &conn(),
            "SELECT \"Team\", \"Wins\", \"WP\", \"GB\" FROM team_standings ORDER BY \"Wins\" DESC",
        )
        .unwrap();

        assert_eq!(results.columns, vec!["Team", "Wins", "WP", "GB"]);
        assert_eq!(
            results.rows[0],
            vec![json!("Seattle Mariners"), json!(116), json!(0.716), Value::Null]
        );
        assert_eq!(results.rows[1][3], json!(14.0));
    }

    #[test]
    fn test_execute_unknown_table_is_sql_error() {
        let err = execute(&conn(), "SELECT * FROM nope").unwrap_err();
        assert!(matches!(err, CliError::Database(_)));
    }
}
