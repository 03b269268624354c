//! SQLite loading with whole-table replacement
//!
//! A load never leaves the destination half-written: the new rows go into a
//! staging table, and dropping the old table plus renaming the staging table
//! happen in the same transaction as the inserts.

use crate::schema::{ColumnSchema, ColumnarTable};
use crate::{IngestError, Result};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use standings_common::NormalizedStandingsRecord;
use std::path::Path;
use tracing::{debug, info};

/// Double-quote an SQL identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(table: &str, schema: &[ColumnSchema]) -> String {
    let columns: Vec<String> = schema
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.as_sql()))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), columns.join(", "))
}

fn staging_name(table: &str) -> String {
    format!("{}__staging", table)
}

pub struct Loader<'c> {
    conn: &'c mut Connection,
}

impl<'c> Loader<'c> {
    pub fn new(conn: &'c mut Connection) -> Self {
        Self { conn }
    }

    /// Replace `table_name` with the rows of `table`, returning rows written
    ///
    /// Any failure rolls back, leaving the previous table as it was.
    pub fn load(
        &mut self,
        table_name: &str,
        table: &ColumnarTable,
        schema: &[ColumnSchema],
    ) -> Result<usize> {
        if schema.len() != table.columns().len() {
            return Err(IngestError::Schema(format!(
                "schema has {} columns, table has {}",
                schema.len(),
                table.columns().len()
            )));
        }

        let staging = staging_name(table_name);
        let tx = self.conn.transaction()?;

        tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(&staging)), [])?;
        tx.execute(&create_table_sql(&staging, schema), [])?;

        let column_list: Vec<String> = schema.iter().map(|c| quote_ident(&c.name)).collect();
        let placeholders: Vec<String> = (1..=schema.len()).map(|i| format!("?{}", i)).collect();
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&staging),
            column_list.join(", "),
            placeholders.join(", ")
        );

        let mut written = 0;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for index in 0..table.len() {
                if let Some(row) = table.row(index) {
                    written += stmt.execute(params_from_iter(row))?;
                }
            }
        }

        tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table_name)), [])?;
        tx.execute(
            &format!(
                "ALTER TABLE {} RENAME TO {}",
                quote_ident(&staging),
                quote_ident(table_name)
            ),
            [],
        )?;

        tx.commit()?;

        info!(table = table_name, rows = written, "Replaced destination table");
        Ok(written)
    }
}

/// Open (creating if needed) the destination database
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), "Opening database");
    Ok(Connection::open(path)?)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Read a standings table back in insertion order
pub fn read_standings(conn: &Connection, table: &str) -> Result<Vec<NormalizedStandingsRecord>> {
    let sql = format!(
        "SELECT \"Year\", \"Team\", \"Wins\", \"Losses\", \"WP\", \"GB\" FROM {} ORDER BY rowid",
        quote_ident(table)
    );

    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map([], |row| {
            Ok(NormalizedStandingsRecord {
                year: row.get(0)?,
                team: row.get(1)?,
                wins: row.get(2)?,
                losses: row.get(3)?,
                wp: row.get(4)?,
                gb: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(records)
}
