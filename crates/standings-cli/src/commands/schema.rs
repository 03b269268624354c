//! `standings tables` and `standings schema` commands

use crate::config::CliConfig;
use crate::db::{list_tables, open_read_only, table_info, ColumnInfo};
use crate::error::Result;
use crate::output::new_table;
use colored::Colorize;
use rusqlite::Connection;

pub fn run_tables(config: &CliConfig) -> Result<()> {
    let conn = open_read_only(config.database_path())?;
    print!("{}", render_tables(&list_tables(&conn)?));
    Ok(())
}

pub fn run_schema(config: &CliConfig, table: &str) -> Result<()> {
    let conn = open_read_only(config.database_path())?;
    print!("{}", describe(&conn, table)?);
    Ok(())
}

pub fn render_tables(tables: &[String]) -> String {
    if tables.is_empty() {
        return "No tables found.\n".to_string();
    }

    let mut out = format!("{}\n", "Tables:".bold());
    for table in tables {
        out.push_str(&format!("  {}\n", table));
    }
    out
}

/// Schema listing for `table`, or a table-not-found error
pub fn describe(conn: &Connection, table: &str) -> Result<String> {
    let columns = table_info(conn, table)?;
    Ok(render_schema(table, &columns))
}

pub fn render_schema(table: &str, columns: &[ColumnInfo]) -> String {
    let mut grid = new_table();
    grid.set_header(vec!["cid", "name", "type", "notnull", "dflt_value", "pk"]);

    for column in columns {
        grid.add_row(vec![
            column.cid.to_string(),
            column.name.clone(),
            column.column_type.clone(),
            u8::from(column.not_null).to_string(),
            column.default_value.clone().unwrap_or_else(|| "NULL".to_string()),
            u8::from(column.primary_key).to_string(),
        ]);
    }

    format!("{} {}\n{}\n", "Schema for".bold(), table.cyan(), grid)
}
