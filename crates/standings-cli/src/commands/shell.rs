//! `standings shell`: interactive query loop
//!
//! Dot commands:
//!
//! | command                 | effect                                  |
//! |-------------------------|-----------------------------------------|
//! | `.tables`               | list tables                             |
//! | `.schema <table>`       | describe a table                        |
//! | `.report [from] [to]`   | standings report for a year range       |
//! | `.mode <format>`        | table, csv, tsv or json query output    |
//! | `.reload`               | forget memoized report data             |
//! | `.help`                 | this list                               |
//! | `exit` `quit` `.exit` `.quit` | leave                             |
//!
//! Anything else is run as a read-only SQL statement. A failing line prints
//! its error and the loop continues.

use super::query;
use super::report::{self, ReportFilter, ReportSource};
use super::schema::{describe, render_tables};
use crate::cache::StandingsCache;
use crate::config::CliConfig;
use crate::db::{list_tables, open_read_only};
use crate::error::{CliError, Result};
use crate::output::{render, OutputFormat};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use tracing::debug;

const PROMPT: &str = "standings> ";

const HELP: &str = "\
.tables                 list tables
.schema <table>         describe a table
.report [from] [to]     standings report
.mode <format>          table, csv, tsv or json
.reload                 forget memoized report data
exit | quit             leave
Anything else is run as SQL.
";

enum Control {
    Continue,
    Exit,
}

pub struct Shell<'a> {
    conn: Connection,
    config: &'a CliConfig,
    source: ReportSource,
    format: OutputFormat,
    cache: StandingsCache,
}

impl<'a> Shell<'a> {
    pub fn open(config: &'a CliConfig, source: ReportSource) -> Result<Self> {
        let conn = open_read_only(config.database_path())?;
        Ok(Self {
            conn,
            config,
            source,
            format: OutputFormat::Table,
            cache: StandingsCache::new(),
        })
    }

    pub fn cache(&self) -> &StandingsCache {
        &self.cache
    }

    /// Read lines from `input` until EOF or an exit command
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        write!(out, "{}", render_tables(&list_tables(&self.conn)?))?;
        writeln!(out, "Enter SQL, .tables, .schema <table>, .report, .help or exit")?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.handle_line(line) {
                Ok((Control::Exit, _)) => break,
                Ok((Control::Continue, text)) => write!(out, "{}", text)?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            }
        }

        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<(Control, String)> {
        debug!(line, "Shell input");

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        let text = match command.as_str() {
            "exit" | "quit" | ".exit" | ".quit" => return Ok((Control::Exit, String::new())),
            ".help" => HELP.to_string(),
            ".tables" => render_tables(&list_tables(&self.conn)?),
            ".schema" => match args.as_slice() {
                [table] => describe(&self.conn, table)?,
                _ => "Usage: .schema <table>\n".to_string(),
            },
            ".mode" => match args.as_slice() {
                [format] => {
                    self.format = format.parse()?;
                    format!("Output mode set to {}\n", format.to_lowercase())
                },
                _ => "Usage: .mode table|csv|tsv|json\n".to_string(),
            },
            ".reload" => {
                self.cache.invalidate();
                "Report data will be reloaded.\n".to_string()
            },
            ".report" => self.report(&args)?,
            _ if command.starts_with('.') => {
                format!("Unknown command '{}'. Try .help\n", command)
            },
            _ => {
                let results = query::execute(&self.conn, line)?;
                render(&results, self.format, false)?
            },
        };

        Ok((Control::Continue, text))
    }

    fn report(&mut self, args: &[&str]) -> Result<String> {
        let year = |s: &str| -> Result<i32> {
            s.parse()
                .map_err(|_| CliError::config(format!("'{}' is not a year", s)))
        };

        let filter = match args {
            [] => ReportFilter::default(),
            [from] => ReportFilter {
                from: Some(year(from)?),
                ..Default::default()
            },
            [from, to] => ReportFilter {
                from: Some(year(from)?),
                to: Some(year(to)?),
                ..Default::default()
            },
            _ => return Ok("Usage: .report [from] [to]\n".to_string()),
        };

        let records = report::load_records(self.config, self.source, &mut self.cache)?;
        let built = report::build_report(&records, &filter)?;
        Ok(report::render_report(&built))
    }
}
