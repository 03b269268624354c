//! Standings CLI Library
//!
//! Query and reporting tools over the standings database built by
//! `standings-ingest`.
//!
//! # Overview
//!
//! - **Query**: run one read-only SQL statement (`standings query`)
//! - **Catalog**: list tables and describe columns (`standings tables`, `standings schema`)
//! - **Shell**: interactive SQL loop with dot commands (`standings shell`)
//! - **Report**: wins and losses summaries by season and team (`standings report`)

pub mod cache;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use cache::StandingsCache;
pub use config::CliConfig;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use commands::report::ReportSource;
use output::OutputFormat;
use std::path::PathBuf;

/// Standings - query and report on AL team standings
#[derive(Parser, Debug)]
#[command(name = "standings")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// SQLite database (overrides STANDINGS_DB)
    #[arg(short, long, global = true)]
    pub db: Option<PathBuf>,

    /// Standings table (overrides STANDINGS_TABLE)
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Raw standings CSV (overrides STANDINGS_CSV)
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a read-only SQL statement
    Query {
        /// SQL text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        sql: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Omit the header row (csv, tsv)
        #[arg(long)]
        no_header: bool,
    },

    /// List tables
    Tables,

    /// Describe a table's columns
    Schema {
        /// Table name
        table: String,
    },

    /// Interactive SQL shell
    Shell {
        /// Data behind `.report`
        #[arg(long, value_enum, default_value_t = ReportSource::Db)]
        source: ReportSource,
    },

    /// Standings report: wins over time, average wins, final-year losses
    Report {
        /// First season (default: earliest available)
        #[arg(long)]
        from: Option<i32>,

        /// Last season (default: latest available)
        #[arg(long)]
        to: Option<i32>,

        /// Team to include; repeat for several (default: first 5 alphabetically)
        #[arg(long = "team")]
        teams: Vec<String>,

        /// Read records from the database table or the raw CSV
        #[arg(long, value_enum, default_value_t = ReportSource::Db)]
        source: ReportSource,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
