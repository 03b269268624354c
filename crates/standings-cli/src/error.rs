//! Error types for the standings CLI
//!
//! Messages are user-facing: they say what went wrong and, where there is
//! one, what to run next.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Database file is missing
    #[error("Database not found: '{0}'. Run 'standings-ingest run' to create it or pass --db.")]
    DatabaseNotFound(String),

    #[error("Table '{0}' does not exist. Use 'standings tables' to list tables.")]
    TableNotFound(String),

    /// Statement failed to parse
    #[error("Invalid SQL syntax: {0}")]
    InvalidSql(String),

    /// Statement parsed but would modify the database
    #[error("{0} statements are not allowed; the query tool is read-only")]
    ReadOnly(String),

    #[error("SQL error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No standings data: {0}")]
    NoData(String),

    #[error("Configuration error: {0}. Check your STANDINGS_* environment variables.")]
    Config(String),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Ingest(#[from] standings_ingest::IngestError),

    #[error(transparent)]
    Common(#[from] standings_common::StandingsError),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_sql(msg: impl Into<String>) -> Self {
        Self::InvalidSql(msg.into())
    }
}
