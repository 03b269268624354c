//! Error types shared by the standings crates

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, StandingsError>;

/// Main error type for shared types and utilities
#[derive(Error, Debug)]
pub enum StandingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid year range: {0}")]
    InvalidYearRange(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
