//! Configuration for the standings CLI
//!
//! Values come from `.env` / `STANDINGS_*` variables and can be overridden by
//! command-line flags.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use standings_ingest::config::{DEFAULT_CSV_PATH, DEFAULT_DATABASE_PATH, DEFAULT_TABLE_NAME};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// SQLite database with the standings table
    pub database_path: PathBuf,

    /// Standings table read by `report`
    pub table_name: String,

    /// Raw standings CSV read by `report --source csv`
    pub csv_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

impl CliConfig {
    /// Load `.env`, then `STANDINGS_DB`, `STANDINGS_TABLE` and `STANDINGS_CSV`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(db) = std::env::var("STANDINGS_DB") {
            config.database_path = PathBuf::from(db);
        }

        if let Ok(table) = std::env::var("STANDINGS_TABLE") {
            config.table_name = table;
        }

        if let Ok(csv) = std::env::var("STANDINGS_CSV") {
            config.csv_path = PathBuf::from(csv);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        db: Option<PathBuf>,
        table: Option<String>,
        csv: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(db) = db {
            self.database_path = db;
        }
        if let Some(table) = table {
            self.table_name = table;
        }
        if let Some(csv) = csv {
            self.csv_path = csv;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(CliError::config("Table name cannot be empty"));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(CliError::config("Database path cannot be empty"));
        }
        Ok(())
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.database_path, PathBuf::from("mlb_history.db"));
        assert_eq!(config.table_name, "team_standings");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::default()
            .with_overrides(Some(PathBuf::from("other.db")), None, Some(PathBuf::from("x.csv")))
            .unwrap();
        assert_eq!(config.database_path(), Path::new("other.db"));
        assert_eq!(config.table_name, "team_standings");
        assert_eq!(config.csv_path, PathBuf::from("x.csv"));

        let empty = CliConfig::default().with_overrides(None, Some(" ".to_string()), None);
        assert!(empty.is_err());
    }
}
