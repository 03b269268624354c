// Standings ingestion configuration

use crate::extract::ExtractionStrategy;
use crate::{IngestError, Result};
use serde::{Deserialize, Serialize};
use standings_common::YearRange;
use std::path::PathBuf;

// ============================================================================
// Ingest Configuration Constants
// ============================================================================

/// Season index page of the almanac.
pub const DEFAULT_INDEX_URL: &str = "https://www.baseball-almanac.com/yearmenu.shtml";

/// Season pages link as `.../yr2001a.shtml`; the token is `yr` + year label.
pub const DEFAULT_SEASON_TOKEN_PREFIX: &str = "yr";

/// First 26 qualifying links are the American League pages for 2000-2025.
pub const DEFAULT_MAX_SEASONS: usize = 26;

/// Page load timeout in seconds.
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;

/// Connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Pause between season fetches in milliseconds.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; standings-ingest/0.1)";

pub const DEFAULT_CSV_PATH: &str = "american_league_team_standings_2000_2025.csv";

pub const DEFAULT_DATABASE_PATH: &str = "mlb_history.db";

pub const DEFAULT_TABLE_NAME: &str = "team_standings";

/// Configuration for a standings ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Page listing every season
    pub index_url: String,

    /// Seasons to keep from the index
    pub years: YearRange,

    /// Keep only the first N qualifying seasons (None = all)
    pub max_seasons: Option<usize>,

    /// Prefix of the season token expected in season page URLs
    pub season_token_prefix: String,

    /// How the standings table is located on a season page
    pub strategy: ExtractionStrategy,

    /// Whole-request timeout in seconds
    pub load_timeout_secs: u64,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Delay between consecutive season fetches
    pub request_delay_ms: u64,

    pub user_agent: String,

    /// Intermediate raw CSV (None = don't write one)
    pub csv_path: Option<PathBuf>,

    /// SQLite database holding the destination table
    pub database_path: PathBuf,

    /// Destination table, fully replaced on every load
    pub table_name: String,

    /// Draw a progress bar over seasons
    pub show_progress: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            index_url: DEFAULT_INDEX_URL.to_string(),
            years: YearRange::default(),
            max_seasons: Some(DEFAULT_MAX_SEASONS),
            season_token_prefix: DEFAULT_SEASON_TOKEN_PREFIX.to_string(),
            strategy: ExtractionStrategy::default(),
            load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            csv_path: Some(PathBuf::from(DEFAULT_CSV_PATH)),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            show_progress: true,
        }
    }
}

impl IngestConfig {
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Load configuration from `.env` and `STANDINGS_*` environment variables
    ///
    /// - `STANDINGS_INDEX_URL`
    /// - `STANDINGS_YEARS` (e.g. `2000-2025`)
    /// - `STANDINGS_MAX_SEASONS` (`0` disables the limit)
    /// - `STANDINGS_STRATEGY` (`boxed-table` or `roster-rows`)
    /// - `STANDINGS_LOAD_TIMEOUT`, `STANDINGS_CONNECT_TIMEOUT` (seconds)
    /// - `STANDINGS_REQUEST_DELAY_MS`
    /// - `STANDINGS_USER_AGENT`
    /// - `STANDINGS_CSV` (empty disables the CSV)
    /// - `STANDINGS_DB`, `STANDINGS_TABLE`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = std::env::var("STANDINGS_INDEX_URL") {
            config.index_url = url;
        }

        if let Ok(years) = std::env::var("STANDINGS_YEARS") {
            config.years = years.parse()?;
        }

        if let Some(max) = env_parse::<usize>("STANDINGS_MAX_SEASONS")? {
            config.max_seasons = (max > 0).then_some(max);
        }

        if let Ok(strategy) = std::env::var("STANDINGS_STRATEGY") {
            config.strategy = strategy.parse()?;
        }

        if let Some(secs) = env_parse("STANDINGS_LOAD_TIMEOUT")? {
            config.load_timeout_secs = secs;
        }

        if let Some(secs) = env_parse("STANDINGS_CONNECT_TIMEOUT")? {
            config.connect_timeout_secs = secs;
        }

        if let Some(delay) = env_parse("STANDINGS_REQUEST_DELAY_MS")? {
            config.request_delay_ms = delay;
        }

        if let Ok(agent) = std::env::var("STANDINGS_USER_AGENT") {
            config.user_agent = agent;
        }

        if let Ok(csv) = std::env::var("STANDINGS_CSV") {
            config.csv_path = (!csv.trim().is_empty()).then(|| PathBuf::from(csv));
        }

        if let Ok(db) = std::env::var("STANDINGS_DB") {
            config.database_path = PathBuf::from(db);
        }

        if let Ok(table) = std::env::var("STANDINGS_TABLE") {
            config.table_name = table;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.index_url.is_empty() {
            return Err(IngestError::Config("Index URL cannot be empty".to_string()));
        }

        url::Url::parse(&self.index_url).map_err(|e| {
            IngestError::Config(format!("Invalid index URL '{}': {}", self.index_url, e))
        })?;

        if self.years.is_empty() {
            return Err(IngestError::Config(format!("Empty year range {}", self.years)));
        }

        if self.season_token_prefix.is_empty() {
            return Err(IngestError::Config(
                "Season token prefix cannot be empty".to_string(),
            ));
        }

        if self.load_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(IngestError::Config("Timeouts must be greater than 0".to_string()));
        }

        if self.table_name.trim().is_empty() {
            return Err(IngestError::Config("Table name cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| IngestError::Config(format!("{}='{}': {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

/// Builder for IngestConfig
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    config: Option<IngestConfig>,
}

impl IngestConfigBuilder {
    fn config(&mut self) -> &mut IngestConfig {
        self.config.get_or_insert_with(IngestConfig::default)
    }

    pub fn index_url(mut self, url: impl Into<String>) -> Self {
        self.config().index_url = url.into();
        self
    }

    pub fn years(mut self, years: YearRange) -> Self {
        self.config().years = years;
        self
    }

    pub fn max_seasons(mut self, max: Option<usize>) -> Self {
        self.config().max_seasons = max;
        self
    }

    pub fn season_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config().season_token_prefix = prefix.into();
        self
    }

    pub fn strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.config().strategy = strategy;
        self
    }

    pub fn load_timeout_secs(mut self, secs: u64) -> Self {
        self.config().load_timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config().connect_timeout_secs = secs;
        self
    }

    pub fn request_delay_ms(mut self, delay: u64) -> Self {
        self.config().request_delay_ms = delay;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config().user_agent = agent.into();
        self
    }

    pub fn csv_path(mut self, path: Option<PathBuf>) -> Self {
        self.config().csv_path = path;
        self
    }

    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config().database_path = path.into();
        self
    }

    pub fn table_name(mut self, table: impl Into<String>) -> Self {
        self.config().table_name = table.into();
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.config().show_progress = show;
        self
    }

    pub fn build(mut self) -> IngestConfig {
        self.config.take().unwrap_or_default()
    }
}
