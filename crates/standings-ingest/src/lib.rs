//! Standings Ingest Library
//!
//! Scrapes season-by-season American League standings from a paginated
//! almanac site, coerces the inconsistent table text into typed records, and
//! replaces a SQLite table with the result.
//!
//! # Pipeline
//!
//! - **Fetch**: [`fetch::PageFetcher`] turns a URL into a [`fetch::Document`]
//! - **Discover**: [`season_index::SeasonIndexResolver`] lists season pages
//! - **Extract**: [`extract::StandingsExtractor`] reads raw per-team rows
//! - **Normalize**: [`normalize`] coerces each field with its own fallback
//! - **Infer**: [`schema::infer`] derives column types from the data
//! - **Load**: [`load::Loader`] swaps the destination table in one transaction
//!
//! Seasons are processed one at a time. A season that fails to fetch or
//! parse contributes no rows; only a load failure ends the run.
//!
//! # Example
//!
//! ```no_run
//! use standings_ingest::{config::IngestConfig, pipeline::StandingsPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::from_env()?;
//!     let pipeline = StandingsPipeline::with_http(config)?;
//!     let stats = pipeline.run().await?;
//!     println!("{} rows loaded", stats.rows_loaded());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod csv_io;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod load;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod season_index;

// Re-export main types
pub use config::IngestConfig;
pub use extract::{ExtractionStrategy, StandingsExtractor, TableLocator};
pub use fetch::{Document, HttpFetcher, PageFetcher};
pub use load::Loader;
pub use pipeline::{PipelineStats, StandingsPipeline};
pub use schema::{ColumnSchema, ColumnType, ColumnarTable};
pub use season_index::SeasonIndexResolver;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for standings ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetch of {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Load error: {0}")]
    Load(#[from] rusqlite::Error),

    #[error("Load error: {0}")]
    Schema(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] standings_common::StandingsError),
}

impl IngestError {
    /// Whether the error came from reaching a document (network, status, timeout)
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            IngestError::Fetch { .. } | IngestError::Timeout { .. } | IngestError::HttpStatus { .. }
        )
    }

    /// Whether the error came from persisting the destination table
    pub fn is_load(&self) -> bool {
        matches!(self, IngestError::Load(_) | IngestError::Schema(_))
    }
}
