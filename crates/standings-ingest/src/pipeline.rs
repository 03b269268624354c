//! End-to-end standings pipeline
//!
//! ```text
//! index page ─► season links ─► (per season, in order)
//!                                 fetch ─► extract ─► raw rows
//!                                                        │
//!                         CSV (optional) ◄───────────────┤
//!                                                        ▼
//!                                  normalize ─► infer ─► load (swap)
//! ```
//!
//! Per-season failures are logged and counted; they never end the run. The
//! index fetch and the load are the two places where an error is returned.

use crate::config::IngestConfig;
use crate::csv_io;
use crate::extract::StandingsExtractor;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::load::{open_database, Loader};
use crate::normalize::normalize_all;
use crate::schema::{self, ColumnarTable};
use crate::season_index::SeasonIndexResolver;
use crate::{IngestError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use standings_common::{RawStandingsRecord, SeasonLink};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters for one scrape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeStats {
    pub seasons_discovered: usize,
    pub seasons_scraped: usize,
    pub seasons_failed: usize,
    /// Fetched fine but had no usable standings rows
    pub seasons_empty: usize,
    pub rows_extracted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub records: Vec<RawStandingsRecord>,
    pub stats: ScrapeStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub table: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub scrape: ScrapeStats,
    pub csv_rows: Option<usize>,
    pub import: ImportStats,
}

impl PipelineStats {
    pub fn rows_loaded(&self) -> usize {
        self.import.rows_loaded
    }
}

pub struct StandingsPipeline<F: PageFetcher> {
    config: IngestConfig,
    fetcher: F,
    resolver: SeasonIndexResolver,
    extractor: StandingsExtractor,
}

impl StandingsPipeline<HttpFetcher> {
    /// Pipeline over live HTTP
    pub fn with_http(config: IngestConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Self::new(config, fetcher)
    }
}

impl<F: PageFetcher> StandingsPipeline<F> {
    pub fn new(config: IngestConfig, fetcher: F) -> Result<Self> {
        config.validate()?;

        let resolver = SeasonIndexResolver::from_config(&config);
        let extractor = StandingsExtractor::for_strategy(config.strategy)?;

        Ok(Self {
            config,
            fetcher,
            resolver,
            extractor,
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Resolve the season links, truncated to `max_seasons`
    ///
    /// Without the index there is nothing to do, so its fetch error is returned.
    pub async fn discover_seasons(&self) -> Result<Vec<SeasonLink>> {
        info!(url = %self.config.index_url, "Fetching season index");
        let index = self.fetcher.fetch(&self.config.index_url).await?;

        let mut seasons = self.resolver.resolve(&index)?;
        if let Some(max) = self.config.max_seasons {
            if seasons.len() > max {
                debug!(found = seasons.len(), max, "Truncating season list");
                seasons.truncate(max);
            }
        }

        Ok(seasons)
    }

    pub async fn scrape_season(&self, season: &SeasonLink) -> Result<Vec<RawStandingsRecord>> {
        let document = self.fetcher.fetch(&season.url).await?;
        Ok(self.extractor.extract(&document, season.year))
    }

    /// Fetch and extract every discovered season, one at a time
    pub async fn scrape(&self) -> Result<ScrapeOutcome> {
        let seasons = self.discover_seasons().await?;

        let mut outcome = ScrapeOutcome::default();
        outcome.stats.seasons_discovered = seasons.len();

        let progress = self.progress_bar(seasons.len() as u64)?;
        let delay = Duration::from_millis(self.config.request_delay_ms);

        for (i, season) in seasons.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            progress.set_message(format!("Season {}", season.year_label));

            match self.scrape_season(season).await {
                Ok(records) if records.is_empty() => {
                    outcome.stats.seasons_empty += 1;
                },
                Ok(records) => {
                    debug!(season = season.year, rows = records.len(), "Extracted season");
                    outcome.stats.seasons_scraped += 1;
                    outcome.stats.rows_extracted += records.len();
                    outcome.records.extend(records);
                },
                Err(e) => {
                    warn!(season = season.year, url = %season.url, error = %e, "Season fetch failed");
                    outcome.stats.seasons_failed += 1;
                },
            }

            progress.inc(1);
        }

        progress.finish_and_clear();

        info!(
            seasons = outcome.stats.seasons_discovered,
            scraped = outcome.stats.seasons_scraped,
            failed = outcome.stats.seasons_failed,
            empty = outcome.stats.seasons_empty,
            rows = outcome.stats.rows_extracted,
            "Scrape finished"
        );

        Ok(outcome)
    }

    /// Scrape, write the CSV when one is configured, then replace the table
    pub async fn run(&self) -> Result<PipelineStats> {
        let outcome = self.scrape().await?;

        let csv_rows = match &self.config.csv_path {
            Some(path) => write_scraped_csv(path, &outcome.records)?,
            None => None,
        };

        let import = import_records(&self.config, &outcome.records)?;

        Ok(PipelineStats {
            scrape: outcome.stats,
            csv_rows,
            import,
        })
    }

    fn progress_bar(&self, total: u64) -> Result<ProgressBar> {
        if !self.config.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
                .map_err(|e| IngestError::Config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );
        Ok(pb)
    }
}

/// Write scraped rows to `path`, or leave an existing file alone when the
/// scrape produced nothing
///
/// Returns the rows written, `None` when the write was skipped.
pub fn write_scraped_csv(path: &Path, records: &[RawStandingsRecord]) -> Result<Option<usize>> {
    if records.is_empty() {
        warn!(path = %path.display(), "No data collected; keeping existing CSV");
        return Ok(None);
    }

    let written = csv_io::write_raw_csv(path, records)?;
    info!(path = %path.display(), rows = written, "Wrote standings CSV");
    Ok(Some(written))
}

/// Normalize `raw` and replace the configured table with it
///
/// An empty input leaves the existing table alone.
pub fn import_records(config: &IngestConfig, raw: &[RawStandingsRecord]) -> Result<ImportStats> {
    let mut stats = ImportStats {
        rows_read: raw.len(),
        rows_loaded: 0,
        table: config.table_name.clone(),
    };

    if raw.is_empty() {
        warn!(table = %config.table_name, "No standings rows; leaving table unchanged");
        return Ok(stats);
    }

    let records = normalize_all(raw);
    let table = ColumnarTable::from_standings(&records);
    let schema = schema::infer(&table);

    for column in &schema {
        debug!(column = %column.name, sql_type = %column.column_type, "Inferred column type");
    }

    let mut conn = open_database(&config.database_path)?;
    stats.rows_loaded = Loader::new(&mut conn).load(&config.table_name, &table, &schema)?;

    info!(
        table = %config.table_name,
        db = %config.database_path.display(),
        rows = stats.rows_loaded,
        "Imported standings"
    );

    Ok(stats)
}

/// Read the configured CSV and import it
pub fn import_csv(config: &IngestConfig) -> Result<ImportStats> {
    let path = config
        .csv_path
        .as_ref()
        .ok_or_else(|| IngestError::Config("No CSV path configured".to_string()))?;

    let raw = csv_io::read_raw_csv(path)?;
    import_records(config, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Document;
    use crate::load::read_standings;
    use async_trait::async_trait;
    use std::collections::HashMap;

    const INDEX: &str = "https://almanac.test/yearmenu.shtml";

    enum StubPage {
        Body(String),
        Timeout,
    }

    struct StubFetcher {
        pages: HashMap<String, StubPage>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Document> {
            match self.pages.get(url) {
                Some(StubPage::Body(body)) => Ok(Document::new(url, body.clone())),
                Some(StubPage::Timeout) => Err(IngestError::Timeout {
                    url: url.to_string(),
                    secs: 30,
                }),
                None => Err(IngestError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn season_url(year: i32) -> String {
        format!("https://almanac.test/yearly/yr{}a.shtml", year)
    }

    fn index_page(years: &[i32]) -> String {
        let links: String = years
            .iter()
            .map(|y| format!("<a href=\"yearly/yr{}a.shtml\">{}</a>\n", y, y))
            .collect();
        format!("<html><body>{}</body></html>", links)
    }

    fn row(year: i32, cells: &[&str]) -> String {
        let tds: String = cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == 0 {
                    format!(
                        "<td class=\"datacolBox\"><a href=\"../teams/roster.php?y={}\">{}</a></td>",
                        year, c
                    )
                } else {
                    format!("<td class=\"datacolBox\">{}</td>", c)
                }
            })
            .collect();
        format!("<tr>{}</tr>", tds)
    }

    fn season_page(year: i32, rows: &[&[&str]]) -> String {
        let body: String = rows.iter().map(|cells| row(year, cells)).collect();
        format!(
            "<html><body><div class=\"ba-table\"><table class=\"boxed\"><tbody>\
             <tr><td>{} American League</td></tr><tr><td>Team</td></tr>{}\
             </tbody></table></div></body></html>",
            year, body
        )
    }

    fn config(dir: &std::path::Path) -> IngestConfig {
        IngestConfig::builder()
            .index_url(INDEX)
            .request_delay_ms(0)
            .show_progress(false)
            .csv_path(Some(dir.join("standings.csv")))
            .database_path(dir.join("mlb_history.db"))
            .build()
    }

    fn fetcher(pages: Vec<(String, StubPage)>) -> StubFetcher {
        StubFetcher {
            pages: pages.into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_timed_out_season_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let stub = fetcher(vec![
            (INDEX.to_string(), StubPage::Body(index_page(&[2010, 2011]))),
            (season_url(2010), StubPage::Timeout),
            (
                season_url(2011),
                StubPage::Body(season_page(
                    2011,
                    &[
                        &["New York Yankees", "97", "65", ".599", "-", "$202,689,028"],
                        &["Tampa Bay Rays", "91", "71", ".562", "6", "$41,053,571"],
                    ],
                )),
            ),
        ]);

        let pipeline = StandingsPipeline::new(config(dir.path()), stub).unwrap();
        let outcome = pipeline.scrape().await.unwrap();

        assert_eq!(outcome.stats.seasons_discovered, 2);
        assert_eq!(outcome.stats.seasons_failed, 1);
        assert_eq!(outcome.stats.seasons_scraped, 1);
        assert!(outcome.records.iter().all(|r| r.year == 2011));
        assert_eq!(outcome.records.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_row_dropped_rest_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let stub = fetcher(vec![
            (INDEX.to_string(), StubPage::Body(index_page(&[2001]))),
            (
                season_url(2001),
                StubPage::Body(season_page(
                    2001,
                    &[
                        &["New York Yankees", "95", "65", ".594", "-", "$112,287,143"],
                        &["Boston Red Sox", "82", "79", ".509"],
                        &["Toronto Blue Jays", "80", "82", ".494", "16", "$76,895,999"],
                    ],
                )),
            ),
        ]);

        let config = config(dir.path());
        let pipeline = StandingsPipeline::new(config.clone(), stub).unwrap();
        let stats = pipeline.run().await.unwrap();

        assert_eq!(stats.rows_loaded(), 2);
        assert_eq!(stats.csv_rows, Some(2));

        let conn = rusqlite::Connection::open(&config.database_path).unwrap();
        let loaded = read_standings(&conn, "team_standings").unwrap();
        let teams: Vec<&str> = loaded.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["New York Yankees", "Toronto Blue Jays"]);
        assert_eq!(loaded[0].gb, None);
        assert_eq!(loaded[1].gb, Some(16.0));
    }

    #[tokio::test]
    async fn test_index_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let stub = fetcher(vec![(INDEX.to_string(), StubPage::Timeout)]);

        let pipeline = StandingsPipeline::new(config(dir.path()), stub).unwrap();
        let err = pipeline.run().await.unwrap_err();
        assert!(err.is_fetch());
        assert!(!dir.path().join("mlb_history.db").exists());
    }

    #[tokio::test]
    async fn test_max_seasons_keeps_first_links() {
        let dir = tempfile::tempdir().unwrap();
        let stub = fetcher(vec![(
            INDEX.to_string(),
            StubPage::Body(index_page(&[2003, 2001, 2002])),
        )]);

        let config = IngestConfig::builder()
            .index_url(INDEX)
            .max_seasons(Some(2))
            .database_path(dir.path().join("db.sqlite"))
            .build();
        let pipeline = StandingsPipeline::new(config, stub).unwrap();

        let years: Vec<i32> = pipeline
            .discover_seasons()
            .await
            .unwrap()
            .iter()
            .map(|s| s.year)
            .collect();
        assert_eq!(years, vec![2003, 2001]);
    }

    #[tokio::test]
    async fn test_empty_scrape_keeps_existing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let csv_path = dir.path().join("standings.csv");
        let previous = "Year,Team,Wins,Losses,WP,GB,Payroll\n\
                        2001,New York Yankees,95,65,.594,-,\"$112,287,143\"\n";
        std::fs::write(&csv_path, previous).unwrap();

        let stub = fetcher(vec![
            (INDEX.to_string(), StubPage::Body(index_page(&[2001]))),
            (
                season_url(2001),
                StubPage::Body("<html><body><p>Page moved</p></body></html>".to_string()),
            ),
        ]);

        let pipeline = StandingsPipeline::new(config.clone(), stub).unwrap();
        let stats = pipeline.run().await.unwrap();

        assert_eq!(stats.scrape.seasons_empty, 1);
        assert_eq!(stats.csv_rows, None);
        assert_eq!(stats.rows_loaded(), 0);
        assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), previous);
        assert!(!config.database_path.exists());
    }

    #[test]
    fn test_write_scraped_csv_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        assert_eq!(write_scraped_csv(&path, &[]).unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_import_leaves_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let stats = import_records(&config, &[]).unwrap();
        assert_eq!(stats.rows_loaded, 0);
        assert!(!config.database_path.exists());
    }

    #[test]
    fn test_import_csv_requires_path() {
        let config = IngestConfig::builder().csv_path(None).build();
        assert!(matches!(import_csv(&config), Err(IngestError::Config(_))));
    }
}
