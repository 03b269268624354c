//! Standings Ingest - scrape AL standings into SQLite

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use standings_common::logging::{init_logging, LogConfig, LogLevel};
use standings_common::YearRange;
use standings_ingest::pipeline::{import_csv, write_scraped_csv, StandingsPipeline};
use standings_ingest::{ExtractionStrategy, IngestConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "standings-ingest")]
#[command(author, version, about = "American League standings ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    overrides: Overrides,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape, write the CSV, and replace the table
    Run,

    /// Scrape and write the CSV only
    Scrape,

    /// Load an existing CSV into the table
    Import,
}

/// Flags that override `STANDINGS_*` settings
#[derive(Args, Debug, Default)]
struct Overrides {
    /// First season to keep
    #[arg(long, global = true)]
    from_year: Option<i32>,

    /// Last season to keep
    #[arg(long, global = true)]
    to_year: Option<i32>,

    /// Keep only the first N seasons from the index (0 = all)
    #[arg(long, global = true)]
    max_seasons: Option<usize>,

    /// Table locator: boxed-table or roster-rows
    #[arg(long, global = true)]
    strategy: Option<ExtractionStrategy>,

    /// Intermediate CSV path
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Destination table
    #[arg(long, global = true)]
    table: Option<String>,

    /// Season index page
    #[arg(long, global = true)]
    index_url: Option<String>,

    /// Milliseconds to wait between season fetches
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Hide the progress bar
    #[arg(long, global = true)]
    no_progress: bool,
}

impl Overrides {
    fn apply(self, mut config: IngestConfig) -> Result<IngestConfig> {
        if self.from_year.is_some() || self.to_year.is_some() {
            let start = self.from_year.unwrap_or(config.years.start);
            let end = self.to_year.unwrap_or(config.years.end);
            config.years = YearRange::new(start, end)?;
        }
        if let Some(max) = self.max_seasons {
            config.max_seasons = (max > 0).then_some(max);
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(csv) = self.csv {
            config.csv_path = Some(csv);
        }
        if let Some(db) = self.db {
            config.database_path = db;
        }
        if let Some(table) = self.table {
            config.table_name = table;
        }
        if let Some(url) = self.index_url {
            config.index_url = url;
        }
        if let Some(delay) = self.delay_ms {
            config.request_delay_ms = delay;
        }
        if self.no_progress {
            config.show_progress = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("standings-ingest")
        .filter_directives("html5ever=warn,selectors=warn")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let config = cli
        .overrides
        .apply(IngestConfig::from_env()?)
        .context("Invalid ingest configuration")?;

    match cli.command {
        Command::Run => {
            info!(years = %config.years, strategy = %config.strategy, "Starting standings run");
            let pipeline = StandingsPipeline::with_http(config)?;
            let stats = pipeline.run().await?;

            println!(
                "Scraped {} of {} seasons ({} failed, {} empty); loaded {} rows into '{}'",
                stats.scrape.seasons_scraped,
                stats.scrape.seasons_discovered,
                stats.scrape.seasons_failed,
                stats.scrape.seasons_empty,
                stats.rows_loaded(),
                stats.import.table,
            );
        },
        Command::Scrape => {
            let csv_path = config
                .csv_path
                .clone()
                .context("scrape needs a CSV path (--csv or STANDINGS_CSV)")?;

            let pipeline = StandingsPipeline::with_http(config)?;
            let outcome = pipeline.scrape().await?;
            match write_scraped_csv(&csv_path, &outcome.records)? {
                Some(written) => println!("Wrote {} rows to {}", written, csv_path.display()),
                None => println!("No data collected; {} left unchanged", csv_path.display()),
            }
        },
        Command::Import => {
            let stats = import_csv(&config)?;
            println!(
                "Imported {} of {} rows into '{}' in '{}'",
                stats.rows_loaded,
                stats.rows_read,
                stats.table,
                config.database_path.display()
            );
        },
    }

    info!("Ingestion complete");
    Ok(())
}
