// Standings table extraction
//
// Season pages can hold several tables (both leagues, postseason, leaders).
// The standings table for a season is the one that links to that season's
// team rosters (`roster.php?y=<year>`). Finding it is the job of a
// `TableLocator`; the markup changed across years, so two locators exist and
// the strategy is picked by configuration:
//
// - boxed-table: the `div.ba-table` region holding the roster links, then its
//   `table.boxed` body rows after two header rows
// - roster-rows: every `tr` with a direct `td > a` roster link
//
// Both hand back rows that already have exactly six `td.datacolBox` cells:
// team, wins, losses, win%, games behind, payroll.

pub mod boxed_table;
pub mod roster_row;

pub use boxed_table::BoxedTableLocator;
pub use roster_row::RosterRowLocator;

use crate::fetch::Document;
use crate::html::visible_text;
use crate::{IngestError, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use standings_common::RawStandingsRecord;
use tracing::{debug, warn};

/// Cells per accepted standings row
pub const EXPECTED_CELLS: usize = 6;

/// Header rows at the top of a boxed standings table
pub const HEADER_ROWS: usize = 2;

pub const DATA_CELL_SELECTOR: &str = "td.datacolBox";

/// href fragment of the roster links that mark a season's standings rows
pub fn roster_link_fragment(season: i32) -> String {
    format!("roster.php?y={}", season)
}

/// Rows a locator accepted, plus how many candidates it rejected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedRows {
    pub rows: Vec<Vec<String>>,
    pub dropped: usize,
}

impl LocatedRows {
    /// Validate candidate rows by their data-cell count
    pub fn from_candidates<'a>(
        candidates: impl IntoIterator<Item = ElementRef<'a>>,
        cells: &Selector,
    ) -> Self {
        let mut located = LocatedRows::default();

        for row in candidates {
            let texts: Vec<String> = row.select(cells).map(visible_text).collect();
            if texts.len() == EXPECTED_CELLS {
                located.rows.push(texts);
            } else {
                debug!(cells = texts.len(), expected = EXPECTED_CELLS, "Dropping malformed row");
                located.dropped += 1;
            }
        }

        located
    }
}

/// Finds the standings rows for one season on a parsed page
pub trait TableLocator: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the page has no standings region for `season`
    fn locate(&self, document: &Html, season: i32) -> Result<Option<LocatedRows>>;
}

/// Which locator the extractor uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    #[default]
    BoxedTable,
    RosterRows,
}

impl ExtractionStrategy {
    pub fn locator(self) -> Result<Box<dyn TableLocator>> {
        Ok(match self {
            ExtractionStrategy::BoxedTable => Box::new(BoxedTableLocator::new()?),
            ExtractionStrategy::RosterRows => Box::new(RosterRowLocator::new()?),
        })
    }
}

impl std::str::FromStr for ExtractionStrategy {
    type Err = IngestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "boxed-table" | "boxed" => Ok(ExtractionStrategy::BoxedTable),
            "roster-rows" | "roster" => Ok(ExtractionStrategy::RosterRows),
            _ => Err(IngestError::Config(format!(
                "Unknown extraction strategy '{}'. Use boxed-table or roster-rows",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::BoxedTable => f.write_str("boxed-table"),
            ExtractionStrategy::RosterRows => f.write_str("roster-rows"),
        }
    }
}

/// Turns a season page into raw standings records
pub struct StandingsExtractor {
    locator: Box<dyn TableLocator>,
}

impl StandingsExtractor {
    pub fn new(locator: Box<dyn TableLocator>) -> Self {
        Self { locator }
    }

    pub fn for_strategy(strategy: ExtractionStrategy) -> Result<Self> {
        Ok(Self::new(strategy.locator()?))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.locator.name()
    }

    /// Extract every well-formed team row for `season`
    ///
    /// A page without a standings region, or with an unreadable one, yields
    /// an empty list and a warning; it is never an error for the run.
    pub fn extract(&self, document: &Document, season: i32) -> Vec<RawStandingsRecord> {
        let html = document.parse();

        let located = match self.locator.locate(&html, season) {
            Ok(Some(located)) => located,
            Ok(None) => {
                warn!(
                    season,
                    strategy = self.locator.name(),
                    url = document.url(),
                    "No standings table for season"
                );
                return Vec::new();
            },
            Err(e) => {
                warn!(season, error = %e, url = document.url(), "Failed to read standings table");
                return Vec::new();
            },
        };

        if located.dropped > 0 {
            debug!(season, dropped = located.dropped, "Dropped malformed standings rows");
        }

        let records: Vec<RawStandingsRecord> = located
            .rows
            .into_iter()
            .filter_map(|cells| raw_record(season, cells))
            .collect();

        if records.is_empty() {
            warn!(season, "Standings table had no valid rows");
        }

        records
    }
}

fn raw_record(season: i32, cells: Vec<String>) -> Option<RawStandingsRecord> {
    let [team, wins, losses, wp, gb, payroll]: [String; EXPECTED_CELLS] = cells.try_into().ok()?;
    Some(RawStandingsRecord {
        year: season,
        team,
        wins,
        losses,
        wp,
        gb,
        payroll,
    })
}
