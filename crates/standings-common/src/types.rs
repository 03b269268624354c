//! Domain types shared across the ingestion pipeline and the query tools

use crate::error::{Result, StandingsError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Season Discovery
// ============================================================================

/// Inclusive range of seasons to ingest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(StandingsError::InvalidYearRange(format!(
                "start year {} is after end year {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Number of seasons covered by the range
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: 2000,
            end: 2025,
        }
    }
}

impl std::str::FromStr for YearRange {
    type Err = StandingsError;

    /// Accepts `2000-2025` or a single year such as `2010`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse_year = |part: &str| -> Result<i32> {
            part.trim()
                .parse::<i32>()
                .map_err(|e| StandingsError::InvalidYearRange(format!("'{}': {}", s, e)))
        };

        match s.split_once('-') {
            Some((start, end)) => Self::new(parse_year(start)?, parse_year(end)?),
            None => {
                let year = parse_year(s)?;
                Self::new(year, year)
            },
        }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A season found on the index page together with its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonLink {
    /// Anchor text the season was discovered from (e.g., "2001")
    pub year_label: String,

    /// Numeric season, always inside the configured range
    pub year: i32,

    /// Absolute URL of the season's standings page
    pub url: String,
}

// ============================================================================
// Standings Records
// ============================================================================

/// One team row as read off a standings table, every cell still text
///
/// Field names serialize to the column headers of the intermediate CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStandingsRecord {
    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Team")]
    pub team: String,

    #[serde(rename = "Wins")]
    pub wins: String,

    #[serde(rename = "Losses")]
    pub losses: String,

    #[serde(rename = "WP")]
    pub wp: String,

    #[serde(rename = "GB")]
    pub gb: String,

    /// Reported payroll; carried through extraction only
    #[serde(rename = "Payroll")]
    pub payroll: String,
}

/// A team season after field coercion
///
/// `wp` is `None` when the source did not report a usable win fraction and
/// `gb` is `None` when the team was tied for the lead or the cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStandingsRecord {
    pub year: i32,
    pub team: String,
    pub wins: i64,
    pub losses: i64,
    pub wp: Option<f64>,
    pub gb: Option<f64>,
}
