//! Intermediate CSV of raw standings rows
//!
//! The scrape writes every extracted row, untouched, with the header
//! `Year,Team,Wins,Losses,WP,GB,Payroll`. Import reads it back; the year
//! column is text in the file and goes through [`parse_year`], so a row whose
//! year cannot be read is dropped with a warning.

use crate::normalize::parse_year;
use crate::Result;
use serde::Deserialize;
use standings_common::RawStandingsRecord;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const CSV_HEADERS: [&str; 7] = ["Year", "Team", "Wins", "Losses", "WP", "GB", "Payroll"];

/// Write `records` to `path`, replacing any existing file
pub fn write_raw_csv(path: &Path, records: &[RawStandingsRecord]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "Wrote standings CSV");
    Ok(records.len())
}

#[derive(Debug, Deserialize)]
struct CsvStandingsRow {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Wins")]
    wins: String,
    #[serde(rename = "Losses")]
    losses: String,
    #[serde(rename = "WP")]
    wp: String,
    #[serde(rename = "GB")]
    gb: String,
    #[serde(rename = "Payroll", default)]
    payroll: String,
}

pub fn read_raw_csv(path: &Path) -> Result<Vec<RawStandingsRecord>> {
    let file = std::fs::File::open(path)?;
    let records = read_raw_csv_from(file)?;
    info!(path = %path.display(), rows = records.len(), "Read standings CSV");
    Ok(records)
}

pub fn read_raw_csv_from<R: Read>(reader: R) -> Result<Vec<RawStandingsRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<CsvStandingsRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable CSV row");
                continue;
            },
        };

        let Some(year) = parse_year(&row.year) else {
            warn!(line, year = %row.year, "Skipping CSV row without a usable year");
            continue;
        };

        records.push(RawStandingsRecord {
            year,
            team: row.team,
            wins: row.wins,
            losses: row.losses,
            wp: row.wp,
            gb: row.gb,
            payroll: row.payroll,
        });
    }

    Ok(records)
}
