//! `standings report` command implementation
//!
//! Text rendition of the standings dashboard. Records are filtered by an
//! inclusive year range (default: every season present) and a team subset
//! (default: the first five teams alphabetically within that range), then
//! summarized three ways:
//!
//! - wins per team per season
//! - average wins per team, highest first
//! - losses per team in the last season of the range

use crate::cache::{Records, StandingsCache};
use crate::config::CliConfig;
use crate::db::{open_read_only, table_info};
use crate::error::{CliError, Result};
use crate::output::new_table;
use colored::Colorize;
use serde::Serialize;
use standings_common::NormalizedStandingsRecord;
use standings_ingest::csv_io::read_raw_csv;
use standings_ingest::load::read_standings;
use standings_ingest::normalize::normalize_all;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Teams selected when none are named
pub const DEFAULT_TEAM_COUNT: usize = 5;

/// Where report records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportSource {
    /// The standings table
    #[default]
    Db,
    /// The raw standings CSV, normalized on load
    Csv,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonWins {
    pub year: i32,
    pub wins: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAverage {
    pub team: String,
    pub average_wins: f64,
    pub seasons: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamLosses {
    pub team: String,
    pub losses: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsReport {
    pub from: i32,
    pub to: i32,
    pub teams: Vec<String>,
    pub wins_over_time: Vec<SeasonWins>,
    pub average_wins: Vec<TeamAverage>,
    /// Empty when the last season has no rows for the selected teams
    pub final_year_losses: Vec<TeamLosses>,
}

/// Run the report command
pub fn run(
    config: &CliConfig,
    source: ReportSource,
    filter: &ReportFilter,
    json: bool,
    cache: &mut StandingsCache,
) -> Result<()> {
    info!(?source, "Running report command");

    let records = load_records(config, source, cache)?;
    let report = build_report(&records, filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

/// Load typed records; CSV loads are memoized by content fingerprint
pub fn load_records(
    config: &CliConfig,
    source: ReportSource,
    cache: &mut StandingsCache,
) -> Result<Records> {
    match source {
        ReportSource::Csv => cache.get_or_load(&config.csv_path, |path| {
            let raw = read_raw_csv(path)?;
            Ok(normalize_all(&raw))
        }),
        ReportSource::Db => {
            let conn = open_read_only(config.database_path())?;
            table_info(&conn, &config.table_name)?;
            Ok(Arc::new(read_standings(&conn, &config.table_name)?))
        },
    }
}

pub fn build_report(
    records: &[NormalizedStandingsRecord],
    filter: &ReportFilter,
) -> Result<StandingsReport> {
    let (Some(min_year), Some(max_year)) = (
        records.iter().map(|r| r.year).min(),
        records.iter().map(|r| r.year).max(),
    ) else {
        return Err(CliError::NoData("no standings records loaded".to_string()));
    };

    let from = filter.from.unwrap_or(min_year);
    let to = filter.to.unwrap_or(max_year);
    if from > to {
        return Err(CliError::config(format!(
            "Report range {}-{} ends before it starts",
            from, to
        )));
    }

    let in_range: Vec<&NormalizedStandingsRecord> =
        records.iter().filter(|r| (from..=to).contains(&r.year)).collect();

    let teams: Vec<String> = if filter.teams.is_empty() {
        in_range
            .iter()
            .map(|r| r.team.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .take(DEFAULT_TEAM_COUNT)
            .collect()
    } else {
        let mut seen = BTreeSet::new();
        filter
            .teams
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    };
    debug!(from, to, teams = ?teams, "Report filter resolved");

    let selected: Vec<&NormalizedStandingsRecord> = in_range
        .into_iter()
        .filter(|r| teams.contains(&r.team))
        .collect();

    let mut by_year: BTreeMap<i32, BTreeMap<String, i64>> = BTreeMap::new();
    let mut totals: BTreeMap<&str, (i128, usize)> = BTreeMap::new();

    for record in &selected {
        by_year
            .entry(record.year)
            .or_default()
            .insert(record.team.clone(), record.wins);

        let total = totals.entry(record.team.as_str()).or_insert((0, 0));
        total.0 += i128::from(record.wins);
        total.1 += 1;
    }

    let wins_over_time = by_year
        .into_iter()
        .map(|(year, wins)| SeasonWins { year, wins })
        .collect();

    let mut average_wins: Vec<TeamAverage> = totals
        .into_iter()
        .map(|(team, (wins, seasons))| TeamAverage {
            team: team.to_string(),
            average_wins: wins as f64 / seasons as f64,
            seasons,
        })
        .collect();
    average_wins.sort_by(|a, b| {
        b.average_wins
            .total_cmp(&a.average_wins)
            .then_with(|| a.team.cmp(&b.team))
    });

    let mut final_year_losses: Vec<TeamLosses> = selected
        .iter()
        .filter(|r| r.year == to)
        .map(|r| TeamLosses {
            team: r.team.clone(),
            losses: r.losses,
        })
        .collect();
    final_year_losses.sort_by(|a, b| b.losses.cmp(&a.losses).then_with(|| a.team.cmp(&b.team)));

    Ok(StandingsReport {
        from,
        to,
        teams,
        wins_over_time,
        average_wins,
        final_year_losses,
    })
}

pub fn render_report(report: &StandingsReport) -> String {
    let mut out = format!(
        "{}\n{} {}-{}   {} {}\n\n",
        "MLB American League Team Standings".bold(),
        "Years:".dimmed(),
        report.from,
        report.to,
        "Teams:".dimmed(),
        report.teams.join(", ")
    );

    out.push_str(&format!("{}\n", "Wins Over Time".bold()));
    let mut wins = new_table();
    let mut header = vec!["Year".to_string()];
    header.extend(report.teams.iter().cloned());
    wins.set_header(header);
    for season in &report.wins_over_time {
        let mut row = vec![season.year.to_string()];
        row.extend(report.teams.iter().map(|team| {
            season
                .wins
                .get(team)
                .map_or_else(|| "-".to_string(), |w| w.to_string())
        }));
        wins.add_row(row);
    }
    out.push_str(&format!("{}\n\n", wins));

    out.push_str(&format!("{}\n", "Average Wins per Team".bold()));
    let mut averages = new_table();
    averages.set_header(vec!["Team", "Avg Wins", "Seasons"]);
    for avg in &report.average_wins {
        averages.add_row(vec![
            avg.team.clone(),
            format!("{:.1}", avg.average_wins),
            avg.seasons.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", averages));

    out.push_str(&format!("{}\n", format!("Losses per Team in {}", report.to).bold()));
    if report.final_year_losses.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format!("No data available for {}.", report.to).yellow()
        ));
    } else {
        let mut losses = new_table();
        losses.set_header(vec!["Team", "Losses"]);
        for entry in &report.final_year_losses {
            losses.add_row(vec![entry.team.clone(), entry.losses.to_string()]);
        }
        out.push_str(&format!("{}\n", losses));
    }

    out
}
