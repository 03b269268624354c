//! Field coercion for scraped standings cells
//!
//! Every rule is total: a cell that cannot be read falls back to a fixed value
//! (`0` for counts, `None` for fractions) instead of failing the record. Only
//! the season year can make a record unusable, and only when it arrives as
//! text (the CSV path).

use standings_common::{NormalizedStandingsRecord, RawStandingsRecord};

const HALF_GAME: char = '½';

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn decimal_chars(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Season year from text such as `"Year 2000"` or `"2000season"`
pub fn parse_year(text: &str) -> Option<i32> {
    digits(text).parse().ok()
}

/// Win or loss count; anything unreadable (including overflow) counts as 0
pub fn normalize_count(text: &str) -> i64 {
    digits(text).parse().unwrap_or(0)
}

/// Win fraction in `[0, 1]`, or `None`
pub fn normalize_win_pct(text: &str) -> Option<f64> {
    decimal_chars(text)
        .parse::<f64>()
        .ok()
        .filter(|wp| (0.0..=1.0).contains(wp))
}

/// Games behind the leader; `½` counts as half a game
///
/// A dash (tied for the lead) or blank cell has no digits left and is `None`.
pub fn normalize_games_behind(text: &str) -> Option<f64> {
    decimal_chars(&text.replace(HALF_GAME, ".5"))
        .parse::<f64>()
        .ok()
        .filter(|gb| gb.is_finite())
}

pub fn normalize(raw: &RawStandingsRecord) -> NormalizedStandingsRecord {
    NormalizedStandingsRecord {
        year: raw.year,
        team: raw.team.trim().to_string(),
        wins: normalize_count(&raw.wins),
        losses: normalize_count(&raw.losses),
        wp: normalize_win_pct(&raw.wp),
        gb: normalize_games_behind(&raw.gb),
    }
}

pub fn normalize_all(raw: &[RawStandingsRecord]) -> Vec<NormalizedStandingsRecord> {
    raw.iter().map(normalize).collect()
}
