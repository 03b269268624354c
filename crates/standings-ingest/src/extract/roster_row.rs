//! Locator that keys on the roster link of each team row
//!
//! Some season pages lack the boxed wrapper; there every `tr` whose direct
//! `td > a` child links `roster.php?y=<season>` is a team row.

use super::{roster_link_fragment, LocatedRows, TableLocator, DATA_CELL_SELECTOR};
use crate::html::{child_elements, selector};
use crate::Result;
use scraper::{ElementRef, Html, Selector};

pub struct RosterRowLocator {
    rows: Selector,
    cells: Selector,
}

impl RosterRowLocator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rows: selector("tr")?,
            cells: selector(DATA_CELL_SELECTOR)?,
        })
    }
}

fn links_roster(row: ElementRef<'_>, fragment: &str) -> bool {
    child_elements(row, "td").any(|td| {
        child_elements(td, "a")
            .any(|a| a.value().attr("href").is_some_and(|href| href.contains(fragment)))
    })
}

impl TableLocator for RosterRowLocator {
    fn name(&self) -> &'static str {
        "roster-rows"
    }

    fn locate(&self, document: &Html, season: i32) -> Result<Option<LocatedRows>> {
        let fragment = roster_link_fragment(season);

        let candidates: Vec<ElementRef<'_>> = document
            .select(&self.rows)
            .filter(|row| links_roster(*row, &fragment))
            .collect();

        if candidates.is_empty() {
            return Ok(None);
        }

        Ok(Some(LocatedRows::from_candidates(candidates, &self.cells)))
    }
}
