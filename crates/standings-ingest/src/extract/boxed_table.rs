//! Locator for the boxed standings layout
//!
//! ```text
//! div.ba-table            <- first region linking roster.php?y=<season>
//!   table.boxed
//!     tbody > tr          <- two header rows, then one row per team
//!       td.datacolBox x6
//! ```

use super::{roster_link_fragment, LocatedRows, TableLocator, DATA_CELL_SELECTOR, HEADER_ROWS};
use crate::html::{has_link_containing, selector};
use crate::Result;
use scraper::{Html, Selector};
use tracing::debug;

pub struct BoxedTableLocator {
    region: Selector,
    anchors: Selector,
    table: Selector,
    rows: Selector,
    cells: Selector,
}

impl BoxedTableLocator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            region: selector("div.ba-table")?,
            anchors: selector("a[href]")?,
            table: selector("table.boxed")?,
            rows: selector("tbody > tr")?,
            cells: selector(DATA_CELL_SELECTOR)?,
        })
    }
}

impl TableLocator for BoxedTableLocator {
    fn name(&self) -> &'static str {
        "boxed-table"
    }

    fn locate(&self, document: &Html, season: i32) -> Result<Option<LocatedRows>> {
        let fragment = roster_link_fragment(season);

        let Some(region) = document
            .select(&self.region)
            .find(|region| has_link_containing(*region, &self.anchors, &fragment))
        else {
            return Ok(None);
        };

        let Some(table) = region.select(&self.table).next() else {
            debug!(season, "Standings region has no boxed table");
            return Ok(None);
        };

        let candidates = table.select(&self.rows).skip(HEADER_ROWS);
        Ok(Some(LocatedRows::from_candidates(candidates, &self.cells)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="ba-table">
          <table class="boxed"><tbody>
            <tr><td class="header" colspan="6">2001 National League</td></tr>
            <tr><td class="banner">Team</td></tr>
            <tr>
              <td class="datacolBox"><a href="../teams/roster.php?y=2001&t=ARI">Arizona</a></td>
              <td class="datacolBox">92</td><td class="datacolBox">70</td>
              <td class="datacolBox">.568</td><td class="datacolBox">-</td>
              <td class="datacolBox">$85,082,999</td>
            </tr>
          </tbody></table>
        </div>
        <div class="ba-table">
          <table class="boxed"><tbody>
            <tr><td class="header" colspan="6">2001 American League</td></tr>
            <tr><td class="banner">Team</td><td class="banner">W</td></tr>
            <tr>
              <td class="datacolBox"><a href="../teams/roster.php?y=2001&t=NYA">New York Yankees</a></td>
              <td class="datacolBox">95</td><td class="datacolBox">65</td>
              <td class="datacolBox">.594</td><td class="datacolBox">-</td>
              <td class="datacolBox">$112,287,143</td>
            </tr>
            <tr>
              <td class="datacolBox">Boston Red Sox</td>
              <td class="datacolBox">82</td><td class="datacolBox">79</td>
              <td class="datacolBox">.509</td>
            </tr>
            <tr>
              <td class="datacolBox">Toronto Blue Jays</td>
              <td class="datacolBox">80</td><td class="datacolBox">82</td>
              <td class="datacolBox">.494</td><td class="datacolBox">16</td>
              <td class="datacolBox">$76,895,999</td>
            </tr>
          </tbody></table>
        </div>
    </body></html>"#;

    #[test]
    fn test_picks_first_region_linking_the_season() {
        let html = Html::parse_document(PAGE);
        let located = BoxedTableLocator::new().unwrap().locate(&html, 2001).unwrap().unwrap();

        // the first region links 2001 too, so it wins
        assert_eq!(located.rows.len(), 1);
        assert_eq!(located.rows[0][0], "Arizona");
        assert_eq!(located.dropped, 0);
    }

    #[test]
    fn test_drops_short_rows_and_keeps_the_rest() {
        let page = PAGE.replacen("roster.php?y=2001&t=ARI", "roster.php?y=2000&t=ARI", 1);
        let html = Html::parse_document(&page);
        let located = BoxedTableLocator::new().unwrap().locate(&html, 2001).unwrap().unwrap();

        assert_eq!(located.dropped, 1);
        let teams: Vec<&str> = located.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(teams, vec!["New York Yankees", "Toronto Blue Jays"]);
        assert_eq!(located.rows[1][4], "16");
    }

    #[test]
    fn test_no_region_for_season() {
        let html = Html::parse_document(PAGE);
        assert!(BoxedTableLocator::new().unwrap().locate(&html, 1999).unwrap().is_none());
    }

    #[test]
    fn test_region_without_boxed_table() {
        let html = Html::parse_document(
            r#"<html><body>
            <div class="ba-table">
              <p><a href="../teams/roster.php?y=2001&t=NYA">New York Yankees</a></p>
              <table class="plain"><tbody><tr>
                <td class="datacolBox">New York Yankees</td><td class="datacolBox">95</td>
              </tr></tbody></table>
            </div>
            </body></html>"#,
        );
        assert!(BoxedTableLocator::new().unwrap().locate(&html, 2001).unwrap().is_none());
    }
}
