//! Season discovery from the almanac's year menu
//!
//! The year menu links every season, but it also carries other numeric
//! anchors (page numbers, decade shortcuts). An anchor counts as a season only
//! when its text is all digits AND its target contains the season token built
//! from that text, e.g. text `2001` linking to `.../yr2001a.shtml`.

use crate::config::IngestConfig;
use crate::fetch::Document;
use crate::html::{selector, visible_text};
use crate::Result;
use standings_common::{SeasonLink, YearRange};
use tracing::{debug, info};
use url::Url;

/// Resolves the index page into season links, in document order
#[derive(Debug, Clone)]
pub struct SeasonIndexResolver {
    years: YearRange,
    token_prefix: String,
}

impl SeasonIndexResolver {
    pub fn new(years: YearRange, token_prefix: impl Into<String>) -> Self {
        Self {
            years,
            token_prefix: token_prefix.into(),
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.years, config.season_token_prefix.clone())
    }

    /// Collect qualifying season anchors from `document`
    ///
    /// Relative targets are resolved against the document URL. Ordering is
    /// exactly the order anchors appear in the markup; callers that truncate
    /// should not assume anything stronger.
    pub fn resolve(&self, document: &Document) -> Result<Vec<SeasonLink>> {
        let html = document.parse();
        let anchors = selector("a[href]")?;
        let base = Url::parse(document.url()).ok();

        let mut seasons = Vec::new();

        for anchor in html.select(&anchors) {
            let label = visible_text(anchor);
            if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }

            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let url = match base.as_ref().and_then(|b| b.join(href).ok()) {
                Some(absolute) => absolute.to_string(),
                None => href.to_string(),
            };

            let token = format!("{}{}", self.token_prefix, label);
            if !url.contains(&token) {
                debug!(label = %label, href, "Numeric anchor without season token, skipping");
                continue;
            }

            let Ok(year) = label.parse::<i32>() else {
                continue;
            };

            if !self.years.contains(year) {
                continue;
            }

            seasons.push(SeasonLink {
                year_label: label,
                year,
                url,
            });
        }

        info!(
            count = seasons.len(),
            years = %self.years,
            "Resolved {} seasons from index",
            seasons.len()
        );

        Ok(seasons)
    }
}
