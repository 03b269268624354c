//! Memoized standings loads
//!
//! Loaded records are kept per content fingerprint of their source file. An
//! edited source has a new fingerprint and is loaded fresh; an unchanged one
//! is served from memory until the caller calls [`StandingsCache::invalidate`].

use crate::error::Result;
use standings_common::{Fingerprint, NormalizedStandingsRecord};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub type Records = Arc<Vec<NormalizedStandingsRecord>>;

#[derive(Debug, Default)]
pub struct StandingsCache {
    entries: HashMap<Fingerprint, Records>,
    hits: usize,
    misses: usize,
}

impl StandingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `source`, running `load` only on a fingerprint miss
    pub fn get_or_load<F>(&mut self, source: &Path, load: F) -> Result<Records>
    where
        F: FnOnce(&Path) -> Result<Vec<NormalizedStandingsRecord>>,
    {
        let fingerprint = Fingerprint::of_file(source)?;

        if let Some(records) = self.entries.get(&fingerprint) {
            self.hits += 1;
            debug!(source = %source.display(), fingerprint = fingerprint.short(), "Cache hit");
            return Ok(Arc::clone(records));
        }

        self.misses += 1;
        let records = Arc::new(load(source)?);
        info!(
            source = %source.display(),
            fingerprint = fingerprint.short(),
            rows = records.len(),
            "Loaded standings"
        );

        self.entries.insert(fingerprint, Arc::clone(&records));
        Ok(records)
    }

    /// Drop every memoized load
    pub fn invalidate(&mut self) {
        debug!(entries = self.entries.len(), "Invalidating standings cache");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(wins: i64) -> NormalizedStandingsRecord {
        NormalizedStandingsRecord {
            year: 2000,
            team: "Oakland Athletics".to_string(),
            wins,
            losses: 70,
            wp: None,
            gb: None,
        }
    }

    #[test]
    fn test_memoizes_until_content_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standings.csv");
        std::fs::write(&path, "v1").unwrap();

        let mut cache = StandingsCache::new();
        let first = cache.get_or_load(&path, |_| Ok(vec![record(91)])).unwrap();
        let second = cache
            .get_or_load(&path, |_| panic!("unchanged source must not reload"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        std::fs::write(&path, "v2").unwrap();
        let third = cache.get_or_load(&path, |_| Ok(vec![record(92)])).unwrap();
        assert_eq!(third[0].wins, 92);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standings.csv");
        std::fs::write(&path, "same").unwrap();

        let mut cache = StandingsCache::new();
        cache.get_or_load(&path, |_| Ok(vec![record(91)])).unwrap();
        cache.invalidate();
        assert!(cache.is_empty());

        let reloaded = cache.get_or_load(&path, |_| Ok(vec![record(99)])).unwrap();
        assert_eq!(reloaded[0].wins, 99);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = StandingsCache::new();
        assert!(cache
            .get_or_load(&dir.path().join("missing.csv"), |_| Ok(vec![]))
            .is_err());
    }
}
