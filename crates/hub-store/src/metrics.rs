//! Per-document engagement counters.
//!
//! Stored as a single JSON object keyed by public ID:
//!
//! ```text
//! {"DOC-0001": {"views": 12, "downloads": 3, "shares": 0}}
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fs::{read_json, write_json_atomic};

/// Counters of one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub views: u64,
    pub downloads: u64,
    pub shares: u64,
}

/// Counter selector for [`MetricsStore::increment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricKind {
    Views,
    Downloads,
    Shares,
}

/// File-backed metrics table with lazy zero initialization.
pub struct MetricsStore {
    path: PathBuf,
    entries: BTreeMap<String, Metrics>,
    dirty: bool,
}

impl MetricsStore {
    /// Load the table at `path`; a missing file yields an empty table.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        let entries = read_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Counters of `public_id`, creating a zeroed entry on first access.
    pub fn get_or_init(&mut self, public_id: &str) -> Metrics {
        if let Some(metrics) = self.entries.get(public_id) {
            return *metrics;
        }
        self.entries.insert(public_id.to_owned(), Metrics::default());
        self.dirty = true;
        Metrics::default()
    }

    /// Counters of `public_id` without creating an entry.
    #[must_use]
    pub fn get(&self, public_id: &str) -> Option<Metrics> {
        self.entries.get(public_id).copied()
    }

    /// Add one to a counter and return the new value.
    pub fn increment(&mut self, public_id: &str, kind: MetricKind) -> u64 {
        let metrics = self.entries.entry(public_id.to_owned()).or_default();
        let counter = match kind {
            MetricKind::Views => &mut metrics.views,
            MetricKind::Downloads => &mut metrics.downloads,
            MetricKind::Shares => &mut metrics.shares,
        };
        *counter += 1;
        self.dirty = true;
        *counter
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the table if anything changed since it was loaded or saved.
    ///
    /// Returns whether a write happened.
    pub fn save_if_dirty(&mut self) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        write_json_atomic(&self.path, &self.entries)?;
        self.dirty = false;
        tracing::debug!(entries = self.entries.len(), "saved metrics");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_get_or_init_creates_zeroed_entry() {
        let tmp = TempDir::new().unwrap();
        let mut store = MetricsStore::load(tmp.path().join("metrics/metrics.json")).unwrap();

        assert_eq!(store.get("DOC-0001"), None);
        assert_eq!(store.get_or_init("DOC-0001"), Metrics::default());
        assert_eq!(store.get("DOC-0001"), Some(Metrics::default()));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_increment_and_persist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metrics.json");
        let mut store = MetricsStore::load(path.clone()).unwrap();

        assert_eq!(store.increment("DOC-0001", MetricKind::Views), 1);
        assert_eq!(store.increment("DOC-0001", MetricKind::Views), 2);
        assert_eq!(store.increment("DOC-0001", MetricKind::Shares), 1);
        assert!(store.save_if_dirty().unwrap());

        let reloaded = MetricsStore::load(path).unwrap();
        assert_eq!(
            reloaded.get("DOC-0001"),
            Some(Metrics {
                views: 2,
                downloads: 0,
                shares: 1,
            })
        );
    }

    #[test]
    fn test_save_skipped_when_clean() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metrics.json");
        std::fs::write(&path, r#"{"DOC-0001": {"views": 5}}"#).unwrap();

        let mut store = MetricsStore::load(path).unwrap();
        assert_eq!(store.get_or_init("DOC-0001").views, 5);
        assert!(!store.save_if_dirty().unwrap());
    }

    #[test]
    fn test_save_once_then_clean() {
        let tmp = TempDir::new().unwrap();
        let mut store = MetricsStore::load(tmp.path().join("metrics.json")).unwrap();
        store.get_or_init("DOC-0003");
        assert!(store.save_if_dirty().unwrap());
        assert!(!store.save_if_dirty().unwrap());
    }
}
