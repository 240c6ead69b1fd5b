//! Document manifests.
//!
//! Two manifests are rewritten on every run: every record seen in the
//! collection, and the published subset that feeds rendering, the index,
//! the search index and cleanup.

use std::path::PathBuf;

use hub_notion::{Property, RemoteRecord};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fs::write_json_atomic;

/// Manifest of every record seen in the last run.
pub const ALL_DOCUMENTS_FILE: &str = "all_documents.json";

/// Manifest of the published records.
pub const PUBLISHED_DOCUMENTS_FILE: &str = "published_documents.json";

/// A record after reconciliation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub remote_id: String,
    /// `None` when no public ID could be resolved this run.
    pub public_id: Option<String>,
    pub title: String,
    pub published: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl DocumentRecord {
    #[must_use]
    pub fn new(record: &RemoteRecord, public_id: Option<String>) -> Self {
        Self {
            remote_id: record.remote_id.clone(),
            public_id,
            title: record.title.clone(),
            published: record.published,
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            remote_url: record.remote_url.clone(),
            properties: record.properties.clone(),
        }
    }

    /// Published and holding a public ID.
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        self.published && self.public_id.is_some()
    }
}

/// Reads and writes the manifests in one directory.
pub struct ManifestStore {
    dir: PathBuf,
}

impl ManifestStore {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn all_path(&self) -> PathBuf {
        self.dir.join(ALL_DOCUMENTS_FILE)
    }

    fn published_path(&self) -> PathBuf {
        self.dir.join(PUBLISHED_DOCUMENTS_FILE)
    }

    /// Write both manifests and return the published subset.
    ///
    /// Records without a public ID are listed in the all-records manifest
    /// only; they never appear as published even when flagged.
    pub fn write(&self, records: &[DocumentRecord]) -> Result<Vec<DocumentRecord>, StoreError> {
        let published: Vec<DocumentRecord> = records
            .iter()
            .filter(|r| r.is_publishable())
            .cloned()
            .collect();

        write_json_atomic(&self.all_path(), records)?;
        write_json_atomic(&self.published_path(), &published)?;

        tracing::info!(
            total = records.len(),
            published = published.len(),
            "wrote document manifests"
        );
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::read_json;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn read(path: &Path) -> Option<Vec<DocumentRecord>> {
        read_json(path).unwrap()
    }

    fn record(remote_id: &str, public_id: Option<&str>, published: bool) -> DocumentRecord {
        DocumentRecord {
            remote_id: remote_id.to_owned(),
            public_id: public_id.map(str::to_owned),
            title: format!("Title {remote_id}"),
            published,
            created_at: None,
            updated_at: None,
            remote_url: None,
            properties: Vec::new(),
        }
    }

    #[test]
    fn test_write_splits_published() {
        let tmp = TempDir::new().unwrap();
        let store = ManifestStore::new(tmp.path().to_path_buf());
        let records = vec![
            record("a", Some("DOC-0001"), true),
            record("b", Some("DOC-0002"), false),
            record("c", None, true),
        ];

        let published = store.write(&records).unwrap();

        assert_eq!(published, vec![records[0].clone()]);
        assert_eq!(read(&tmp.path().join(ALL_DOCUMENTS_FILE)), Some(records));
        assert_eq!(
            read(&tmp.path().join(PUBLISHED_DOCUMENTS_FILE)),
            Some(published)
        );
    }

    #[test]
    fn test_write_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let store = ManifestStore::new(tmp.path().join("cache"));
        store.write(&[]).unwrap();
        assert_eq!(read(&tmp.path().join("cache").join(ALL_DOCUMENTS_FILE)), Some(vec![]));
    }

    #[test]
    fn test_rewrite_drops_unpublished() {
        let tmp = TempDir::new().unwrap();
        let store = ManifestStore::new(tmp.path().to_path_buf());
        store.write(&[record("a", Some("DOC-0001"), true)]).unwrap();
        store.write(&[record("a", Some("DOC-0001"), false)]).unwrap();
        assert_eq!(read(&tmp.path().join(PUBLISHED_DOCUMENTS_FILE)), Some(vec![]));
        assert_eq!(read(&tmp.path().join(ALL_DOCUMENTS_FILE)).unwrap().len(), 1);
    }
}
