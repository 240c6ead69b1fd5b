//! Per-record content snapshots.

use std::path::PathBuf;

use hub_identity::IdScheme;
use hub_notion::Property;
use hub_renderer::Block;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fs::{read_json, write_json_atomic};

/// Cached, renderable copy of one published record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub public_id: String,
    pub remote_id: String,
    pub title: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// RFC 3339 time of the fetch that produced this snapshot.
    pub fetched_at: String,
}

impl Snapshot {
    /// Create a snapshot stamped with the current time.
    #[must_use]
    pub fn new(
        public_id: impl Into<String>,
        remote_id: impl Into<String>,
        title: impl Into<String>,
        properties: Vec<Property>,
        blocks: Vec<Block>,
    ) -> Self {
        Self {
            public_id: public_id.into(),
            remote_id: remote_id.into(),
            title: title.into(),
            properties,
            blocks,
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Directory of snapshot files named `<PUBLIC_ID>.json`.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the snapshot for `public_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] if the ID is not a safe file stem.
    pub fn path_for(&self, public_id: &str) -> Result<PathBuf, StoreError> {
        if !IdScheme::is_file_safe(public_id) {
            return Err(StoreError::InvalidKey(public_id.to_owned()));
        }
        Ok(self.dir.join(format!("{public_id}.json")))
    }

    /// Replace the snapshot of `snapshot.public_id` wholesale.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&snapshot.public_id)?;
        write_json_atomic(&path, snapshot)?;
        tracing::debug!(
            public_id = %snapshot.public_id,
            blocks = snapshot.blocks.len(),
            "wrote snapshot"
        );
        Ok(path)
    }

    /// Read the snapshot of `public_id`, `None` if it was never written.
    pub fn read(&self, public_id: &str) -> Result<Option<Snapshot>, StoreError> {
        read_json(&self.path_for(public_id)?)
    }
}
