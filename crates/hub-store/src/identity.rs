//! Persisted identity state: counter and mapping.
//!
//! The state lives in two JSON files:
//!
//! ```text
//! doc_counter.json   {"counter": 12, "updated_at": "2026-01-05T10:00:00+00:00"}
//! doc_mapping.json   {"<remote id>": "DOC-0001", ...}
//! ```
//!
//! The counter is written before the mapping, so an interrupted save can
//! leave the counter ahead of the mapping but never behind it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use hub_identity::IdentityState;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fs::{read_json, write_json_atomic};

#[derive(Serialize, Deserialize)]
struct CounterFile {
    counter: u64,
    #[serde(default)]
    updated_at: Option<String>,
}

/// File-backed storage for [`IdentityState`].
pub struct IdentityStore {
    counter_path: PathBuf,
    mapping_path: PathBuf,
}

impl IdentityStore {
    #[must_use]
    pub fn new(counter_path: PathBuf, mapping_path: PathBuf) -> Self {
        Self {
            counter_path,
            mapping_path,
        }
    }

    /// Load the state. Missing files yield an empty state.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed, or if
    /// the mapping is not injective.
    pub fn load(&self) -> Result<IdentityState, StoreError> {
        let counter = read_json::<CounterFile>(&self.counter_path)?.map_or(0, |c| c.counter);
        let mapping = read_json::<BTreeMap<String, String>>(&self.mapping_path)?.unwrap_or_default();
        let state = IdentityState { counter, mapping };
        state.check_unique()?;

        tracing::debug!(
            counter = state.counter,
            entries = state.mapping.len(),
            "loaded identity state"
        );
        Ok(state)
    }

    /// Persist the state, counter first.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn save(&self, state: &IdentityState) -> Result<(), StoreError> {
        let counter = CounterFile {
            counter: state.counter,
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        write_json_atomic(&self.counter_path, &counter)?;
        write_json_atomic(&self.mapping_path, &state.mapping)?;

        tracing::info!(
            counter = state.counter,
            entries = state.mapping.len(),
            "saved identity state"
        );
        Ok(())
    }
}
