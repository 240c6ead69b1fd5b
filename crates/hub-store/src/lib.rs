//! Local persisted state of the document hub.
//!
//! Four stores live under the data directory:
//!
//! - [`IdentityStore`]: the public ID counter and remote-to-public mapping
//! - [`SnapshotStore`]: one [`Snapshot`] per published record, keyed by public ID
//! - [`ManifestStore`]: the all-records and published-records manifests
//! - [`MetricsStore`]: view, download and share counts per public ID
//!
//! # Directory layout
//!
//! ```text
//! data/
//! +-- doc_counter.json
//! +-- doc_mapping.json
//! +-- cache/
//! |   +-- all_documents.json
//! |   +-- published_documents.json
//! |   +-- DOC-0001.json
//! +-- metrics/
//!     +-- metrics.json
//! ```
//!
//! Every file is replaced atomically, so readers never observe a partially
//! written snapshot, manifest or identity file.

mod error;
mod fs;
mod identity;
mod manifest;
mod metrics;
mod snapshot;

pub use error::StoreError;
pub use identity::IdentityStore;
pub use manifest::{
    ALL_DOCUMENTS_FILE, DocumentRecord, ManifestStore, PUBLISHED_DOCUMENTS_FILE,
};
pub use metrics::{MetricKind, Metrics, MetricsStore};
pub use snapshot::{Snapshot, SnapshotStore};
