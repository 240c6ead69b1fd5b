//! Error types for site generation.

use std::path::PathBuf;

use hub_store::StoreError;

use crate::template::TemplateError;

/// Site generation error.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// I/O error reading or writing a site file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("Invalid page pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Published record has no cached snapshot.
    #[error("No snapshot cached for {0}")]
    MissingSnapshot(String),
}
