//! Error types for local stores.

use std::path::PathBuf;

/// Local store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing a store file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file is not valid JSON of the expected shape.
    #[error("Malformed store file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Stored identity state violates an invariant.
    #[error(transparent)]
    Identity(#[from] hub_identity::IdentityError),

    /// Public ID cannot be used as a file name.
    #[error("Public ID {0:?} is not a valid file name")]
    InvalidKey(String),
}
