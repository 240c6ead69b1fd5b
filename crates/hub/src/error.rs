//! Pipeline error types.

use hub_notion::NotionError;
use hub_site::SiteError;
use hub_store::StoreError;

/// Fatal pipeline error. Per-record failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Fetching records failed: {0}")]
    Fetch(#[from] NotionError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Site(#[from] SiteError),
}
