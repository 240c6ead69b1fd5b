//! Document hub pipeline.
//!
//! Runs the publishing phases in order against any
//! [`RemoteSource`](hub_notion::RemoteSource):
//!
//! 1. fetch every record of the collection
//! 2. reconcile public IDs and save the identity state
//! 3. write the document manifests
//! 4. cache a content snapshot per published record
//! 5. render document pages
//! 6. build the paginated index
//! 7. write the search index
//! 8. remove pages of records that are no longer published
//!
//! Each phase consumes the complete output of the previous one.

mod error;
mod pipeline;

pub use error::PipelineError;
pub use pipeline::{CacheReport, Pipeline, PipelineSummary};
