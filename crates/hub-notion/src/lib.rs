//! Remote workspace integration for the document hub.
//!
//! This crate provides everything the publishing pipeline needs from the
//! remote workspace:
//!
//! - [`NotionClient`] for the REST API (database query, block children, page update)
//! - [`RemoteSource`] trait so the pipeline can run against a fake source
//! - [`Fetcher`] for cursor pagination and recursive content tree retrieval
//! - [`RemoteRecord`] extraction of title, publish flag and public ID
//! - [`RemoteIdSink`] writing assigned public IDs back to the records
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use hub_notion::{Fetcher, NotionClient, RecordFields, RemoteRecord};
//!
//! let client = NotionClient::new("https://api.notion.com/v1", &token, &database_id);
//! let fetcher = Fetcher::new(&client);
//! let fields = RecordFields::default();
//! for page in fetcher.fetch_pages()? {
//!     let record = RemoteRecord::from_page(&page, &fields);
//!     let tree = fetcher.fetch_tree(&record.remote_id);
//! }
//! ```

mod client;
mod error;
mod fetcher;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod record;
mod sink;
mod source;
pub mod types;

pub use client::{MAX_PAGE_SIZE, NotionClient};
pub use error::NotionError;
pub use fetcher::{DEFAULT_MAX_DEPTH, FetchedTree, Fetcher};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockPage, MockSource, mock_block, mock_text_block};
pub use record::{Property, RecordFields, RemoteRecord, UNTITLED, find_property};
pub use sink::RemoteIdSink;
pub use source::RemoteSource;
