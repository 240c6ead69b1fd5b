//! Remote source abstraction.

use crate::client::NotionClient;
use crate::error::NotionError;
use crate::types::{BlockChildrenResponse, QueryResponse};

/// The three remote operations the pipeline consumes.
///
/// Implemented by [`NotionClient`] for the live API and by `MockSource`
/// (behind the `mock` feature) for tests.
pub trait RemoteSource {
    /// Query one page of the record collection.
    fn query_database(&self, cursor: Option<&str>) -> Result<QueryResponse, NotionError>;

    /// List one page of a block's direct children.
    fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildrenResponse, NotionError>;

    /// Overwrite a rich text property of a record.
    fn update_rich_text_property(
        &self,
        page_id: &str,
        property: &str,
        value: &str,
    ) -> Result<(), NotionError>;
}

impl RemoteSource for NotionClient {
    fn query_database(&self, cursor: Option<&str>) -> Result<QueryResponse, NotionError> {
        self.query_database_page(cursor)
    }

    fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildrenResponse, NotionError> {
        self.list_children_page(block_id, cursor)
    }

    fn update_rich_text_property(
        &self,
        page_id: &str,
        property: &str,
        value: &str,
    ) -> Result<(), NotionError> {
        self.update_rich_text(page_id, property, value)
    }
}
