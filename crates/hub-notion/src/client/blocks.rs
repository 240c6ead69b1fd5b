//! Block children operations.

use tracing::debug;

use super::{NotionClient, read_json};
use crate::error::NotionError;
use crate::types::BlockChildrenResponse;

impl NotionClient {
    /// List one page of a block's direct children, continuing from `cursor`.
    pub(crate) fn list_children_page(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildrenResponse, NotionError> {
        let mut url = format!(
            "{}/blocks/{}/children?page_size={}",
            self.base_url, block_id, self.page_size
        );
        if let Some(cursor) = cursor {
            url.push_str("&start_cursor=");
            url.push_str(cursor);
        }

        debug!("Listing children of block {}", block_id);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .header("Notion-Version", &self.api_version)
            .call()?;

        read_json(response)
    }
}
