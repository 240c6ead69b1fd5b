//! Database query operations.

use serde_json::json;
use tracing::debug;

use super::{NotionClient, read_json};
use crate::error::NotionError;
use crate::types::QueryResponse;

impl NotionClient {
    /// Query one page of the database, continuing from `cursor`.
    pub(crate) fn query_database_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<QueryResponse, NotionError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);

        let mut payload = json!({ "page_size": self.page_size });
        if let Some(cursor) = cursor {
            payload["start_cursor"] = json!(cursor);
        }
        let payload_bytes = serde_json::to_vec(&payload)?;

        debug!("Querying database {} (cursor: {:?})", self.database_id, cursor);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .header("Notion-Version", &self.api_version)
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;

        let page: QueryResponse = read_json(response)?;
        debug!(
            "Database query returned {} results (has_more: {})",
            page.results.len(),
            page.has_more
        );
        Ok(page)
    }
}
