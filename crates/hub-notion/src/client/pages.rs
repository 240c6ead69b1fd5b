//! Page property update operations.

use serde_json::json;
use tracing::info;

use super::{NotionClient, read_json};
use crate::error::NotionError;

impl NotionClient {
    /// Overwrite a rich text property of a page with a single text value.
    pub(crate) fn update_rich_text(
        &self,
        page_id: &str,
        property: &str,
        value: &str,
    ) -> Result<(), NotionError> {
        let url = format!("{}/pages/{}", self.base_url, page_id);

        let payload = json!({
            "properties": {
                property: {
                    "rich_text": [{"type": "text", "text": {"content": value}}]
                }
            }
        });
        let payload_bytes = serde_json::to_vec(&payload)?;

        info!("Updating {} of page {} to {}", property, page_id, value);

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", &self.bearer())
            .header("Notion-Version", &self.api_version)
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;

        let _: serde_json::Value = read_json(response)?;
        Ok(())
    }
}
